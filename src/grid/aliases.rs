//! Accepted variable names for each role in a gridded input file.
//!
//! The lists are part of the input format contract: each role is resolved
//! by checking its candidates in order and taking the first that exists.

/// Ordered candidate names for the variables the extractor needs.
#[derive(Debug, Clone)]
pub struct VariableAliases {
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
    pub measurement: Vec<String>,
    pub time: Vec<String>,
}

impl Default for VariableAliases {
    fn default() -> Self {
        VariableAliases {
            latitude: to_owned(&["lat", "latitude", "y"]),
            longitude: to_owned(&["lon", "longitude", "x"]),
            measurement: to_owned(&["PM25_WEIGHTED", "PM25", "pm25", "PM2_5", "pm2_5"]),
            time: to_owned(&["time", "t"]),
        }
    }
}

impl VariableAliases {
    /// Replaces the measurement candidates with a single explicit name.
    pub fn with_measurement(mut self, name: &str) -> Self {
        self.measurement = vec![name.to_string()];
        self
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Returns the first candidate for which `exists` holds.
pub fn resolve<F>(candidates: &[String], exists: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    candidates.iter().find(|c| exists(c)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_take_first_present_candidate() {
        let present = ["latitude", "y", "PM25", "pm25"];
        let exists = |name: &str| present.contains(&name);
        let aliases = VariableAliases::default();

        assert_eq!(
            resolve(&aliases.latitude, exists),
            Some("latitude".to_string())
        );
        assert_eq!(resolve(&aliases.measurement, exists), Some("PM25".to_string()));
        assert_eq!(resolve(&aliases.longitude, exists), None);
    }

    #[test]
    fn should_override_measurement() {
        let aliases = VariableAliases::default().with_measurement("GWRPM25");

        assert_eq!(aliases.measurement, vec!["GWRPM25".to_string()]);
        assert_eq!(aliases.latitude.len(), 3);
    }
}
