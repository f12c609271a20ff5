//! City/country names as they appear in the cities table header,
//! e.g. `"Accra, Ghana"`.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityHeader {
    pub city: String,
    pub country: String,
}

/// Splits a header field on its last comma. Fields without a comma give `None`.
pub fn split_header(field: &str) -> Option<CityHeader> {
    let field = field.trim().trim_matches('"').trim();
    let (city, country) = field.rsplit_once(',')?;

    Some(CityHeader {
        city: city.trim().to_string(),
        country: country.trim().to_string(),
    })
}

/// Like [`split_header`], but a field without a comma becomes a city with an
/// empty country.
pub fn split_header_lenient(field: &str) -> CityHeader {
    split_header(field).unwrap_or_else(|| CityHeader {
        city: field.trim().trim_matches('"').trim().to_string(),
        country: String::new(),
    })
}

/// File-name-safe form: word characters, `-` and whitespace are kept, then
/// spaces become underscores.
pub fn safe_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .replace(' ', "_")
}

/// `City_Country.json`
pub fn series_file_name(header: &CityHeader) -> String {
    format!("{}_{}.json", safe_name(&header.city), safe_name(&header.country))
}

/// Lower-cased with punctuation replaced by spaces, for loose searching.
pub fn search_form(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_split_on_last_comma() {
        let h = split_header("Accra, Ghana").unwrap();
        assert_eq!(h.city, "Accra");
        assert_eq!(h.country, "Ghana");

        let h = split_header("\"Washington, D.C., United States\"").unwrap();
        assert_eq!(h.city, "Washington, D.C.");
        assert_eq!(h.country, "United States");
    }

    #[test]
    fn should_reject_field_without_comma() {
        assert_eq!(split_header("Year"), None);
        assert_eq!(
            split_header_lenient(" Singapore "),
            CityHeader {
                city: "Singapore".to_string(),
                country: String::new()
            }
        );
    }

    #[test]
    fn should_make_safe_file_names() {
        let h = split_header("Abidjan, Côte d'Ivoire").unwrap();

        assert_eq!(series_file_name(&h), "Abidjan_Côte_dIvoire.json");
        assert_eq!(safe_name("São Paulo"), "São_Paulo");
        assert_eq!(safe_name("Ho Chi Minh City (Saigon)"), "Ho_Chi_Minh_City_Saigon");
    }

    #[test]
    fn should_ignore_punctuation_when_searching() {
        assert_eq!(search_form("Côte d'Ivoire"), "côte d ivoire");
        assert!(search_form("Xi'an, China").contains("xi an"));
    }
}
