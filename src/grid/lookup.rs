//! Nearest-grid-point queries against a sparse point set.
//!
//! Mirrors how the dashboard colours the map: an exact match on coordinates
//! rounded to two decimals wins, otherwise the nearest listed point by
//! Euclidean distance in degrees is used, provided it lies within one degree.

use std::collections::HashMap;

use super::SparsePoint;

/// Maximum distance, in degrees, at which a point still answers a query.
pub const MAX_DISTANCE: f64 = 1.0;

/// A scan stops as soon as a point this close is found.
pub const EARLY_EXIT_DISTANCE: f64 = 0.1;

pub struct NearestLookup<'a> {
    points: &'a [SparsePoint],
    exact: HashMap<(i64, i64), f64>,
}

fn key(lat: f64, lon: f64) -> (i64, i64) {
    ((lat * 100.0).round() as i64, (lon * 100.0).round() as i64)
}

impl<'a> NearestLookup<'a> {
    pub fn new(points: &'a [SparsePoint]) -> Self {
        let mut exact = HashMap::with_capacity(points.len());
        for p in points {
            exact.insert(key(p.lat, p.lon), p.value);
        }

        NearestLookup { points, exact }
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// Non-finite queries never match.
    pub fn value_at(&self, lat: f64, lon: f64) -> Option<f64> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        if let Some(value) = self.exact.get(&key(lat, lon)) {
            return Some(*value);
        }

        let mut min_distance = f64::INFINITY;
        let mut closest = None;

        for p in self.points {
            let distance = ((p.lat - lat).powi(2) + (p.lon - lon).powi(2)).sqrt();
            if distance < min_distance {
                min_distance = distance;
                closest = Some(p.value);
            }
            if distance < EARLY_EXIT_DISTANCE {
                break;
            }
        }

        closest.filter(|_| min_distance < MAX_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<SparsePoint> {
        vec![
            SparsePoint {
                lat: 51.5,
                lon: -0.12,
                value: 9.0,
            },
            SparsePoint {
                lat: 40.0,
                lon: 116.4,
                value: 33.0,
            },
            SparsePoint {
                lat: 40.5,
                lon: 116.4,
                value: 40.0,
            },
        ]
    }

    #[test]
    fn should_match_rounded_coordinates() {
        let points = points();
        let lookup = NearestLookup::new(&points);

        assert_eq!(lookup.value_at(51.501, -0.1201), Some(9.0));
        assert_eq!(lookup.len(), 3);
    }

    #[test]
    fn should_fall_back_to_nearest_point() {
        let points = points();
        let lookup = NearestLookup::new(&points);

        assert_eq!(lookup.value_at(40.4, 116.0), Some(40.0));
        assert_eq!(lookup.value_at(39.7, 116.5), Some(33.0));
    }

    #[test]
    fn should_return_none_beyond_one_degree() {
        let points = points();
        let lookup = NearestLookup::new(&points);

        assert_eq!(lookup.value_at(0.0, 0.0), None);
        assert_eq!(lookup.value_at(51.5, 1.0), None);
    }

    #[test]
    fn should_return_none_for_empty_set() {
        let lookup = NearestLookup::new(&[]);

        assert_eq!(lookup.value_at(10.0, 10.0), None);
    }

    #[test]
    fn should_ignore_non_finite_queries() {
        let points = vec![SparsePoint {
            lat: 0.0,
            lon: 0.0,
            value: 42.0,
        }];
        let lookup = NearestLookup::new(&points);

        assert_eq!(lookup.value_at(f64::NAN, f64::NAN), None);
        assert_eq!(lookup.value_at(0.0, f64::NAN), None);
        assert_eq!(lookup.value_at(f64::INFINITY, 0.0), None);
        assert_eq!(lookup.value_at(0.0, 0.0), Some(42.0));
    }
}
