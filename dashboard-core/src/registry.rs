use std::sync::OnceLock;

use crate::model::City;

/// Fixed table of cities the dashboard supports.
///
/// Lookup is exact and case-sensitive: `"Berlin"` resolves, `"berlin"`
/// does not. There is deliberately no fuzzy matching; the backend rejects
/// unknown names with the same strictness, so guessing here would only
/// move the failure to the network.
#[derive(Debug)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl CityRegistry {
    /// Registry with the built-in city table, sorted by name.
    pub fn builtin() -> &'static Self {
        static REGISTRY: OnceLock<CityRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            Self::new(vec![
                city("Berlin", 52.5200, 13.4050, "Germany"),
                city("Delhi", 28.7041, 77.1025, "India"),
                city("Mumbai", 19.0760, 72.8777, "India"),
                city("New York", 40.7128, -74.0060, "USA"),
                city("Paris", 48.8566, 2.3522, "France"),
                city("Tokyo", 35.6762, 139.6503, "Japan"),
            ])
        })
    }

    pub fn new(mut cities: Vec<City>) -> Self {
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Self { cities }
    }

    /// Exact-match lookup. `None` means the name is not served at all and
    /// no network request should be made for it.
    pub fn resolve(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }

    /// All supported cities in name order.
    pub fn list_all(&self) -> &[City] {
        &self.cities
    }
}

fn city(name: &str, latitude: f64, longitude: f64, country: &str) -> City {
    City {
        name: name.to_string(),
        latitude,
        longitude,
        country: country.to_string(),
    }
}
