const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_USER_AGENT: &str = "door-to-door-tool (learning project)";
const DEFAULT_COUNTRY: &str = "Deutschland";

/// Geocoder settings.
///
/// Every value can be overridden through the environment:
/// `GEOCODER_URL`, `GEOCODER_USER_AGENT` and `GEOCODER_COUNTRY`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub user_agent: String,
    /// appended to every lookup query
    pub country: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };
        Self {
            endpoint: var("GEOCODER_URL", defaults.endpoint),
            user_agent: var("GEOCODER_USER_AGENT", defaults.user_agent),
            country: var("GEOCODER_COUNTRY", defaults.country),
        }
    }
}
