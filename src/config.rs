//! Runtime settings from the environment (`.env` supported).
//!
//! CLI flags override whatever is loaded here; see `app::settings_from_args`.

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BANNER_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// How long an error banner stays on screen.
    pub banner_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            banner_ttl: Duration::from_secs(DEFAULT_BANNER_SECS),
        }
    }
}

impl Settings {
    /// Load `DASH_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Settings::default();

        if let Some(url) = lookup("DASH_BACKEND_URL").filter(|v| !v.trim().is_empty()) {
            settings.backend_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("DASH_TIMEOUT_SECS") {
            settings.timeout = Duration::from_secs(parse_secs("DASH_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("DASH_BANNER_SECS") {
            settings.banner_ttl = Duration::from_secs(parse_secs("DASH_BANNER_SECS", &raw)?);
        }

        Ok(settings)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::new(
            2,
            format!("Invalid {key}='{raw}' (expected a positive number of seconds)."),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let settings = load(&[
            ("DASH_BACKEND_URL", "http://sales.internal:8080"),
            ("DASH_TIMEOUT_SECS", "3"),
            ("DASH_BANNER_SECS", "8"),
        ])
        .unwrap();
        assert_eq!(settings.backend_url, "http://sales.internal:8080");
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.banner_ttl, Duration::from_secs(8));
    }

    #[test]
    fn rejects_bad_durations() {
        assert_eq!(load(&[("DASH_TIMEOUT_SECS", "soon")]).unwrap_err().exit_code(), 2);
        assert!(load(&[("DASH_BANNER_SECS", "0")]).is_err());
    }
}
