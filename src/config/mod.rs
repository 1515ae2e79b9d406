use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::i18n::Language;
use crate::models::Settings;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Reads the process environment after loading a `.env` file, if present.
/// Variables already set win over the file.
pub fn load_settings() -> Settings {
    dotenv::dotenv().ok();
    load_settings_from(|key| env::var(key).ok())
}

pub fn load_settings_from_file(path: &Path) -> Settings {
    if let Err(err) = dotenv::from_path(path) {
        warn!("Could not load {}: {}", path.display(), err);
    }
    load_settings_from(|key| env::var(key).ok())
}

/// `lookup` resolves a variable name to its value; blank values count as
/// unset.
pub fn load_settings_from<F>(lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let api_key = get("FACTURIA_API_KEY").or_else(|| get("API_KEY"));
    let key_endpoint = get("FACTURIA_KEY_ENDPOINT");
    let api_base = get("FACTURIA_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let model = get("FACTURIA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let request_timeout_secs = parsed_or(
        get("FACTURIA_TIMEOUT_SECS"),
        "FACTURIA_TIMEOUT_SECS",
        DEFAULT_TIMEOUT_SECS,
    )
    .max(1);
    let language = parsed_or(get("FACTURIA_LANGUAGE"), "FACTURIA_LANGUAGE", Language::default());

    Settings {
        api_key,
        key_endpoint,
        api_base,
        model,
        request_timeout_secs,
        language,
    }
}

fn parsed_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(|raw| raw.parse::<T>()) {
        Some(Ok(parsed)) => parsed,
        Some(Err(err)) => {
            warn!("Ignoring {}: {}", key, err);
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_settings_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_load() {
        let settings = load(&[]);
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.key_endpoint, None);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.request_timeout_secs, 25);
        assert_eq!(settings.language, Language::Es);
    }

    #[test]
    fn reads_overrides() {
        let settings = load(&[
            ("FACTURIA_API_KEY", " key-1 "),
            ("FACTURIA_KEY_ENDPOINT", "https://app.example/api/get-key"),
            ("FACTURIA_TIMEOUT_SECS", "15"),
            ("FACTURIA_LANGUAGE", "en"),
        ]);
        assert_eq!(settings.api_key.as_deref(), Some("key-1"));
        assert_eq!(settings.key_endpoint.as_deref(), Some("https://app.example/api/get-key"));
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn falls_back_to_plain_api_key() {
        assert_eq!(load(&[("API_KEY", "legacy")]).api_key.as_deref(), Some("legacy"));
        let both = load(&[("API_KEY", "legacy"), ("FACTURIA_API_KEY", "new")]);
        assert_eq!(both.api_key.as_deref(), Some("new"));
        assert_eq!(load(&[("FACTURIA_API_KEY", "  ")]).api_key, None);
    }

    #[test]
    fn reads_env_file() {
        let path = env::temp_dir().join(format!("facturia-{}.env", std::process::id()));
        std::fs::write(&path, "FACTURIA_MODEL=gemini-from-env-file\n").unwrap();
        let settings = load_settings_from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.model, "gemini-from-env-file");
    }

    #[test]
    fn missing_env_file_keeps_defaults() {
        let path = env::temp_dir().join("facturia-does-not-exist.env");
        let settings = load_settings_from_file(&path);
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_values_use_defaults() {
        let settings = load(&[
            ("FACTURIA_TIMEOUT_SECS", "soon"),
            ("FACTURIA_LANGUAGE", "klingon"),
        ]);
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.language, Language::Es);
        assert_eq!(load(&[("FACTURIA_TIMEOUT_SECS", "0")]).request_timeout_secs, 1);
    }
}
