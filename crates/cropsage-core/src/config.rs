use crate::app_config::AppConfig;
use crate::{ConfigError, Coordinates, Language};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, raw: &str| -> Result<f64, ConfigError> {
        let value = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let api_base_url = or_default("CROPSAGE_API_BASE_URL", "http://127.0.0.1:8000/api/");
    let translate_url = or_default(
        "CROPSAGE_TRANSLATE_URL",
        "https://api.mymemory.translated.net/get",
    );
    let request_timeout_secs = parse_u64("CROPSAGE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CROPSAGE_USER_AGENT", "cropsage/0.1 (crop-diagnosis)");
    let log_level = or_default("CROPSAGE_LOG_LEVEL", "info");

    let default_language = or_default("CROPSAGE_DEFAULT_LANG", "en")
        .parse::<Language>()
        .map_err(|e| invalid("CROPSAGE_DEFAULT_LANG", e.to_string()))?;

    let token_path = PathBuf::from(or_default("CROPSAGE_TOKEN_PATH", "./.cropsage_token"));

    let location = match (optional("CROPSAGE_LATITUDE"), optional("CROPSAGE_LONGITUDE")) {
        (Some(lat), Some(lng)) => {
            let latitude = parse_f64("CROPSAGE_LATITUDE", &lat)?;
            let longitude = parse_f64("CROPSAGE_LONGITUDE", &lng)?;
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(invalid(
                    "CROPSAGE_LATITUDE",
                    format!("{latitude} is outside -90..=90"),
                ));
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(invalid(
                    "CROPSAGE_LONGITUDE",
                    format!("{longitude} is outside -180..=180"),
                ));
            }
            Some(Coordinates::new(latitude, longitude))
        }
        (None, None) => None,
        (Some(_), None) => {
            return Err(invalid(
                "CROPSAGE_LONGITUDE",
                "must be set together with CROPSAGE_LATITUDE".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(invalid(
                "CROPSAGE_LATITUDE",
                "must be set together with CROPSAGE_LONGITUDE".to_string(),
            ))
        }
    };

    let tts_command = optional("CROPSAGE_TTS_COMMAND");
    let stt_command = optional("CROPSAGE_STT_COMMAND");

    Ok(AppConfig {
        api_base_url,
        translate_url,
        request_timeout_secs,
        user_agent,
        log_level,
        default_language,
        token_path,
        location,
        tts_command,
        stt_command,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
