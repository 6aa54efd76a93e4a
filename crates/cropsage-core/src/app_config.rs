use std::path::PathBuf;

use crate::{Coordinates, Language};

#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub translate_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
    pub default_language: Language,
    pub token_path: PathBuf,
    /// Position reported by the configured geolocation provider, if any.
    pub location: Option<Coordinates>,
    pub tts_command: Option<String>,
    pub stt_command: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("translate_url", &self.translate_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .field("default_language", &self.default_language)
            .field("token_path", &self.token_path)
            // Coarse only: the exact position is personal data.
            .field("location", &self.location.map(|_| "[set]"))
            .field("tts_command", &self.tts_command)
            .field("stt_command", &self.stt_command)
            .finish()
    }
}
