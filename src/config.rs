use std::path::PathBuf;

/// Client configuration loaded from environment variables (a `.env` file is
/// honored via dotenvy at startup).
pub struct Config {
    /// Base URL of the prompt backend.
    pub api_url: String,
    /// Bearer token override; when set, the credential file is ignored.
    pub token_override: Option<String>,
    /// Directory for the credential file and the TUI log.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_raw_values(
            std::env::var("PROMPTDECK_API_URL").ok().as_deref(),
            std::env::var("PROMPTDECK_TOKEN").ok().as_deref(),
            std::env::var("PROMPTDECK_DATA_DIR").ok().as_deref(),
        )
    }

    /// Build a Config from raw string values (as they would come from env
    /// vars). Used directly in tests to avoid mutating process-global
    /// environment.
    pub fn from_raw_values(
        api_url: Option<&str>,
        token: Option<&str>,
        data_dir: Option<&str>,
    ) -> Self {
        let api_url = api_url
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "http://localhost:8000".to_string());

        let token_override = token.filter(|s| !s.is_empty()).map(String::from);

        let data_dir = data_dir
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".promptdeck")
            });

        Config {
            api_url,
            token_override,
            data_dir,
        }
    }
}
