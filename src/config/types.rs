use serde::Deserialize;

/// Main configuration structure for Course-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Platform endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the login endpoints
    #[serde(rename = "auth-base-url")]
    pub auth_base_url: String,

    /// Base URL of the content endpoints
    #[serde(rename = "content-base-url")]
    pub content_base_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_base_url: "https://www.studyiq.net".to_string(),
            content_base_url: "https://backend.studyiq.net".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 10,
        }
    }
}

/// Client identification sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Value of the `platform` header
    pub platform: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "okhttp/4.9.1".to_string(),
            platform: "android".to_string(),
        }
    }
}

/// Authentication behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Operator input starting with this marker is taken as a ready token
    #[serde(rename = "token-prefix")]
    pub token_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_prefix: "eyJ".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the terminal channel delivers manifests into
    pub directory: String,

    /// Maximum length of a manifest file stem
    #[serde(rename = "name-max-length")]
    pub name_max_length: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./manifests".to_string(),
            name_max_length: 50,
        }
    }
}
