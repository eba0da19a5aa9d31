use thiserror::Error;
use url::Url;

/// Fatal configuration problems. The process must not start when any of
/// these occur.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BAASIX_URL is required")]
    MissingBaseUrl,
    #[error("BAASIX_URL is not a valid URL: {0}")]
    InvalidBaseUrl(String),
    #[error("BAASIX_EMAIL and BAASIX_PASSWORD must be set together")]
    IncompleteLogin,
    #[error("tool catalog wiring is incomplete: no handler for {0}")]
    IncompleteWiring(String),
}

/// Static credential configuration, resolved once at startup and never
/// mutated afterwards. An explicit token always wins over email/password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub base_url: Url,
    pub token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            email: None,
            password: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_login(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Reads BAASIX_URL, BAASIX_AUTH_TOKEN, BAASIX_EMAIL and BAASIX_PASSWORD.
    ///
    /// A base URL with no credential at all is accepted: the process starts
    /// and every authenticated call then fails per-invocation. A partial
    /// email/password pair is rejected here.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env_trimmed("BAASIX_URL").ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = parse_base_url(&raw_url)?;

        let token = env_trimmed("BAASIX_AUTH_TOKEN");
        let email = env_trimmed("BAASIX_EMAIL");
        let password = env_trimmed("BAASIX_PASSWORD");
        if email.is_some() != password.is_some() {
            return Err(ConfigError::IncompleteLogin);
        }

        Ok(Self {
            base_url,
            token,
            email,
            password,
        })
    }

    /// Base URL as an origin + path string without a trailing slash, ready
    /// for endpoint concatenation.
    pub fn base(&self) -> String {
        let normalized = format!(
            "{}{}",
            self.base_url.origin().ascii_serialization(),
            self.base_url.path()
        );
        normalized.trim_end_matches('/').to_string()
    }

    pub fn has_explicit_token(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    pub fn has_login(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
