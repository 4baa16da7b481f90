use reqwest::Client as HttpClient;
use serde::Deserialize;

/// Client configuration.
///
/// Every field is optional. An unset or empty string falls back to the
/// default behaviour described on each field.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the service (`https://keys.sylabs.io` if not supplied).
    pub base_url: Option<String>,
    /// Token sent as `Authorization: BEARER <token>` on each request.
    pub auth_token: Option<String>,
    /// User agent sent on each request.
    pub user_agent: Option<String>,
    /// HTTP client used to send requests. A shared default is used if not
    /// supplied.
    #[serde(skip)]
    pub http_client: Option<HttpClient>,
}

impl Config {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = Some(http_client);
        self
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "********"))
            .field("user_agent", &self.user_agent)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Returns the value if it is set and non-empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
