//! Key service client and request builder.

use std::sync::LazyLock;

use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{
    Body, Client as HttpClient, Method, Request,
    header::{AUTHORIZATION, HeaderValue, USER_AGENT},
};
use url::Url;

use crate::config::{Config, non_empty};
use crate::error::{Error, Result};
use crate::scheme::{DEFAULT_BASE_URL, normalize_url};

/// Characters left as-is in a request path: unreserved characters,
/// sub-delimiters, `:`, `@` and the `/` separator. Everything else,
/// including `%`, `?` and `#`, is percent-encoded.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@')
    .remove(b'/');

/// Transport shared by every client that was not given its own.
static DEFAULT_HTTP_CLIENT: LazyLock<HttpClient> = LazyLock::new(HttpClient::new);

/// Returns a handle to the process-wide default HTTP client.
pub fn default_http_client() -> HttpClient {
    DEFAULT_HTTP_CLIENT.clone()
}

/// Key service client.
///
/// Holds a validated base URL (always `http` or `https`) and the values
/// attached to every request. A `Client` is never modified after
/// construction and can be shared freely between tasks.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    auth_token: Option<String>,
    user_agent: Option<String>,
    http_client: HttpClient,
}

impl Client {
    /// Sets up a new client from `config`, or from the default configuration
    /// if `None` is given.
    ///
    /// Legacy `hkp`/`hkps` base URLs are rewritten to `http`/`https`. No
    /// network I/O takes place.
    #[tracing::instrument(skip(config))]
    pub fn new(config: Option<Config>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let base_url = match non_empty(config.base_url) {
            Some(base_url) => base_url,
            None => DEFAULT_BASE_URL.to_string(),
        };
        let parsed = Url::parse(&base_url).map_err(|source| Error::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;
        let base_url = normalize_url(&parsed)?;

        debug!("Using key service at {}", base_url);

        let http_client = config.http_client.unwrap_or_else(default_http_client);

        Ok(Self {
            base_url,
            auth_token: non_empty(config.auth_token),
            user_agent: non_empty(config.user_agent),
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns the HTTP client requests are meant to be sent with.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Resolves `path` and `raw_query` against the base URL.
    ///
    /// `path` is a decoded path and is percent-encoded before resolution, so
    /// it always stays a path: it can replace the base path but never the
    /// scheme, host or port. `raw_query` is used as the query string when
    /// non-empty.
    pub fn resolve_url(&self, path: &str, raw_query: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&relative_reference(path))
            .map_err(Error::request_construction)?;
        if !raw_query.is_empty() {
            url.set_query(Some(raw_query));
        }
        url.set_fragment(None);
        Ok(url)
    }

    /// Builds a request for `method` on `path`, with `raw_query` and an
    /// optional body.
    ///
    /// The `Authorization` and `User-Agent` headers are set when the client
    /// carries a token or a user agent. The request is returned unsent.
    #[tracing::instrument(skip(self, body))]
    pub fn new_request(
        &self,
        method: &str,
        path: &str,
        raw_query: &str,
        body: Option<Body>,
    ) -> Result<Request> {
        let method = Method::from_bytes(method.as_bytes()).map_err(Error::request_construction)?;
        let url = self.resolve_url(path, raw_query)?;

        debug!("Building {} request for {}...", method, url);

        let mut builder = self.http_client.request(method, url);
        if let Some(token) = &self.auth_token {
            let mut value = HeaderValue::from_str(&format!("BEARER {}", token))
                .map_err(Error::request_construction)?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(user_agent) = &self.user_agent {
            let value = HeaderValue::from_str(user_agent).map_err(Error::request_construction)?;
            builder = builder.header(USER_AGENT, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder.build().map_err(Error::request_construction)
    }
}

impl TryFrom<Config> for Client {
    type Error = Error;

    fn try_from(config: Config) -> Result<Self> {
        Client::new(Some(config))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("auth_token", &self.auth_token.as_ref().map(|_| "********"))
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Turns a decoded path into a relative reference that can only resolve to a
/// path on the base URL's authority.
fn relative_reference(path: &str) -> String {
    let encoded = utf8_percent_encode(path, PATH_ENCODE_SET).to_string();

    if encoded.starts_with("//") {
        // "//host" would otherwise be a network-path reference.
        format!("/.{}", encoded)
    } else if !encoded.starts_with('/')
        && encoded
            .split('/')
            .next()
            .is_some_and(|segment| segment.contains(':'))
    {
        // A colon in the first segment would otherwise be read as a scheme.
        format!("./{}", encoded)
    } else {
        encoded
    }
}
