//! Base URL scheme handling.
//!
//! Key servers are commonly addressed with the HKP scheme names. HKP is plain
//! HTTP on port 11371 and HKPS is HTTPS, so both are rewritten to the scheme
//! the transport understands before a client is built.

use url::{ParseError, Position, Url};

use crate::error::{Error, Result};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://keys.sylabs.io";

/// Port implied by the `hkp` scheme.
pub const HKP_DEFAULT_PORT: u16 = 11371;

/// Returns a copy of `url` with its scheme mapped onto `http` or `https`.
///
/// | input   | output  | port when none is given |
/// |---------|---------|-------------------------|
/// | `http`  | `http`  | unchanged               |
/// | `https` | `https` | unchanged               |
/// | `hkp`   | `http`  | `11371`                 |
/// | `hkps`  | `https` | implicit 443            |
///
/// Any other scheme yields [`Error::UnsupportedScheme`]. The input is left
/// untouched so callers can still report on it.
pub fn normalize_url(url: &Url) -> Result<Url> {
    match url.scheme() {
        "http" | "https" => Ok(url.clone()),
        "hkp" => {
            let mut normalized = with_scheme(url, "http")?;
            if url.port().is_none() {
                normalized
                    .set_port(Some(HKP_DEFAULT_PORT))
                    .map_err(|()| Error::InvalidBaseUrl {
                        url: normalized.to_string(),
                        source: ParseError::EmptyHost,
                    })?;
            }
            Ok(normalized)
        }
        "hkps" => with_scheme(url, "https"),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}

/// Re-parses `url` under a different scheme.
///
/// `Url::set_scheme` refuses to switch between special and non-special
/// schemes, so the URL is rebuilt from its serialization instead. The URL
/// must already have a host: http(s) parsing would otherwise read the start
/// of the path as one.
fn with_scheme(url: &Url, scheme: &str) -> Result<Url> {
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidBaseUrl {
            url: url.to_string(),
            source: ParseError::EmptyHost,
        });
    }

    let rewritten = format!("{}{}", scheme, &url[Position::AfterScheme..]);
    Url::parse(&rewritten).map_err(|source| Error::InvalidBaseUrl {
        url: rewritten,
        source,
    })
}
