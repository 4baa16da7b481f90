use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::Body;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncReadExt;

use crate::Client;

/// Builds a request, sends it with the client's HTTP client and writes the
/// response body to `out`.
///
/// `data` names a file whose content becomes the request body; `-` reads the
/// body from stdin. A non-success status is reported as an error after the
/// body has been written.
#[tracing::instrument(skip(client, data, out))]
pub async fn request(
    client: &Client,
    method: &str,
    path: &str,
    query: &str,
    data: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let body = match data {
        Some(path) => Some(read_body(path).await?),
        None => None,
    };

    let request = client
        .new_request(method, path, query, body)
        .context("Failed to build request")?;
    debug!("Sending {} {}...", request.method(), request.url());

    let response = client
        .http_client()
        .execute(request)
        .await
        .context("Failed to send request to key service")?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .context("Failed to read response from key service")?;
    out.write_all(&bytes)?;
    out.flush()?;

    if !status.is_success() {
        bail!("Key service returned {}", status);
    }

    Ok(())
}

async fn read_body(path: &Path) -> Result<Body> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read request body from stdin")?;
        return Ok(Body::from(buf));
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open request body {:?}", path))?;
    Ok(Body::from(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use mockito::Matcher;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn client_for(url: &str, token: Option<&str>) -> Client {
        let mut config = Config::default().with_base_url(url);
        if let Some(token) = token {
            config = config.with_auth_token(token);
        }
        Client::new(Some(config)).unwrap()
    }

    #[tokio::test]
    async fn test_request_writes_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/pks/lookup?op=get&search=0xAA")
            .match_header("authorization", "BEARER abc123")
            .with_status(200)
            .with_body("-----BEGIN PGP PUBLIC KEY BLOCK-----")
            .create_async()
            .await;

        let client = client_for(&url, Some("abc123"));
        let mut out = Vec::new();
        request(&client, "GET", "/pks/lookup", "op=get&search=0xAA", None, &mut out)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "-----BEGIN PGP PUBLIC KEY BLOCK-----"
        );
    }

    #[tokio::test]
    async fn test_request_sends_file_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/pks/add")
            .match_header("authorization", Matcher::Missing)
            .match_body("keytext=armored")
            .with_status(200)
            .create_async()
            .await;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"keytext=armored").unwrap();

        let client = client_for(&url, None);
        let mut out = Vec::new();
        request(&client, "POST", "/pks/add", "", Some(file.path()), &mut out)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_request_error_status() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/v1/keys")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = client_for(&url, None);
        let mut out = Vec::new();
        let err = request(&client, "GET", "/v1/keys", "", None, &mut out)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.to_string().contains("404"));
        assert_eq!(String::from_utf8(out).unwrap(), "not found");
    }

    #[tokio::test]
    async fn test_request_invalid_method() {
        let client = client_for("https://keys.example.org", None);
        let mut out = Vec::new();
        let err = request(&client, "GE T", "/v1/keys", "", None, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<crate::Error>(),
            Some(crate::Error::RequestConstruction(_))
        ));
    }

    #[tokio::test]
    async fn test_request_missing_body_file() {
        let client = client_for("https://keys.example.org", None);
        let mut out = Vec::new();
        let err = request(
            &client,
            "POST",
            "/pks/add",
            "",
            Some(Path::new("/nonexistent/key.asc")),
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Failed to open request body"));
    }
}
