//! Fallback resolver: the URL itself serves the file.
//!
//! Also provides [`open_direct`], the last step of every HTTP-based host
//! once it has found the real file URL.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use tracing::debug;

use crate::download::filename::{filename_from_url, is_html_content_type, parse_content_disposition};

use super::{HttpByteSource, ResolveError, ResolveStep, ResolvedDownload, Resolver};

/// Opens `url` with a GET and wraps the body as a download.
///
/// The filename comes from `Content-Disposition` when present, otherwise
/// from the last path segment of the final (post-redirect) URL. Only headers
/// are read here; the body stays unconsumed.
///
/// # Errors
///
/// Returns [`ResolveError::HttpStatus`] for error statuses and
/// [`ResolveError::HostUnavailable`] when the host answers with an HTML page
/// or no filename can be derived.
#[tracing::instrument(skip(client))]
pub async fn open_direct(
    client: &Client,
    resolver: &str,
    url: &str,
) -> Result<ResolvedDownload, ResolveError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ResolveError::network(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::http_status(url, status.as_u16()));
    }

    let headers = response.headers();
    if headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(is_html_content_type)
    {
        return Err(ResolveError::host_unavailable(
            resolver,
            url,
            "host returned an HTML page instead of a file",
        ));
    }

    let from_header = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_disposition);
    let file_name = from_header
        .or_else(|| filename_from_url(response.url().as_str()))
        .ok_or_else(|| ResolveError::host_unavailable(resolver, url, "no filename available"))?;

    let expected_size = response.content_length();
    debug!(file_name = %file_name, expected_size = ?expected_size, "transfer opened");

    Ok(ResolvedDownload {
        file_name,
        expected_size,
        source: Box::new(HttpByteSource::new(response)),
    })
}

/// Resolver for URLs on hosts with no dedicated strategy.
#[derive(Debug, Clone)]
pub struct DirectResolver {
    client: Client,
}

impl DirectResolver {
    /// Creates a new `DirectResolver` over the download client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resolver for DirectResolver {
    fn name(&self) -> &'static str {
        "fallback"
    }

    #[tracing::instrument(skip(self), fields(resolver = "fallback"))]
    async fn resolve(&self, url: &str) -> Result<ResolveStep, ResolveError> {
        open_direct(&self.client, self.name(), url)
            .await
            .map(ResolveStep::Download)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn resolve(url: &str) -> Result<ResolvedDownload, ResolveError> {
        match DirectResolver::new(Client::new()).resolve(url).await? {
            ResolveStep::Download(download) => Ok(download),
            ResolveStep::Redirect(to) => panic!("unexpected redirect to {to}"),
        }
    }

    #[tokio::test]
    async fn test_direct_uses_content_disposition_and_length() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl/123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "Content-Disposition",
                        r#"attachment; filename="Saga%20054.cbr""#,
                    )
                    .set_body_bytes(vec![1_u8; 10]),
            )
            .mount(&server)
            .await;

        let download = resolve(&format!("{}/dl/123", server.uri())).await.unwrap();
        assert_eq!(download.file_name, "Saga 054.cbr");
        assert_eq!(download.expected_size, Some(10));
    }

    #[tokio::test]
    async fn test_fallback_uses_decoded_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/Batman%20001.cbz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0_u8; 4]))
            .mount(&server)
            .await;

        let download = resolve(&format!("{}/files/Batman%20001.cbz", server.uri()))
            .await
            .unwrap();
        assert_eq!(download.file_name, "Batman 001.cbz");
    }

    #[tokio::test]
    async fn test_html_response_is_host_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>file removed</html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let err = resolve(&format!("{}/files/gone.cbr", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::HostUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = resolve(&format!("{}/files/missing.cbr", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::HttpStatus { status: 404, .. }));
    }
}
