use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::ScaffoldError;

pub const LABLOG_BASE_URL: &str =
    "https://raw.githubusercontent.com/GuilleGorines/BU-ISCIII_services/main";

pub fn remote_lablog_url(relative: &str) -> String {
    format!("{LABLOG_BASE_URL}/{}", relative.trim_start_matches('/'))
}

pub trait LablogFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError>;
}

impl<F: LablogFetcher + ?Sized> LablogFetcher for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError> {
        (**self).fetch(url)
    }
}

#[derive(Clone)]
pub struct HttpLablogFetcher {
    client: Client,
}

impl HttpLablogFetcher {
    pub fn new() -> Result<Self, ScaffoldError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("assembly-scaffold/", env!("CARGO_PKG_VERSION"))),
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| ScaffoldError::FetchHttp {
                url: LABLOG_BASE_URL.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl LablogFetcher for HttpLablogFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError> {
        debug!(url, "fetching lablog");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| ScaffoldError::FetchHttp {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ScaffoldError::FetchStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().map_err(|err| ScaffoldError::FetchHttp {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl LablogFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError> {
        Err(ScaffoldError::NetworkDisabled(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn url_joins_base() {
        assert_eq!(
            remote_lablog_url("ASSEMBLY/lablog"),
            "https://raw.githubusercontent.com/GuilleGorines/BU-ISCIII_services/main/ASSEMBLY/lablog"
        );
        assert_eq!(
            remote_lablog_url("/ASSEMBLY/lablog"),
            remote_lablog_url("ASSEMBLY/lablog")
        );
    }

    #[test]
    fn http_fetch_returns_body_verbatim() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ASSEMBLY/lablog")
            .with_status(200)
            .with_body("ln -s a b\n  indented\n")
            .create();

        let fetcher = HttpLablogFetcher::new().unwrap();
        let body = fetcher
            .fetch(&format!("{}/ASSEMBLY/lablog", server.url()))
            .unwrap();

        assert_eq!(body, b"ln -s a b\n  indented\n");
        mock.assert();
    }

    #[test]
    fn http_fetch_keeps_non_utf8_bytes() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/latin1/lablog")
            .with_status(200)
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body(b"echo caf\xe9\n".as_slice())
            .create();

        let fetcher = HttpLablogFetcher::new().unwrap();
        let body = fetcher
            .fetch(&format!("{}/latin1/lablog", server.url()))
            .unwrap();

        assert_eq!(body, b"echo caf\xe9\n");
    }

    #[test]
    fn http_fetch_maps_not_found_to_status_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/missing/lablog")
            .with_status(404)
            .with_body("404: Not Found")
            .create();

        let fetcher = HttpLablogFetcher::new().unwrap();
        let url = format!("{}/missing/lablog", server.url());
        let err = fetcher.fetch(&url).unwrap_err();

        assert_matches!(err, ScaffoldError::FetchStatus { status: 404, .. });
        assert!(err.is_fetch_error());
    }

    #[test]
    fn http_fetch_transport_failure() {
        let fetcher = HttpLablogFetcher::new().unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/lablog").unwrap_err();
        assert_matches!(err, ScaffoldError::FetchHttp { .. });
    }

    #[test]
    fn offline_fetcher_refuses() {
        let err = OfflineFetcher.fetch("https://example.org/lablog").unwrap_err();
        assert_matches!(err, ScaffoldError::NetworkDisabled(_));
        assert!(!err.is_fetch_error());
    }
}
