use std::time::Duration;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use nd_core::Result;
use tracing::debug;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client dressed up as a browser. Some news sites refuse anything else.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fa,en-US;q=0.9,en;q=0.8"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` with `headers` on top of the defaults. A `406 Not Acceptable`
    /// is retried once asking for an uncompressed body.
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<Response> {
        let response = self.client.get(url).headers(headers.clone()).send().await?;
        let response = if response.status() == StatusCode::NOT_ACCEPTABLE {
            debug!("406 from {}, retrying with identity encoding", url);
            self.client
                .get(url)
                .headers(headers.clone())
                .header(ACCEPT_ENCODING, "identity")
                .send()
                .await?
        } else {
            response
        };
        Ok(response.error_for_status()?)
    }

    pub async fn get_html(&self, url: &str, headers: &HeaderMap) -> Result<String> {
        Ok(self.get(url, headers).await?.text().await?)
    }

    pub async fn get_bytes(&self, url: &str, headers: &HeaderMap) -> Result<Vec<u8>> {
        Ok(self.get(url, headers).await?.bytes().await?.to_vec())
    }
}
