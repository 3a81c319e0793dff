use std::future::Future;
use std::time::Duration;

use pulldown_cmark_escape::{escape_href, escape_html};
use serde::Deserialize;
use serde_json::Value;

use super::error::LinkServiceError;
use super::preview::{LinkPreview, fallback_preview};
use sedoc_common::{Config, SedocError};

/// Looks up title/description/thumbnail for a link.
///
/// Implementations can call a remote service, consult a cache, or return
/// canned data in tests.
pub trait LinkPreviewResolver {
    fn fetch_preview(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<LinkPreview, LinkServiceError>>;
}

/// Turns a snippet of HTML into editor components.
pub trait Upconverter {
    /// Components come back as raw JSON; they are already in the editor's
    /// schema and are passed through untouched.
    fn upconvert(&self, html: &str) -> impl Future<Output = Result<Vec<Value>, LinkServiceError>>;
}

/// No services configured: everything falls back to local output.
impl LinkPreviewResolver for () {
    async fn fetch_preview(&self, _url: &str) -> Result<LinkPreview, LinkServiceError> {
        Err(LinkServiceError::Disabled)
    }
}

impl Upconverter for () {
    async fn upconvert(&self, _html: &str) -> Result<Vec<Value>, LinkServiceError> {
        Err(LinkServiceError::Disabled)
    }
}

#[derive(Debug, Deserialize)]
struct PreviewEnvelope {
    result: Option<PreviewResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResult {
    title: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    domain: Option<String>,
    url: Option<String>,
    video: Option<bool>,
    site_name: Option<String>,
    oglink_sign: Option<String>,
}

impl PreviewResult {
    /// Merge over the locally derived preview so missing fields stay sensible.
    fn into_preview(self, url: &str) -> LinkPreview {
        let base = fallback_preview(url);
        LinkPreview {
            title: self.title.filter(|t| !t.is_empty()).unwrap_or(base.title),
            domain: self.domain.unwrap_or(base.domain),
            url: self.url.unwrap_or(base.url),
            thumbnail_url: self.image_url.unwrap_or(base.thumbnail_url),
            description: self.description.unwrap_or(base.description),
            is_video: self.video.unwrap_or(base.is_video),
            site_name: self.site_name.unwrap_or(base.site_name),
            sign: self.oglink_sign,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpconvertResponse {
    #[serde(default)]
    components: Vec<Value>,
}

/// Preview and upconversion over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLinkServices {
    client: reqwest::Client,
    preview_endpoint: String,
    upconvert_endpoint: String,
}

impl HttpLinkServices {
    pub fn new(
        client: reqwest::Client,
        preview_endpoint: impl Into<String>,
        upconvert_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            preview_endpoint: preview_endpoint.into(),
            upconvert_endpoint: upconvert_endpoint.into(),
        }
    }

    /// Build a client with the configured timeout. A hung service blocks a
    /// synthesis call for at most this long per link.
    pub fn from_config(config: &Config) -> Result<Self, SedocError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::new(
            client,
            config.preview_endpoint.clone(),
            config.upconvert_endpoint.clone(),
        ))
    }

    async fn read_body(
        &self,
        endpoint: &str,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<String, LinkServiceError> {
        let response = response.map_err(|source| LinkServiceError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(LinkServiceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|source| LinkServiceError::Request {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

impl LinkPreviewResolver for HttpLinkServices {
    async fn fetch_preview(&self, url: &str) -> Result<LinkPreview, LinkServiceError> {
        let endpoint = self.preview_endpoint.as_str();
        tracing::debug!(%url, endpoint, "fetching link preview");
        let response = self
            .client
            .get(endpoint)
            .query(&[("url", url)])
            .send()
            .await;
        let body = self.read_body(endpoint, response).await?;
        let envelope: PreviewEnvelope =
            serde_json::from_str(&body).map_err(|source| LinkServiceError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
        envelope
            .result
            .map(|result| result.into_preview(url))
            .ok_or_else(|| LinkServiceError::Empty {
                endpoint: endpoint.to_string(),
            })
    }
}

impl Upconverter for HttpLinkServices {
    async fn upconvert(&self, html: &str) -> Result<Vec<Value>, LinkServiceError> {
        let endpoint = self.upconvert_endpoint.as_str();
        tracing::debug!(endpoint, "upconverting html");
        let response = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({ "html": html }))
            .send()
            .await;
        let body = self.read_body(endpoint, response).await?;
        let parsed: UpconvertResponse =
            serde_json::from_str(&body).map_err(|source| LinkServiceError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
        if parsed.components.is_empty() {
            return Err(LinkServiceError::Empty {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(parsed.components)
    }
}

/// `<a href="url">text</a>`, the input the upconversion service expects.
pub fn anchor_html(text: &str, url: &str) -> String {
    let mut out = String::with_capacity(text.len() + url.len() + 15);
    // writes into a String never fail
    out.push_str("<a href=\"");
    let _ = escape_href(&mut out, url);
    out.push_str("\">");
    let _ = escape_html(&mut out, text);
    out.push_str("</a>");
    out
}
