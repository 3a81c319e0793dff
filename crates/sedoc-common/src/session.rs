//! Explicit session state for whoever submits documents.
//!
//! The renderer never looks at this; it exists so the submission layer has a
//! plain value to carry cookies and the target blog around instead of a
//! global.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BLOG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"blog\.naver\.com/([^/?#]+)").unwrap());

/// Path segments under the blog host that are editor endpoints, not blog ids.
const RESERVED_SEGMENTS: &[&str] = &["PostView.naver", "RabbitWrite.naver"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    pub blog_id: Option<String>,
    pub cookies: BTreeMap<String, String>,
}

impl EditorSession {
    /// Build a session from a `document.cookie` style string and, optionally,
    /// the page URL the cookies were read from.
    pub fn from_cookie_header(header: &str, page_url: Option<&str>) -> Self {
        Self {
            blog_id: page_url.and_then(blog_id_from_url),
            cookies: Self::parse_cookies(header),
        }
    }

    /// Split `name=value; name2=value2` into a map, percent-decoding values.
    /// Pairs with an empty name or value are dropped.
    pub fn parse_cookies(header: &str) -> BTreeMap<String, String> {
        header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    return None;
                }
                let decoded = percent_decode_str(value).decode_utf8_lossy().into_owned();
                Some((name.to_string(), decoded))
            })
            .collect()
    }

    pub fn is_logged_in(&self) -> bool {
        !self.cookies.is_empty()
    }

    /// Render the cookies back into a `Cookie` header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Pull the blog id out of a `blog.naver.com/<id>` URL.
pub fn blog_id_from_url(url: &str) -> Option<String> {
    let caps = BLOG_ID_RE.captures(url)?;
    let segment = caps.get(1)?.as_str();
    if RESERVED_SEGMENTS.contains(&segment) {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cookie_pairs() {
        let cookies = EditorSession::parse_cookies("NID_AUT=abc; NID_SES=x%20y;  empty=; =nope");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["NID_AUT"], "abc");
        assert_eq!(cookies["NID_SES"], "x y");
    }

    #[test]
    fn values_may_contain_equals() {
        let cookies = EditorSession::parse_cookies("token=a=b=c");
        assert_eq!(cookies["token"], "a=b=c");
    }

    #[test]
    fn blank_header_is_logged_out() {
        let session = EditorSession::from_cookie_header("", None);
        assert!(!session.is_logged_in());
        assert_eq!(session.blog_id, None);
    }

    #[test]
    fn blog_id_from_page_url() {
        assert_eq!(
            blog_id_from_url("https://blog.naver.com/someone?tab=1").as_deref(),
            Some("someone")
        );
        assert_eq!(
            blog_id_from_url("https://blog.naver.com/someone/223344").as_deref(),
            Some("someone")
        );
        assert_eq!(blog_id_from_url("https://blog.naver.com/PostView.naver?x=1"), None);
        assert_eq!(blog_id_from_url("https://blog.naver.com/RabbitWrite.naver"), None);
        assert_eq!(blog_id_from_url("https://example.com/someone"), None);
    }

    #[test]
    fn session_round_trips_cookie_header() {
        let session =
            EditorSession::from_cookie_header("b=2; a=1", Some("https://blog.naver.com/me"));
        assert!(session.is_logged_in());
        assert_eq!(session.blog_id.as_deref(), Some("me"));
        assert_eq!(session.cookie_header(), "a=1; b=2");
    }
}
