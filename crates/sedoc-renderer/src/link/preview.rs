//! Link preview data and the never-failing resolution boundary.

use serde::{Deserialize, Serialize};
use url::Url;

use super::client::LinkPreviewResolver;
use sedoc_common::LinkMode;

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

const YOUTUBE_DESCRIPTION: &str = "YouTube에서 마음에 드는 동영상과 음악을 감상하고, 직접 만든 콘텐츠를 업로드하여 친구, 가족뿐만 아니라 전 세계 사람들과 콘텐츠를 공유할 수 있습니다.";
const NAVER_BLOG_TITLE: &str = "네이버 블로그";
const NAVER_BLOG_DESCRIPTION: &str =
    "네이버 블로그에서 일상과 관심사를 기록하고 이웃과 이야기를 나눠 보세요.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPreview {
    pub title: String,
    pub domain: String,
    pub url: String,
    pub thumbnail_url: String,
    pub description: String,
    pub is_video: bool,
    pub site_name: String,
    /// Server-issued signature for the card, only present on live results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
}

fn domain_of(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or(url).to_string(),
        Err(_) => url
            .split_once("://")
            .map_or(url, |(_, rest)| rest)
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(url)
            .to_string(),
    }
}

fn favicon_url(domain: &str) -> String {
    format!("{FAVICON_SERVICE}?domain={domain}&sz=128")
}

/// `host` is `domain` itself or one of its subdomains.
fn host_is(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn is_youtube(host: &str) -> bool {
    host_is(host, "youtube.com") || host_is(host, "youtu.be")
}

/// Preview derived from the URL alone.
pub fn fallback_preview(url: &str) -> LinkPreview {
    let domain = domain_of(url);
    let thumbnail_url = favicon_url(&domain);

    let (title, description, is_video) = if is_youtube(&domain) {
        ("YouTube".to_string(), YOUTUBE_DESCRIPTION.to_string(), true)
    } else if domain == "blog.naver.com" || domain == "m.blog.naver.com" {
        (
            NAVER_BLOG_TITLE.to_string(),
            NAVER_BLOG_DESCRIPTION.to_string(),
            false,
        )
    } else {
        (domain.clone(), String::new(), false)
    };

    LinkPreview {
        site_name: title.clone(),
        title,
        domain,
        url: url.to_string(),
        thumbnail_url,
        description,
        is_video,
        sign: None,
    }
}

/// Resolve a preview for `url`. Never fails: `Simple` mode skips the network
/// entirely, and any service error is logged and replaced by
/// [`fallback_preview`].
pub async fn resolve_preview<R>(resolver: &R, url: &str, mode: LinkMode) -> LinkPreview
where
    R: LinkPreviewResolver + ?Sized,
{
    if mode == LinkMode::Simple {
        return fallback_preview(url);
    }
    match resolver.fetch_preview(url).await {
        Ok(preview) => preview,
        Err(err) => {
            tracing::warn!(%url, error = %err, "link preview unavailable, using fallback");
            fallback_preview(url)
        }
    }
}

fn is_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video id from the common YouTube URL shapes.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let id = if host_is(&host, "youtu.be") {
        segments.next()?.to_string()
    } else if host_is(&host, "youtube.com") {
        match segments.next()? {
            "watch" => parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned())?,
            "shorts" | "embed" | "live" | "v" => segments.next()?.to_string(),
            _ => return None,
        }
    } else {
        return None;
    };

    is_video_id(&id).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkServiceError;

    #[test]
    fn youtube_fallback() {
        let preview = fallback_preview("https://www.youtube.com/watch?v=abc");
        assert_eq!(preview.title, "YouTube");
        assert!(preview.is_video);
        assert_eq!(preview.domain, "www.youtube.com");
        assert!(!preview.description.is_empty());
    }

    #[test]
    fn lookalike_hosts_are_not_youtube() {
        for url in ["https://notyoutube.com/watch?v=abc", "https://fakeyoutu.be/abc"] {
            let preview = fallback_preview(url);
            assert!(!preview.is_video, "url: {url}");
            assert_ne!(preview.title, "YouTube", "url: {url}");
        }
        assert!(fallback_preview("https://m.youtube.com/watch?v=abc").is_video);
    }

    #[test]
    fn blog_fallback() {
        let preview = fallback_preview("https://blog.naver.com/someone/1234");
        assert_eq!(preview.title, NAVER_BLOG_TITLE);
        assert!(!preview.is_video);
        assert_eq!(preview.description, NAVER_BLOG_DESCRIPTION);
    }

    #[test]
    fn generic_fallback_uses_domain() {
        let preview = fallback_preview("https://example.com/some/page");
        assert_eq!(preview.title, "example.com");
        assert_eq!(preview.site_name, "example.com");
        assert_eq!(preview.description, "");
        assert_eq!(
            preview.thumbnail_url,
            "https://www.google.com/s2/favicons?domain=example.com&sz=128"
        );
        assert_eq!(preview.url, "https://example.com/some/page");
    }

    #[test]
    fn fallback_on_unparseable_url() {
        let preview = fallback_preview("example.org/path?q=1");
        assert_eq!(preview.domain, "example.org");
    }

    #[test]
    fn video_ids() {
        let cases = [
            ("https://youtu.be/dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/watch?v=abc_123&t=5", Some("abc_123")),
            ("https://youtube.com/shorts/XyZ-9", Some("XyZ-9")),
            ("https://www.youtube.com/embed/e1", Some("e1")),
            ("https://www.youtube.com/channel/foo", None),
            ("https://www.youtube.com/watch", None),
            ("https://example.com/watch?v=abc", None),
            ("https://notyoutube.com/watch?v=abc", None),
            ("https://m.youtu.be.example.com/abc", None),
            ("not a url", None),
        ];
        for (url, expected) in cases {
            assert_eq!(youtube_video_id(url).as_deref(), expected, "url: {url}");
        }
    }

    struct Fixed(LinkPreview);

    impl LinkPreviewResolver for Fixed {
        async fn fetch_preview(&self, _url: &str) -> Result<LinkPreview, LinkServiceError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn simple_mode_skips_resolver() {
        let mut live = fallback_preview("https://example.com");
        live.title = "Live title".into();
        let resolver = Fixed(live);

        let simple = resolve_preview(&resolver, "https://example.com", LinkMode::Simple).await;
        assert_eq!(simple.title, "example.com");

        let card = resolve_preview(&resolver, "https://example.com", LinkMode::OglinkCard).await;
        assert_eq!(card.title, "Live title");
    }

    #[tokio::test]
    async fn disabled_resolver_falls_back() {
        let preview =
            resolve_preview(&(), "https://www.youtube.com/watch?v=a", LinkMode::Upconvert).await;
        assert_eq!(preview.title, "YouTube");
    }
}
