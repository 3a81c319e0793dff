use serde::{Deserialize, Serialize};
use url::Url;

/// Host tokens for video platforms that get embed treatment.
pub const VIDEO_HOST_TOKENS: &[&str] = &["youtube.com", "youtu.be"];

/// Path suffixes treated as direct image links.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg", ".avif",
];

/// Image CDNs whose URLs often carry no extension.
pub const IMAGE_HOST_TOKENS: &[&str] = &[
    "pstatic.net",
    "pixabay.com",
    "images.unsplash.com",
    "i.imgur.com",
    "googleusercontent.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Image,
    Video,
    Generic,
}

/// Host and path of a link, lowercased. Unparseable input is split by hand
/// so relative or scheme-less links still get a sensible answer.
fn host_and_path(url: &str) -> (String, String) {
    if let Ok(parsed) = Url::parse(url) {
        let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
        return (host, parsed.path().to_ascii_lowercase());
    }

    let lowered = url.to_ascii_lowercase();
    let without_scheme = lowered
        .split_once("://")
        .map_or(lowered.as_str(), |(_, rest)| rest);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    match without_query.split_once('/') {
        Some((host, path)) => (host.to_string(), format!("/{path}")),
        None => (without_query.to_string(), String::new()),
    }
}

/// Decide how a link should be rendered from its shape alone. No network.
pub fn classify(url: &str) -> LinkKind {
    let (host, path) = host_and_path(url);

    if VIDEO_HOST_TOKENS.iter().any(|token| host.contains(token)) {
        return LinkKind::Video;
    }
    if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || IMAGE_HOST_TOKENS.iter().any(|token| host.contains(token))
    {
        return LinkKind::Image;
    }
    LinkKind::Generic
}
