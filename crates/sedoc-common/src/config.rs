use serde::{Deserialize, Serialize};

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::SedocError;

/// Default font family stamped on every styled text node.
pub const DEFAULT_FONT_FAMILY: &str = "nanumbareunhipi";
pub const DEFAULT_PREVIEW_ENDPOINT: &str = "https://platform.editor.naver.com/api/blogpc001/v1/oglink";
pub const DEFAULT_UPCONVERT_ENDPOINT: &str =
    "https://upconvert.editor.naver.com/blog/html/components?documentWidth=693";

/// How generic (non-image, non-video) links become components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Ask the upconversion service to turn an anchor tag into components.
    Upconvert,
    /// Always emit a plain hyperlink text component.
    #[default]
    Simple,
    /// Emit a hyperlink text component followed by a preview card.
    #[serde(rename = "oglink")]
    OglinkCard,
}

impl LinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkMode::Upconvert => "upconvert",
            LinkMode::Simple => "simple",
            LinkMode::OglinkCard => "oglink",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkMode {
    type Err = SedocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upconvert" => Ok(LinkMode::Upconvert),
            "simple" => Ok(LinkMode::Simple),
            "oglink" => Ok(LinkMode::OglinkCard),
            _ => Err(SedocError::InvalidLinkMode(s.to_string())),
        }
    }
}

/// What to do with links pointing at a video platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStrategy {
    /// Emit an `oembed` component carrying an iframe for the video id.
    #[default]
    Embed,
    /// Emit a hyperlink text run and drop the preview.
    Hyperlink,
}

impl FromStr for VideoStrategy {
    type Err = SedocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embed" => Ok(VideoStrategy::Embed),
            "hyperlink" => Ok(VideoStrategy::Hyperlink),
            _ => Err(SedocError::InvalidVideoStrategy(s.to_string())),
        }
    }
}

/// Where oglink cards get their title/description/thumbnail from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OglinkSource {
    /// Derive the card from the URL alone, no network.
    #[default]
    Fallback,
    /// Query the preview service, falling back on any failure.
    Live,
}

impl FromStr for OglinkSource {
    type Err = SedocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(OglinkSource::Fallback),
            "live" => Ok(OglinkSource::Live),
            _ => Err(SedocError::InvalidOglinkSource(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub link_mode: LinkMode,
    pub video_strategy: VideoStrategy,
    pub oglink_source: OglinkSource,
    /// Link preview service; the target URL is passed as the `url` query parameter.
    pub preview_endpoint: String,
    /// HTML upconversion service.
    pub upconvert_endpoint: String,
    /// Per-request timeout for the preview and upconversion services.
    pub timeout_secs: u64,
    pub font_family: String,
    pub blog_id: Option<String>,
    pub category_id: u32,
    /// 0 = private, 1 = neighbours, 2 = public
    pub open_type: u8,
    pub comment_yn: bool,
    pub search_yn: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            link_mode: LinkMode::default(),
            video_strategy: VideoStrategy::default(),
            oglink_source: OglinkSource::default(),
            preview_endpoint: DEFAULT_PREVIEW_ENDPOINT.to_owned(),
            upconvert_endpoint: DEFAULT_UPCONVERT_ENDPOINT.to_owned(),
            timeout_secs: 10,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            blog_id: None,
            category_id: 0,
            open_type: 0,
            comment_yn: false,
            search_yn: false,
        }
    }
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self, SedocError> {
        loader.load().await
    }
    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<(), SedocError> {
        saver.save(self).await
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    fn load(&self) -> impl Future<Output = Result<Config, SedocError>> + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    fn save(&self, config: &Config) -> impl Future<Output = Result<(), SedocError>> + Send;
}

/// An implementation of [`Loader`] and [`Saver`] backed by a JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// A missing file loads as [`Config::default`]; only `.json` is supported.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn check_extension(&self) -> Result<(), SedocError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(()),
            _ => Err(SedocError::Config(format!(
                "unsupported config format: {}",
                self.path.display()
            ))),
        }
    }
}

impl Loader for FileStore {
    async fn load(&self) -> Result<Config, SedocError> {
        self.check_extension()?;
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", self.path.display());
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl Saver for FileStore {
    async fn save(&self, config: &Config) -> Result<(), SedocError> {
        self.check_extension()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(config)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_mode_parses_known_values() {
        assert_eq!("upconvert".parse::<LinkMode>().unwrap(), LinkMode::Upconvert);
        assert_eq!("Simple".parse::<LinkMode>().unwrap(), LinkMode::Simple);
        assert_eq!("oglink".parse::<LinkMode>().unwrap(), LinkMode::OglinkCard);
    }

    #[test]
    fn link_mode_rejects_unknown() {
        let err = "fancy".parse::<LinkMode>().unwrap_err();
        assert!(matches!(err, SedocError::InvalidLinkMode(ref m) if m == "fancy"));
    }

    #[test]
    fn strategy_and_source_parse() {
        assert_eq!("hyperlink".parse::<VideoStrategy>().unwrap(), VideoStrategy::Hyperlink);
        assert!("iframe".parse::<VideoStrategy>().is_err());
        assert_eq!("live".parse::<OglinkSource>().unwrap(), OglinkSource::Live);
        assert!("cache".parse::<OglinkSource>().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"linkMode":"oglink","blogId":"someone"}"#).unwrap();
        assert_eq!(config.link_mode, LinkMode::OglinkCard);
        assert_eq!(config.blog_id.as_deref(), Some("someone"));
        assert_eq!(config.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(config.timeout_secs, 10);
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("config.json"));

        let missing = Config::load(&store).await.unwrap();
        assert_eq!(missing, Config::default());

        let config = Config {
            link_mode: LinkMode::Upconvert,
            category_id: 6,
            ..Config::default()
        };
        config.save(&store).await.unwrap();
        assert_eq!(Config::load(&store).await.unwrap(), config);
    }

    #[tokio::test]
    async fn file_store_rejects_other_formats() {
        let store = FileStore::new("/tmp/sedoc-config.toml");
        assert!(matches!(
            Config::load(&store).await,
            Err(SedocError::Config(_))
        ));
    }
}
