//! Editor component schema.
//!
//! Field names and `@ctype` discriminators cross into a third-party API and
//! must match it byte for byte. Everything here is serialize-only: components
//! are built once per synthesis call and written straight into the payload.

use serde::Serialize;
use serde_json::Value;

pub const LAYOUT_DEFAULT: &str = "default";
pub const LAYOUT_QUOTATION_LINE: &str = "quotation_line";
pub const LAYOUT_LARGE_IMAGE: &str = "large_image";

/// Placeholder geometry for images added by URL; the editor rescales on load.
pub const IMAGE_WIDTH: u32 = 693;
pub const IMAGE_HEIGHT: u32 = 924;
pub const IMAGE_ORIGINAL_WIDTH: u32 = 960;
pub const IMAGE_ORIGINAL_HEIGHT: u32 = 1280;
pub const IMAGE_DOMAIN: &str = "https://blogfiles.pstatic.net";

pub const THUMBNAIL_SIZE: u32 = 1200;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub font_family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

impl NodeStyle {
    pub fn new(font_family: &str) -> Self {
        Self {
            font_family: font_family.to_string(),
            bold: None,
            font_color: None,
            ctype: "nodeStyle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlLink {
    pub url: String,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

impl UrlLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ctype: "urlLink",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub id: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<UrlLink>,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Bullet,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub list_type: ListType,
    pub list_level: usize,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

impl ParagraphStyle {
    pub fn list(ordered: bool, level: usize) -> Self {
        Self {
            list_type: if ordered {
                ListType::Number
            } else {
                ListType::Bullet
            },
            list_level: level,
            ctype: "paragraphStyle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParagraphStyle>,
    pub nodes: Vec<TextNode>,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTitle {
    pub id: String,
    pub layout: &'static str,
    pub title: Vec<Paragraph>,
    pub sub_title: Option<Vec<Paragraph>>,
    pub align: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextComponent {
    pub id: String,
    pub layout: &'static str,
    pub value: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTitle {
    pub id: String,
    pub layout: &'static str,
    pub value: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quotation {
    pub id: String,
    pub layout: &'static str,
    pub value: Vec<Paragraph>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOrigin {
    #[serde(rename = "srcFrom")]
    pub src_from: &'static str,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageComponent {
    pub id: String,
    pub layout: &'static str,
    pub src: String,
    pub internal_resource: bool,
    pub represent: bool,
    pub domain: &'static str,
    pub file_size: u64,
    pub width: u32,
    pub width_percentage: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub caption: Option<String>,
    pub format: &'static str,
    pub display_format: &'static str,
    pub image_loaded: bool,
    pub content_mode: &'static str,
    pub origin: ImageOrigin,
    pub ai: bool,
}

impl ImageComponent {
    /// An externally hosted image with placeholder geometry.
    pub fn from_url(id: String, src: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            id,
            layout: LAYOUT_DEFAULT,
            src: src.into(),
            internal_resource: false,
            represent: false,
            domain: IMAGE_DOMAIN,
            file_size: 0,
            width: IMAGE_WIDTH,
            width_percentage: 0,
            height: IMAGE_HEIGHT,
            original_width: IMAGE_ORIGINAL_WIDTH,
            original_height: IMAGE_ORIGINAL_HEIGHT,
            caption,
            format: "normal",
            display_format: "normal",
            image_loaded: true,
            content_mode: "fit",
            origin: ImageOrigin {
                src_from: "copyUrl",
                ctype: "imageOrigin",
            },
            ai: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub src: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "@ctype")]
    pub ctype: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OglinkComponent {
    pub id: String,
    pub layout: &'static str,
    pub title: String,
    pub domain: String,
    pub link: String,
    pub thumbnail: Thumbnail,
    pub description: String,
    pub video: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oglink_sign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OembedComponent {
    pub id: String,
    pub layout: &'static str,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub provider_name: String,
    pub provider_url: String,
    pub input_url: String,
    pub html: String,
    pub original_width: u32,
    pub original_height: u32,
    pub content_mode: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    DocumentTitle,
    Text,
    Quotation,
    SectionTitle,
    Image,
    Oglink,
    Oembed,
    Upconverted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@ctype", rename_all = "camelCase")]
pub enum Component {
    DocumentTitle(DocumentTitle),
    Text(TextComponent),
    Quotation(Quotation),
    SectionTitle(SectionTitle),
    Image(ImageComponent),
    Oglink(OglinkComponent),
    Oembed(OembedComponent),
    /// Returned by the upconversion service, already in the editor schema.
    #[serde(untagged)]
    Upconverted(Value),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::DocumentTitle(_) => ComponentKind::DocumentTitle,
            Component::Text(_) => ComponentKind::Text,
            Component::Quotation(_) => ComponentKind::Quotation,
            Component::SectionTitle(_) => ComponentKind::SectionTitle,
            Component::Image(_) => ComponentKind::Image,
            Component::Oglink(_) => ComponentKind::Oglink,
            Component::Oembed(_) => ComponentKind::Oembed,
            Component::Upconverted(_) => ComponentKind::Upconverted,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Component::DocumentTitle(c) => Some(&c.id),
            Component::Text(c) => Some(&c.id),
            Component::Quotation(c) => Some(&c.id),
            Component::SectionTitle(c) => Some(&c.id),
            Component::Image(c) => Some(&c.id),
            Component::Oglink(c) => Some(&c.id),
            Component::Oembed(c) => Some(&c.id),
            Component::Upconverted(value) => value.get("id").and_then(Value::as_str),
        }
    }

    /// Paragraphs carried by text-like components.
    pub fn paragraphs(&self) -> &[Paragraph] {
        match self {
            Component::DocumentTitle(c) => &c.title,
            Component::Text(c) => &c.value,
            Component::Quotation(c) => &c.value,
            Component::SectionTitle(c) => &c.value,
            _ => &[],
        }
    }

    /// Every text node value in the component, in order.
    pub fn text_values(&self) -> Vec<&str> {
        match self {
            Component::Upconverted(value) => {
                let mut out = Vec::new();
                collect_text_node_values(value, &mut out);
                out
            }
            _ => self
                .paragraphs()
                .iter()
                .flat_map(|p| p.nodes.iter().map(|n| n.value.as_str()))
                .collect(),
        }
    }
}

fn collect_text_node_values<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if map.get("@ctype").and_then(Value::as_str) == Some("textNode") {
                if let Some(text) = map.get("value").and_then(Value::as_str) {
                    out.push(text);
                }
            }
            for child in map.values() {
                collect_text_node_values(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text_node_values(item, out);
            }
        }
        _ => {}
    }
}
