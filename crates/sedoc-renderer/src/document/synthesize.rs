use tracing::Instrument;

use super::types::*;
use crate::link::{
    LinkKind, LinkPreview, LinkPreviewResolver, Upconverter, anchor_html, fallback_preview,
    resolve_preview, youtube_video_id,
};
use crate::markdown::{Block, ParsedDocument, RunStyle, StyledRun};
use sedoc_common::config::DEFAULT_FONT_FAMILY;
use sedoc_common::{Config, IdGenerator, LinkMode, OglinkSource, VideoStrategy};

const YOUTUBE_THUMBNAIL_WIDTH: u32 = 480;
const YOUTUBE_THUMBNAIL_HEIGHT: u32 = 360;
const EMBED_WIDTH: u32 = 560;
const EMBED_HEIGHT: u32 = 315;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub link_mode: LinkMode,
    pub video_strategy: VideoStrategy,
    pub oglink_source: OglinkSource,
    pub font_family: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            link_mode: LinkMode::default(),
            video_strategy: VideoStrategy::default(),
            oglink_source: OglinkSource::default(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl From<&Config> for SynthesisOptions {
    fn from(config: &Config) -> Self {
        Self {
            link_mode: config.link_mode,
            video_strategy: config.video_strategy,
            oglink_source: config.oglink_source,
            font_family: config.font_family.clone(),
        }
    }
}

impl SynthesisOptions {
    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    pub fn with_video_strategy(mut self, video_strategy: VideoStrategy) -> Self {
        self.video_strategy = video_strategy;
        self
    }

    pub fn with_oglink_source(mut self, oglink_source: OglinkSource) -> Self {
        self.oglink_source = oglink_source;
        self
    }
}

/// Maps parsed blocks onto editor components.
///
/// Links are resolved one at a time in block order, so output order always
/// matches input order. `S` supplies link previews and HTML upconversion; use
/// `()` to stay offline.
pub struct DocumentSynthesizer<S = ()> {
    options: SynthesisOptions,
    services: S,
}

impl DocumentSynthesizer<()> {
    pub fn offline(options: SynthesisOptions) -> Self {
        Self {
            options,
            services: (),
        }
    }
}

/// Per-call state. A fresh id generator per call keeps concurrent calls from
/// sharing RNG state.
struct ComponentBuilder<'a> {
    ids: IdGenerator,
    font_family: &'a str,
}

impl ComponentBuilder<'_> {
    fn node(&mut self, run: &StyledRun, link: Option<&str>) -> TextNode {
        let mut style = NodeStyle::new(self.font_family);
        match &run.style {
            RunStyle::Normal => {}
            RunStyle::Bold => style.bold = Some(true),
            RunStyle::Color(hex) => style.font_color = Some(hex.clone()),
        }
        TextNode {
            id: self.ids.component_id(),
            value: run.text.clone(),
            style: Some(style),
            link: link.map(UrlLink::new),
            ctype: "textNode",
        }
    }

    fn paragraph(&mut self, runs: &[StyledRun], style: Option<ParagraphStyle>) -> Paragraph {
        let nodes = if runs.is_empty() {
            vec![self.node(&StyledRun::normal(""), None)]
        } else {
            runs.iter().map(|run| self.node(run, None)).collect()
        };
        Paragraph {
            id: self.ids.component_id(),
            style,
            nodes,
            ctype: "paragraph",
        }
    }

    fn text_component(&mut self, paragraphs: Vec<Paragraph>) -> Component {
        Component::Text(TextComponent {
            id: self.ids.component_id(),
            layout: LAYOUT_DEFAULT,
            value: paragraphs,
        })
    }

    fn document_title(&mut self, text: &str) -> Component {
        let title = vec![self.paragraph(&[StyledRun::normal(text)], None)];
        Component::DocumentTitle(DocumentTitle {
            id: self.ids.component_id(),
            layout: LAYOUT_DEFAULT,
            title,
            sub_title: None,
            align: "left",
        })
    }

    fn section_title(&mut self, text: &str) -> Component {
        let value = vec![self.paragraph(&[StyledRun::normal(text)], None)];
        Component::SectionTitle(SectionTitle {
            id: self.ids.component_id(),
            layout: LAYOUT_DEFAULT,
            value,
        })
    }

    /// Quotes carry one unstyled node; inline markup is left as typed.
    fn quotation(&mut self, text: &str) -> Component {
        let node = TextNode {
            id: self.ids.component_id(),
            value: text.to_string(),
            style: None,
            link: None,
            ctype: "textNode",
        };
        let paragraph = Paragraph {
            id: self.ids.component_id(),
            style: None,
            nodes: vec![node],
            ctype: "paragraph",
        };
        Component::Quotation(Quotation {
            id: self.ids.component_id(),
            layout: LAYOUT_QUOTATION_LINE,
            value: vec![paragraph],
            source: None,
        })
    }

    fn hyperlink(&mut self, display_text: &str, url: &str) -> Component {
        let label = if display_text.trim().is_empty() {
            url
        } else {
            display_text
        };
        let node = self.node(&StyledRun::normal(label), Some(url));
        let paragraph = Paragraph {
            id: self.ids.component_id(),
            style: None,
            nodes: vec![node],
            ctype: "paragraph",
        };
        self.text_component(vec![paragraph])
    }

    fn image(&mut self, display_text: &str, url: &str) -> Component {
        let caption = (!display_text.trim().is_empty()).then(|| display_text.to_string());
        Component::Image(ImageComponent::from_url(
            self.ids.component_id(),
            url,
            caption,
        ))
    }

    fn oglink(&mut self, preview: LinkPreview) -> Component {
        Component::Oglink(OglinkComponent {
            id: self.ids.component_id(),
            layout: LAYOUT_LARGE_IMAGE,
            title: preview.title,
            domain: preview.domain,
            link: preview.url,
            thumbnail: Thumbnail {
                src: preview.thumbnail_url,
                width: THUMBNAIL_SIZE,
                height: THUMBNAIL_SIZE,
                ctype: "thumbnail",
            },
            description: preview.description,
            video: preview.is_video,
            oglink_sign: preview.sign,
        })
    }

    fn oembed(&mut self, url: &str, video_id: &str, preview: LinkPreview) -> Component {
        let embed_url = format!("https://www.youtube.com/embed/{video_id}");
        Component::Oembed(OembedComponent {
            id: self.ids.component_id(),
            layout: LAYOUT_DEFAULT,
            title: preview.title,
            description: preview.description,
            thumbnail_url: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
            thumbnail_width: YOUTUBE_THUMBNAIL_WIDTH,
            thumbnail_height: YOUTUBE_THUMBNAIL_HEIGHT,
            provider_name: "YouTube".to_string(),
            provider_url: "https://www.youtube.com/".to_string(),
            input_url: url.to_string(),
            html: format!(
                "<iframe width=\"{EMBED_WIDTH}\" height=\"{EMBED_HEIGHT}\" src=\"{embed_url}\" frameborder=\"0\" allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture\" allowfullscreen></iframe>"
            ),
            original_width: EMBED_WIDTH,
            original_height: EMBED_HEIGHT,
            content_mode: "fit",
        })
    }
}

impl<S> DocumentSynthesizer<S>
where
    S: LinkPreviewResolver + Upconverter,
{
    pub fn new(options: SynthesisOptions, services: S) -> Self {
        Self { options, services }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    /// Synthesize a parsed document: the title component first, then one or
    /// more components per body block.
    pub async fn synthesize_document(&self, document: &ParsedDocument) -> Vec<Component> {
        self.synthesize(&document.title, &document.blocks).await
    }

    pub async fn synthesize(&self, title: &str, blocks: &[Block]) -> Vec<Component> {
        let span = tracing::info_span!(
            "synthesize",
            blocks = blocks.len(),
            mode = %self.options.link_mode
        );
        async move {
            let mut builder = ComponentBuilder {
                ids: IdGenerator::new(),
                font_family: &self.options.font_family,
            };
            let mut components = Vec::with_capacity(blocks.len() + 1);
            components.push(builder.document_title(title));
            for block in blocks {
                self.synthesize_block(&mut builder, block, &mut components)
                    .await;
            }
            tracing::debug!(components = components.len(), "synthesis finished");
            components
        }
        .instrument(span)
        .await
    }

    async fn synthesize_block(
        &self,
        builder: &mut ComponentBuilder<'_>,
        block: &Block,
        out: &mut Vec<Component>,
    ) {
        match block {
            Block::Title { text } => out.push(builder.document_title(text)),
            Block::Subtitle { text } => out.push(builder.section_title(text)),
            Block::Quote { text } => out.push(builder.quotation(text)),
            Block::ListItem {
                ordered,
                indent_level,
                runs,
                ..
            } => {
                let style = ParagraphStyle::list(*ordered, *indent_level);
                let paragraph = builder.paragraph(runs, Some(style));
                out.push(builder.text_component(vec![paragraph]));
            }
            Block::Paragraph { runs, .. } => {
                let paragraph = builder.paragraph(runs, None);
                out.push(builder.text_component(vec![paragraph]));
            }
            Block::LinkRef {
                display_text,
                url,
                kind,
            } => match kind {
                LinkKind::Image => out.push(builder.image(display_text, url)),
                LinkKind::Video => self.video_link(builder, display_text, url, out).await,
                LinkKind::Generic => self.generic_link(builder, display_text, url, out).await,
            },
        }
    }

    /// Preview data for cards and embeds. Only a `Live` source goes to the
    /// resolver, and even then `simple` mode stays offline.
    async fn preview(&self, url: &str) -> LinkPreview {
        match self.options.oglink_source {
            OglinkSource::Fallback => fallback_preview(url),
            OglinkSource::Live => resolve_preview(&self.services, url, self.options.link_mode).await,
        }
    }

    async fn video_link(
        &self,
        builder: &mut ComponentBuilder<'_>,
        display_text: &str,
        url: &str,
        out: &mut Vec<Component>,
    ) {
        match self.options.video_strategy {
            VideoStrategy::Embed => match youtube_video_id(url) {
                Some(video_id) => {
                    let preview = self.preview(url).await;
                    out.push(builder.oembed(url, &video_id, preview));
                }
                None => {
                    tracing::warn!(%url, "no video id in link, emitting hyperlink");
                    out.push(builder.hyperlink(display_text, url));
                }
            },
            VideoStrategy::Hyperlink => out.push(builder.hyperlink(display_text, url)),
        }
    }

    async fn generic_link(
        &self,
        builder: &mut ComponentBuilder<'_>,
        display_text: &str,
        url: &str,
        out: &mut Vec<Component>,
    ) {
        match self.options.link_mode {
            LinkMode::Simple => out.push(builder.hyperlink(display_text, url)),
            LinkMode::Upconvert => {
                let html = anchor_html(display_text, url);
                match self.services.upconvert(&html).await {
                    Ok(components) => {
                        out.extend(components.into_iter().map(Component::Upconverted));
                    }
                    Err(err) => {
                        tracing::warn!(%url, error = %err, "upconversion failed, emitting hyperlink");
                        out.push(builder.hyperlink(display_text, url));
                    }
                }
            }
            LinkMode::OglinkCard => {
                out.push(builder.hyperlink(display_text, url));
                let preview = self.preview(url).await;
                out.push(builder.oglink(preview));
            }
        }
    }
}
