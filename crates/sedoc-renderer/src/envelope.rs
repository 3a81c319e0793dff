//! Request envelope around a component array.
//!
//! The editor's save endpoint takes a form with five fields, three of which
//! are JSON documents encoded as strings. This module builds those documents;
//! sending them is left to the caller.

use serde::Serialize;

use crate::document::Component;
use sedoc_common::{Config, IdGenerator};

pub const EDITOR_VERSION: &str = "2.8.10";
pub const EDITOR_THEME: &str = "default";
pub const EDITOR_LANGUAGE: &str = "ko-KR";
pub const EDITOR_SOURCE: &str = "EPJG7EJse3NuChiZasrm8g==";
pub const PRODUCT_API_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub t: u32,
    pub p: u32,
    /// characters across all text nodes
    pub st: usize,
    /// whitespace characters among them
    pub sk: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfoEntry {
    pub dis: &'static str,
    pub dia: DocumentStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub dif: bool,
    pub dio: Vec<DocumentInfoEntry>,
}

impl DocumentInfo {
    pub fn from_components(components: &[Component]) -> Self {
        let (st, sk) = components
            .iter()
            .flat_map(|c| c.text_values())
            .flat_map(str::chars)
            .fold((0, 0), |(st, sk), c| {
                (st + 1, sk + usize::from(c.is_whitespace()))
            });
        let entry = DocumentInfoEntry {
            dis: "N",
            dia: DocumentStats { t: 0, p: 0, st, sk },
        };
        Self {
            dif: false,
            dio: vec![entry.clone(), entry],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub version: &'static str,
    pub theme: &'static str,
    pub language: &'static str,
    pub id: String,
    pub components: Vec<Component>,
    pub di: DocumentInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    /// Empty for a new post.
    pub document_id: String,
    pub document: Document,
}

impl DocumentModel {
    pub fn new(components: Vec<Component>) -> Self {
        let mut ids = IdGenerator::new();
        Self::with_id(ids.random_alnum26(), components)
    }

    pub fn with_id(id: String, components: Vec<Component>) -> Self {
        let di = DocumentInfo::from_components(&components);
        Self {
            document_id: String::new(),
            document: Document {
                version: EDITOR_VERSION,
                theme: EDITOR_THEME,
                language: EDITOR_LANGUAGE,
                id,
                components,
                di,
            },
        }
    }
}

/// Privacy and category settings for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSettings {
    pub category_id: u32,
    /// 0 = private, 1 = neighbours, 2 = public
    pub open_type: u8,
    pub comment_yn: bool,
    pub search_yn: bool,
    pub tags: Vec<String>,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            category_id: 0,
            open_type: 0,
            comment_yn: false,
            search_yn: false,
            tags: Vec::new(),
        }
    }
}

impl From<&Config> for PostSettings {
    fn from(config: &Config) -> Self {
        Self {
            category_id: config.category_id,
            open_type: config.open_type,
            comment_yn: config.comment_yn,
            search_yn: config.search_yn,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfiguration {
    pub open_type: u8,
    pub comment_yn: bool,
    pub search_yn: bool,
    pub sympathy_yn: bool,
    pub scrap_type: u8,
    pub out_side_allow_yn: bool,
    pub twitter_posting_yn: bool,
    pub facebook_posting_yn: bool,
    pub ccl_yn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationMeta {
    pub category_id: u32,
    pub log_no: Option<u64>,
    pub directory_seq: u32,
    pub directory_detail: Option<String>,
    pub mr_blog_talk_code: Option<String>,
    pub post_write_time_type: &'static str,
    pub tags: String,
    pub movie_panel_participation: bool,
    pub green_review_banner_yn: bool,
    pub continue_saved: bool,
    pub notice_post_yn: bool,
    pub auto_by_category_yn: bool,
    pub post_location_support_yn: bool,
    pub post_location_json: Option<String>,
    pub pre_post_date: Option<String>,
    pub this_day_post_info: Option<String>,
    pub scrap_yn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationParams {
    pub configuration: PostConfiguration,
    pub population_meta: PopulationMeta,
    pub editor_source: &'static str,
}

impl PopulationParams {
    pub fn new(settings: &PostSettings) -> Self {
        Self {
            configuration: PostConfiguration {
                open_type: settings.open_type,
                comment_yn: settings.comment_yn,
                search_yn: settings.search_yn,
                sympathy_yn: false,
                scrap_type: 0,
                out_side_allow_yn: false,
                twitter_posting_yn: false,
                facebook_posting_yn: false,
                ccl_yn: false,
            },
            population_meta: PopulationMeta {
                category_id: settings.category_id,
                log_no: None,
                directory_seq: 0,
                directory_detail: None,
                mr_blog_talk_code: None,
                post_write_time_type: "now",
                tags: settings.tags.join(","),
                movie_panel_participation: false,
                green_review_banner_yn: false,
                continue_saved: false,
                notice_post_yn: false,
                auto_by_category_yn: false,
                post_location_support_yn: false,
                post_location_json: None,
                pre_post_date: None,
                this_day_post_info: None,
                scrap_yn: false,
            },
            editor_source: EDITOR_SOURCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub blog_id: String,
    pub document_model: String,
    pub media_resources: String,
    pub population_params: String,
    pub product_api_version: &'static str,
}

impl RequestPayload {
    pub fn new(
        blog_id: impl Into<String>,
        document_model: &DocumentModel,
        population_params: &PopulationParams,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            blog_id: blog_id.into(),
            document_model: serde_json::to_string(document_model)?,
            media_resources: serde_json::to_string(&serde_json::json!({
                "image": [],
                "video": [],
                "file": [],
            }))?,
            population_params: serde_json::to_string(population_params)?,
            product_api_version: PRODUCT_API_VERSION,
        })
    }

    /// Field name/value pairs in the order the form expects them.
    pub fn form_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("blogId", &self.blog_id),
            ("documentModel", &self.document_model),
            ("mediaResources", &self.media_resources),
            ("populationParams", &self.population_params),
            ("productApiVersion", self.product_api_version),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentSynthesizer, SynthesisOptions};
    use crate::markdown::parse;
    use serde_json::Value;

    async fn components(markdown: &str) -> Vec<Component> {
        let synthesizer = DocumentSynthesizer::offline(SynthesisOptions::default());
        synthesizer.synthesize_document(&parse(markdown)).await
    }

    #[tokio::test]
    async fn stats_count_text_characters() {
        let components = components("# ab\n\nc d").await;
        let info = DocumentInfo::from_components(&components);
        assert_eq!(info.dio.len(), 2);
        assert_eq!(info.dio[0].dia.st, 5);
        assert_eq!(info.dio[0].dia.sk, 1);
        assert!(!info.dif);
    }

    #[tokio::test]
    async fn document_model_shape() {
        let model = DocumentModel::with_id("DOCID".into(), components("# T").await);
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["documentId"], "");
        assert_eq!(json["document"]["version"], EDITOR_VERSION);
        assert_eq!(json["document"]["language"], "ko-KR");
        assert_eq!(json["document"]["id"], "DOCID");
        assert_eq!(
            json["document"]["components"][0]["@ctype"],
            "documentTitle"
        );
        assert_eq!(json["document"]["di"]["dio"][1]["dis"], "N");
    }

    #[test]
    fn generated_document_id_is_alnum26() {
        let model = DocumentModel::new(Vec::new());
        assert_eq!(model.document.id.len(), 26);
    }

    #[test]
    fn population_params_defaults_are_private() {
        let params = PopulationParams::new(&PostSettings {
            category_id: 6,
            tags: vec!["rust".into(), "blog".into()],
            ..PostSettings::default()
        });
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["configuration"]["openType"], 0);
        assert_eq!(json["configuration"]["outSideAllowYn"], false);
        assert_eq!(json["populationMeta"]["categoryId"], 6);
        assert_eq!(json["populationMeta"]["postWriteTimeType"], "now");
        assert_eq!(json["populationMeta"]["tags"], "rust,blog");
        assert_eq!(json["populationMeta"]["logNo"], Value::Null);
        assert_eq!(json["editorSource"], EDITOR_SOURCE);
    }

    #[tokio::test]
    async fn payload_fields_are_json_strings() {
        let model = DocumentModel::new(components("# T\n\nbody").await);
        let params = PopulationParams::new(&PostSettings::default());
        let payload = RequestPayload::new("someone", &model, &params).unwrap();

        let fields = payload.form_fields();
        assert_eq!(fields[0], ("blogId", "someone"));
        assert_eq!(fields[4], ("productApiVersion", "v1"));

        let media: Value = serde_json::from_str(&payload.media_resources).unwrap();
        assert_eq!(media["image"], serde_json::json!([]));

        let decoded: Value = serde_json::from_str(&payload.document_model).unwrap();
        assert_eq!(decoded["document"]["components"][1]["@ctype"], "text");
    }
}
