pub mod html;
pub mod text;


use serde::{Deserialize, Serialize};

use crate::config::ContentTypes;

/// Enum to represent different types of content parsers
#[derive(Debug, Clone, Copy)]
pub enum ParserType {
    /// HTML parser
    Html,
    /// Plain text parser
    Text,
    /// Anything else (assets, unknown formats) - treated as plain text
    Other,
}

impl ParserType {
    /// Determines the parser type based on the URL
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".txt") || url.ends_with(".yaml") || url.ends_with(".yml") {
            ::log::debug!("Classifying as Text: {}", url);
            ParserType::Text
        } else if url.ends_with(".jpg")
            || url.ends_with(".jpeg")
            || url.ends_with(".png")
            || url.ends_with(".gif")
            || url.ends_with(".css")
            || url.ends_with(".js")
        {
            ::log::debug!("Classifying as Other: {}", url);
            ParserType::Other
        } else {
            ::log::debug!("Classifying as HTML: {}", url);
            ParserType::Html
        }
    }

    /// Returns if the parser should extract links
    pub fn should_extract_links(&self) -> bool {
        matches!(self, ParserType::Html)
    }
}

/// Image reference extracted from a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Code block extracted from a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Source element name (pre, code)
    pub tag: String,
    /// Class attribute, which usually carries a language hint
    pub language: String,
    pub content: String,
}

/// Table extracted as a header row plus cell rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Embedded media reference (video, audio, known iframe embeds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// Link to a downloadable document or archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    pub href: String,
    pub text: String,
}

/// Result of parsing one page's body.
///
/// `links` is always populated for HTML (the crawl loop needs it in full
/// mode); whether links end up in the persisted page record is a separate,
/// `ContentTypes`-gated decision.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub title: Option<String>,
    /// Extracted text content, possibly truncated
    pub content: String,
    /// Character count of the content before truncation
    pub content_length: usize,
    pub links: Vec<String>,
    pub images: Vec<ImageRef>,
    pub code_blocks: Vec<CodeBlock>,
    pub tables: Vec<TableData>,
    pub json_ld: Vec<serde_json::Value>,
    pub media: Vec<MediaRef>,
    pub files: Vec<FileRef>,
}

impl ParseResult {
    /// Creates a parse result carrying content only (no links or sections)
    pub fn content_only(content: String) -> Self {
        let content_length = content.chars().count();
        Self {
            content,
            content_length,
            ..Default::default()
        }
    }
}

/// Main parser that delegates to specific format parsers
pub struct Parser;

impl Parser {
    /// Parse content based on the parser type
    pub fn parse(content: &str, parser_type: ParserType, types: &ContentTypes) -> ParseResult {
        match parser_type {
            ParserType::Html => html::parse(content, types),
            ParserType::Text | ParserType::Other => text::parse(content),
        }
    }

    /// Determine parser type from URL and then parse content
    pub fn parse_from_url(content: &str, url: &str, types: &ContentTypes) -> ParseResult {
        let parser_type = ParserType::from_url(url);
        Self::parse(content, parser_type, types)
    }
}
