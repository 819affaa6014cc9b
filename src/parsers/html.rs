use scraper::{ElementRef, Html, Selector};

use crate::config::ContentTypes;
use crate::parsers::{CodeBlock, FileRef, ImageRef, MediaRef, ParseResult, TableData, text};

// Caps on persisted sections so one pathological page can't bloat a record
const TEXT_CAP: usize = 100_000;
const LINK_CAP: usize = 500;
const IMAGE_CAP: usize = 100;
const CODE_CAP: usize = 50;
const CODE_SNIPPET_CAP: usize = 5_000;
const TABLE_CAP: usize = 20;
const TABLE_ROW_CAP: usize = 100;
const MEDIA_CAP: usize = 50;
const FILE_CAP: usize = 100;

/// Elements whose subtrees carry no readable content
const SKIP_TAGS: [&str; 7] = [
    "script", "style", "nav", "footer", "header", "aside", "noscript",
];

/// Link extensions treated as downloadable files rather than pages
const FILE_EXTENSIONS: [&str; 8] = [
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".zip", ".rar", ".csv",
];

/// Parses HTML content, extracting the sections enabled in `types`.
///
/// Links are extracted unconditionally so the crawl loop can follow them;
/// the record writer decides whether they are persisted.
pub fn parse(html: &str, types: &ContentTypes) -> ParseResult {
    let doc = Html::parse_document(html);

    let mut result = ParseResult {
        title: extract_title(&doc),
        links: extract_links(&doc),
        ..Default::default()
    };

    if types.text {
        let raw = extract_text(&doc);
        result.content_length = raw.chars().count();
        result.content = truncate_chars(&raw, TEXT_CAP);
    }
    if types.images {
        result.images = extract_images(&doc);
    }
    if types.code {
        result.code_blocks = extract_code_blocks(&doc);
    }
    if types.json {
        result.json_ld = extract_json_ld(&doc);
    }
    if types.tables {
        result.tables = extract_tables(&doc);
    }
    if types.media {
        result.media = extract_media(&doc);
    }
    if types.files {
        result.files = extract_files(&doc);
    }

    ::log::debug!(
        "HTML parser found {} links, {} images, {} code blocks",
        result.links.len(),
        result.images.len(),
        result.code_blocks.len()
    );

    result
}

fn extract_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").unwrap();
    let title = doc
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if title.is_empty() { None } else { Some(title) }
}

/// Collects readable text from the body, skipping non-content subtrees,
/// then normalizes whitespace.
fn extract_text(doc: &Html) -> String {
    let selector = Selector::parse("body").unwrap();
    let mut buffer = String::new();
    for body in doc.select(&selector) {
        collect_text(body, &mut buffer);
    }
    text::normalize_segment(&buffer)
}

fn collect_text(element: ElementRef, out: &mut String) {
    if SKIP_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            scraper::Node::Text(t) => {
                out.push_str(t);
                out.push(' ');
            }
            scraper::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn extract_links(doc: &Html) -> Vec<String> {
    let selector = Selector::parse("a[href]").unwrap();
    doc.select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .take(LINK_CAP)
        .collect()
}

fn extract_images(doc: &Html) -> Vec<ImageRef> {
    let selector = Selector::parse("img[src]").unwrap();
    doc.select(&selector)
        .filter_map(|e| {
            let src = e.value().attr("src")?;
            if src.is_empty() {
                return None;
            }
            Some(ImageRef {
                src: src.to_string(),
                alt: e
                    .value()
                    .attr("alt")
                    .filter(|a| !a.is_empty())
                    .map(|a| a.to_string()),
            })
        })
        .take(IMAGE_CAP)
        .collect()
}

fn extract_code_blocks(doc: &Html) -> Vec<CodeBlock> {
    let selector = Selector::parse("pre, code").unwrap();
    doc.select(&selector)
        .filter_map(|e| {
            let content = e.text().collect::<String>().trim().to_string();
            // Short inline spans are noise, not code blocks
            if content.len() <= 10 {
                return None;
            }
            Some(CodeBlock {
                tag: e.value().name().to_string(),
                language: e
                    .value()
                    .attr("class")
                    .unwrap_or("unknown")
                    .to_string(),
                content: truncate_chars(&content, CODE_SNIPPET_CAP),
            })
        })
        .take(CODE_CAP)
        .collect()
}

fn extract_json_ld(doc: &Html) -> Vec<serde_json::Value> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    doc.select(&selector)
        .filter_map(|e| serde_json::from_str(&e.text().collect::<String>()).ok())
        .collect()
}

fn extract_tables(doc: &Html) -> Vec<TableData> {
    let table_selector = Selector::parse("table").unwrap();
    let th_selector = Selector::parse("th").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    doc.select(&table_selector)
        .map(|table| {
            let headers = table
                .select(&th_selector)
                .map(|th| cell_text(th))
                .collect::<Vec<_>>();
            let rows = table
                .select(&tr_selector)
                .map(|tr| tr.select(&td_selector).map(cell_text).collect::<Vec<_>>())
                .filter(|row: &Vec<String>| !row.is_empty())
                .take(TABLE_ROW_CAP)
                .collect::<Vec<_>>();
            TableData { headers, rows }
        })
        .take(TABLE_CAP)
        .collect()
}

fn cell_text(cell: ElementRef) -> String {
    text::normalize_segment(&cell.text().collect::<String>())
}

fn extract_media(doc: &Html) -> Vec<MediaRef> {
    let selector =
        Selector::parse(r#"video, audio, iframe[src*="youtube"], iframe[src*="vimeo"]"#).unwrap();
    let source_selector = Selector::parse("source[src]").unwrap();

    doc.select(&selector)
        .map(|e| {
            let src = e
                .value()
                .attr("src")
                .map(|s| s.to_string())
                .or_else(|| {
                    e.select(&source_selector)
                        .next()
                        .and_then(|s| s.value().attr("src"))
                        .map(|s| s.to_string())
                });
            MediaRef {
                kind: e.value().name().to_string(),
                src,
                poster: e.value().attr("poster").map(|p| p.to_string()),
            }
        })
        .take(MEDIA_CAP)
        .collect()
}

fn extract_files(doc: &Html) -> Vec<FileRef> {
    let selector = Selector::parse("a[href]").unwrap();
    doc.select(&selector)
        .filter_map(|e| {
            let href = e.value().attr("href")?;
            let lower = href.to_lowercase();
            if !FILE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                return None;
            }
            Some(FileRef {
                href: href.to_string(),
                text: e.text().collect::<String>().trim().to_string(),
            })
        })
        .take(FILE_CAP)
        .collect()
}

/// Truncates to at most `max` characters on a char boundary
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
