// ABOUTME: Markup loading for carousel blocks
// ABOUTME: Parses HTML fragments (or markdown via comrak) into a Document with a block container

use crate::dom::{Document, NodeId};
use crate::errors::{CarouselError, Result};
use comrak::{markdown_to_html, ComrakOptions};
use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Source format of a carousel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    Html,
    Markdown,
}

impl BlockFormat {
    /// Pick the format from a file extension; anything that isn't markdown is HTML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => BlockFormat::Markdown,
            _ => BlockFormat::Html,
        }
    }
}

/// A parsed block: the document plus the container element holding the block content.
pub struct Block {
    pub document: Document,
    pub container: NodeId,
}

/// Load a block from disk, choosing the parser from the file extension
pub fn load_block(path: &Path) -> Result<Block> {
    info!("Loading carousel block: {:?}", path);

    if !path.exists() {
        return Err(CarouselError::PathNotFoundError(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(CarouselError::FileReadError)?;
    parse_block(&content, BlockFormat::from_path(path))
}

/// Parse block content in the given format
pub fn parse_block(content: &str, format: BlockFormat) -> Result<Block> {
    match format {
        BlockFormat::Html => parse_html_block(content),
        BlockFormat::Markdown => parse_markdown_block(content),
    }
}

/// Convert markdown to HTML, with raw HTML allowed, then parse it as a block
pub fn parse_markdown_block(markdown: &str) -> Result<Block> {
    let mut options = ComrakOptions::default();
    options.render.unsafe_ = true; // Allow raw HTML
    let html = markdown_to_html(markdown, &options);
    debug!("Markdown block rendered to {} bytes of HTML", html.len());
    parse_html_block(&html)
}

/// Parse an HTML fragment into a fresh document under a `div.carousel.block` container
pub fn parse_html_block(html: &str) -> Result<Block> {
    let mut document = Document::new();
    let container = document.create_element("div");
    document.set_class_name(container, "carousel block");

    let html = escape_bare_ampersands(html);
    let mut reader = Reader::from_str(&html);
    // HTML leaves void elements and some end tags unclosed; the stack below reconciles them
    reader.check_end_names(false);
    let mut stack = vec![container];

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let node = create_from_start(&mut document, &start)?;
                document.append_child(current(&stack), node);
                if is_void(document.tag(node)) {
                    continue;
                }
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = create_from_start(&mut document, &start)?;
                document.append_child(current(&stack), node);
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                if is_void(&name) {
                    continue;
                }
                // Close the nearest open element with this name, implicitly closing
                // anything opened inside it
                let open = stack
                    .iter()
                    .skip(1)
                    .rposition(|node| document.tag(*node) == name);
                match open {
                    Some(position) => stack.truncate(position + 1),
                    None => {
                        return Err(CarouselError::MarkupError(format!(
                            "Unexpected closing tag </{}>",
                            name
                        )));
                    }
                }
            }
            Event::Text(text) => {
                let text = text.unescape_with(resolve_html_entity)?;
                if !text.trim().is_empty() {
                    document.append_text(current(&stack), &text);
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).to_string();
                document.append_text(current(&stack), &text);
            }
            Event::Eof => break,
            // Comments, declarations, doctypes and processing instructions carry no content
            _ => {}
        }
    }

    Ok(Block {
        document,
        container,
    })
}

/// Escape every `&` that doesn't start a character reference the parser can
/// resolve, so "Tom & Jerry" and `?a=1&b=2` read as literal text.
fn escape_bare_ampersands(html: &str) -> Cow<'_, str> {
    if !html.contains('&') {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len() + 16);
    let mut rest = html;
    while let Some(position) = rest.find('&') {
        out.push_str(&rest[..position]);
        let tail = &rest[position + 1..];
        if starts_with_known_reference(tail) {
            out.push('&');
        } else {
            out.push_str("&amp;");
        }
        rest = tail;
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn starts_with_known_reference(tail: &str) -> bool {
    let Some(end) = tail.find(';') else {
        return false;
    };
    let name = &tail[..end];

    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(decimal) = name.strip_prefix('#') {
        return !decimal.is_empty() && decimal.chars().all(|c| c.is_ascii_digit());
    }
    matches!(name, "amp" | "lt" | "gt" | "quot" | "apos") || resolve_html_entity(name).is_some()
}

fn current(stack: &[NodeId]) -> NodeId {
    stack[stack.len() - 1]
}

fn create_from_start(document: &mut Document, start: &BytesStart) -> Result<NodeId> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let node = document.create_element(&tag);

    for attribute in start.html_attributes() {
        let attribute = attribute?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
        let value = attribute.unescape_value_with(resolve_html_entity)?;
        document.set_attribute(node, &name, &value);
    }

    Ok(node)
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

/// The few named HTML entities that XML doesn't predefine but content authors use
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("\u{a0}"),
        "copy" => Some("\u{a9}"),
        "hellip" => Some("\u{2026}"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        _ => None,
    }
}
