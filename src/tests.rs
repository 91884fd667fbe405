use super::*;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn create_temp_block_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn create_temp_resource_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

#[test]
fn test_generate_page_from_html_block() {
    let block = create_temp_block_file(
        "<ul><li><img src=\"a.png\" alt=\"A\"></li><li>Second</li></ul>",
        ".html",
    );

    let html = generate_page(
        block.path(),
        &PageConfig::default(),
        &CarouselConfig::default(),
    )
    .expect("Failed to generate page");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Carousel</title>"));
    assert!(html.contains("<div class=\"carousel block\">"));
    assert!(html.contains("<div class=\"carousel-wrapper\">"));
    assert!(html.contains("<li class=\"carousel-slide active\"><img alt=\"A\" src=\"a.png\"></li>"));
    assert!(html.contains("aria-label=\"Go to slide 2\""));
    assert!(html.contains("style=\"transform: translateX(-0px); transition: none;\""));
    assert!(html.contains(".carousel-dot.active"));
}

#[test]
fn test_generate_page_from_markdown_block() {
    let block = create_temp_block_file("- One\n- Two\n- Three\n", ".md");

    let html = generate_page(
        block.path(),
        &PageConfig::default(),
        &CarouselConfig::default(),
    )
    .expect("Failed to generate page");

    assert_eq!(html.matches("aria-label=\"Go to slide ").count(), 3);
    assert_eq!(html.matches("class=\"carousel-dots\"").count(), 1);
    assert!(html.contains("<li class=\"carousel-slide\">Two</li>"));
}

#[test]
fn test_generate_page_with_embedded_css() {
    let block = create_temp_block_file("<ul><li>Only</li></ul>", ".html");
    let css = create_temp_resource_file(".carousel { color: red; }");

    let page_config = PageConfig {
        title: "Gallery".to_string(),
        css_files: vec![ResourceFile::new(css.path().to_str().unwrap())],
        ..PageConfig::default()
    };

    let html = generate_page(block.path(), &page_config, &CarouselConfig::default()).unwrap();

    assert!(html.contains("<title>Gallery</title>"));
    assert!(html.contains("<style>.carousel { color: red; }</style>"));
}

#[test]
fn test_generate_page_links_when_not_embedding() {
    let block = create_temp_block_file("<ul><li>Only</li></ul>", ".html");

    let page_config = PageConfig {
        js_files: vec![ResourceFile::new("carousel.js")],
        embed_resources: false,
        ..PageConfig::default()
    };

    let html = generate_page(block.path(), &page_config, &CarouselConfig::default()).unwrap();
    assert!(html.contains(r#"<script src="carousel.js"></script>"#));
}

#[test]
fn test_generate_page_escapes_title() {
    let block = create_temp_block_file("<ul><li>Only</li></ul>", ".html");

    let page_config = PageConfig {
        title: "Cats & <Dogs>".to_string(),
        ..PageConfig::default()
    };

    let html = generate_page(block.path(), &page_config, &CarouselConfig::default()).unwrap();
    assert!(html.contains("<title>Cats &amp; &lt;Dogs&gt;</title>"));
}

#[test]
fn test_missing_local_resource_is_skipped() {
    let block = create_temp_block_file("<ul><li>Only</li></ul>", ".html");

    let page_config = PageConfig {
        css_files: vec![ResourceFile::new("/nonexistent/theme.css")],
        ..PageConfig::default()
    };

    let html = generate_page(block.path(), &page_config, &CarouselConfig::default()).unwrap();
    assert!(!html.contains("theme.css"));
    assert!(html.contains("carousel-wrapper"));
}

#[test]
fn test_generate_page_rejects_block_without_list() {
    let block = create_temp_block_file("<p>Just text</p>", ".html");

    let result = generate_page(
        block.path(),
        &PageConfig::default(),
        &CarouselConfig::default(),
    );
    assert!(matches!(result, Err(CarouselError::MissingList)));
}

#[test]
fn test_generate_page_missing_file() {
    let result = generate_page(
        std::path::Path::new("/nonexistent/block.html"),
        &PageConfig::default(),
        &CarouselConfig::default(),
    );
    assert!(matches!(result, Err(CarouselError::PathNotFoundError(_))));
}

#[test]
fn test_resource_file_remote() {
    let resource = ResourceFile::new("https://example.com/style.css");
    assert!(resource.is_remote);

    let tag = resource.tag("css", true).unwrap();
    assert_eq!(
        tag,
        r#"<link rel="stylesheet" href="https://example.com/style.css">"#
    );

    let resource = ResourceFile::new("https://example.com/script.js");
    let tag = resource.tag("js", true).unwrap();
    assert_eq!(tag, r#"<script src="https://example.com/script.js"></script>"#);
}

#[test]
fn test_resource_file_unknown_type() {
    let resource = ResourceFile::new("theme.css");
    assert!(matches!(
        resource.tag("font", false),
        Err(CarouselError::InvalidResourcePath(_))
    ));
}
