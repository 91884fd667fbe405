// ABOUTME: Page generation module for the carousel-block crate
// ABOUTME: Decorates a block and wraps it in a standalone HTML page with styling and resources

use crate::carousel::Carousel;
use crate::config::CarouselConfig;
use crate::dom::escape_text;
use crate::errors::{CarouselError, Result};
use crate::markup;
use crate::resources::ResourceFile;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Stylesheet for the class hooks the carousel assigns
pub const DEFAULT_CAROUSEL_CSS: &str = r#".carousel { position: relative; overflow: hidden; }
.carousel-wrapper { position: relative; overflow: hidden; }
.carousel-slides { display: flex; margin: 0; padding: 0; list-style: none; }
.carousel-slide { flex: 0 0 100%; min-width: 100%; }
.carousel-slide img { display: block; width: 100%; height: auto; }
.carousel-nav { position: absolute; top: 50%; transform: translateY(-50%); border: 0; background: rgb(0 0 0 / 50%); color: #fff; cursor: pointer; padding: 0.5em 0.75em; }
.carousel-nav-prev { left: 0.5em; }
.carousel-nav-next { right: 0.5em; }
.carousel-dots { display: flex; justify-content: center; gap: 0.5em; padding: 0.75em 0; }
.carousel-dot { width: 0.75em; height: 0.75em; border: 0; border-radius: 50%; background: #ccc; cursor: pointer; padding: 0; }
.carousel-dot.active { background: #333; }"#;

/// Settings for the generated page
pub struct PageConfig {
    pub title: String,
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub embed_resources: bool,
    pub auto_reload_script: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Carousel".to_string(),
            css_files: Vec::new(),
            js_files: Vec::new(),
            embed_resources: true,
            auto_reload_script: None,
        }
    }
}

/// Decorate the block at `block_path` and render it as a full HTML page
pub fn generate_page(
    block_path: &Path,
    page_config: &PageConfig,
    carousel_config: &CarouselConfig,
) -> Result<String> {
    info!("Generating carousel page from block: {:?}", block_path);

    let block = markup::load_block(block_path)?;
    let carousel = Carousel::from_block(block, carousel_config.clone())?;

    info!(
        "Decorated carousel with {} slides",
        carousel.slide_count()
    );

    Ok(render_page(&carousel.to_html(), page_config))
}

/// Wrap decorated block markup in an HTML document
pub fn render_page(block_html: &str, page_config: &PageConfig) -> String {
    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!(
        "<title>{}</title>\n",
        escape_text(&page_config.title)
    ));
    html_doc.push_str(&format!("<style>{}</style>\n", DEFAULT_CAROUSEL_CSS));

    for css in &page_config.css_files {
        match css.tag("css", page_config.embed_resources) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                // Continue with other resources rather than failing completely
                warn!("Failed to include CSS resource {}: {}", css.path, e);
            }
        }
    }

    html_doc.push_str("</head>\n<body>\n<main>\n");
    html_doc.push_str(block_html);
    html_doc.push_str("\n</main>\n");

    for js in &page_config.js_files {
        match js.tag("js", page_config.embed_resources) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                warn!("Failed to include JavaScript resource {}: {}", js.path, e);
            }
        }
    }

    if let Some(script) = &page_config.auto_reload_script {
        html_doc.push_str(script);
        html_doc.push('\n');
    }

    html_doc.push_str("</body>\n</html>");
    html_doc
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    // Ensure parent directory exists
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(CarouselError::FileReadError)?;
        }
    }

    fs::write(output_path, html_content).map_err(CarouselError::FileReadError)?;

    Ok(())
}
