// ABOUTME: Resource handling for generated carousel pages
// ABOUTME: Handles local and remote stylesheets and scripts, embedded or linked

use crate::errors::{CarouselError, Result};
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A stylesheet or script referenced by a page, either a local path or a URL.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Read the resource, fetching it when remote.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch content from a remote URL, retrying with exponential backoff
    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote resource: {}", self.path);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(CarouselError::FetchError)?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(&self.path).send() {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.text().map_err(CarouselError::FetchError);
                    }
                    last_error = Some(CarouselError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => {
                    last_error = Some(CarouselError::FetchError(e));
                }
            }

            if attempt < 3 {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CarouselError::ValidationError("Unknown error fetching resource".to_string())
        }))
    }

    fn read_local_content(&self) -> Result<String> {
        info!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(CarouselError::PathNotFoundError(path.to_path_buf()));
        }

        fs::read_to_string(path).map_err(CarouselError::FileReadError)
    }

    /// Generate the HTML tag for the resource.
    /// - tag_type: "css" or "js"
    /// - embed: inline local content instead of linking to it; remote resources are always linked
    pub fn tag(&self, tag_type: &str, embed: bool) -> Result<String> {
        if tag_type != "css" && tag_type != "js" {
            return Err(CarouselError::InvalidResourcePath(format!(
                "Unknown resource type: {}",
                tag_type
            )));
        }

        if self.is_remote || !embed {
            Ok(match tag_type {
                "css" => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
                _ => format!(r#"<script src="{}"></script>"#, self.path),
            })
        } else {
            let content = self.content()?;
            Ok(match tag_type {
                "css" => format!("<style>{}</style>", content),
                _ => format!("<script>{}</script>", content),
            })
        }
    }
}
