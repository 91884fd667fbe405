// ABOUTME: Watch module for monitoring a carousel block and regenerating its preview page
// ABOUTME: Provides file watching, auto-regeneration and an optional local preview server

use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;
use tiny_http::{Header, Response, Server, StatusCode};

use crate::config::Config as AppConfig;
use crate::errors::{CarouselError, Result};
use crate::html;
use crate::resources::ResourceFile;
use crate::utils;

/// Path polled by the preview page to learn about regenerations
const RELOAD_ENDPOINT: &str = "/__carousel_reload";

/// Configuration for watch mode
pub struct WatchConfig {
    /// Path to the block file to watch
    pub block_path: PathBuf,

    /// Output HTML file path
    pub html_output: PathBuf,

    /// Page title
    pub title: Option<String>,

    /// CSS files to include
    pub css_files: Vec<ResourceFile>,

    /// JavaScript files to include
    pub js_files: Vec<ResourceFile>,

    /// Whether to embed resources in HTML
    pub embed_resources: bool,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,

    /// Whether to serve the HTML using a local web server
    pub serve: bool,

    /// Port for local web server
    pub port: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            block_path: PathBuf::new(),
            html_output: PathBuf::new(),
            title: None,
            css_files: Vec::new(),
            js_files: Vec::new(),
            embed_resources: true,
            debounce_ms: 500,
            serve: false,
            port: 8080,
        }
    }
}

/// Script injected into served pages: polls the server and reloads when the
/// generation counter changes.
pub fn auto_reload_script() -> String {
    format!(
        r#"<script>
(function () {{
  var seen = null;
  setInterval(function () {{
    fetch('{endpoint}').then(function (r) {{ return r.text(); }}).then(function (v) {{
      if (seen !== null && v !== seen) {{ location.reload(); }}
      seen = v;
    }}).catch(function () {{}});
  }}, 1000);
}})();
</script>"#,
        endpoint = RELOAD_ENDPOINT
    )
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Start a simple HTTP server to serve the page and the files next to it
fn start_server(html_path: PathBuf, port: u16, generation: Arc<AtomicU64>) -> Result<()> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| CarouselError::WatchError(format!("Failed to start HTTP server: {}", e)))?;

    let html_dir = html_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let html_file_name = html_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    thread::spawn(move || {
        info!("HTTP server listening on http://localhost:{}", port);

        for request in server.incoming_requests() {
            let url_path = request.url().to_string();

            if url_path == RELOAD_ENDPOINT {
                let version = generation.load(Ordering::SeqCst).to_string();
                if let Err(e) = request.respond(Response::from_string(version)) {
                    error!("Failed to send response: {}", e);
                }
                continue;
            }

            let file_path = if url_path == "/" {
                html_dir.join(&html_file_name)
            } else {
                html_dir.join(url_path.trim_start_matches('/'))
            };

            debug!("Request for {:?} -> {:?}", url_path, file_path);

            if !file_path.is_file() {
                let response =
                    Response::from_string("404 Not Found").with_status_code(StatusCode(404));
                let _ = request.respond(response);
                continue;
            }

            match fs::read(&file_path) {
                Ok(content) => {
                    let mut response = Response::from_data(content);
                    if let Ok(header) =
                        Header::from_bytes("Content-Type", content_type_for(&file_path))
                    {
                        response = response.with_header(header);
                    }
                    if let Err(e) = request.respond(response) {
                        error!("Failed to send response: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to read file {:?}: {}", file_path, e);
                    let response = Response::from_string(format!("Failed to read file: {}", e))
                        .with_status_code(StatusCode(500));
                    let _ = request.respond(response);
                }
            }
        }
    });

    Ok(())
}

/// Starts watching a block file and regenerates the page when changes occur
pub fn watch_block(config: WatchConfig, app_config: &AppConfig) -> Result<()> {
    utils::validate_file_exists(&config.block_path)?;
    utils::ensure_parent_directory_exists(&config.html_output)?;

    let generation = Arc::new(AtomicU64::new(0));

    regenerate_page(&config, app_config)?;

    if config.serve {
        start_server(config.html_output.clone(), config.port, generation.clone())?;
    }

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| CarouselError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let watch_path = match config.block_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let abs_watch_path = if watch_path.is_absolute() {
        watch_path.to_path_buf()
    } else {
        utils::get_absolute_path(watch_path)?
    };

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::Recursive)
        .map_err(|e| {
            CarouselError::WatchError(format!(
                "Failed to start watching directory {:?}: {}",
                abs_watch_path, e
            ))
        })?;

    info!("Watching for changes in {:?}", abs_watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let relevant = is_relevant_path(path, &config);
                        if relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        relevant
                    })
                });

                let now = Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_page(&config, app_config) {
                        Ok(()) => {
                            generation.fetch_add(1, Ordering::SeqCst);
                            info!("Regenerated page successfully");
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate page: {}", e),
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// Checks if a path is the block file or one of its local resources. The
/// generated page itself is never relevant, or every write would retrigger.
pub fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    let path_abs = utils::get_absolute_path(path).unwrap_or_else(|_| path.to_path_buf());
    let output_abs = utils::get_absolute_path(&config.html_output)
        .unwrap_or_else(|_| config.html_output.clone());
    if path_abs == output_abs || path == config.html_output {
        return false;
    }

    let block_abs = utils::get_absolute_path(&config.block_path)
        .unwrap_or_else(|_| config.block_path.clone());
    if path_abs == block_abs || path == config.block_path {
        return true;
    }

    let path_str = path.to_string_lossy();
    let path_abs_str = path_abs.to_string_lossy();
    config
        .css_files
        .iter()
        .chain(config.js_files.iter())
        .filter(|resource| !resource.is_remote)
        .any(|resource| resource.path == path_str || resource.path == path_abs_str)
}

/// Regenerate the page from the current state of the block file
fn regenerate_page(config: &WatchConfig, app_config: &AppConfig) -> Result<()> {
    info!("Regenerating page...");

    let mut page_config = app_config.get_page_config(
        config.title.clone(),
        Vec::new(),
        Vec::new(),
        Some(config.embed_resources),
    );
    page_config.css_files.extend(config.css_files.iter().cloned());
    page_config.js_files = config.js_files.clone();
    if config.serve {
        page_config.auto_reload_script = Some(auto_reload_script());
    }

    let carousel_config = app_config.get_carousel_config(None, None, None);
    let html_content = html::generate_page(&config.block_path, &page_config, &carousel_config)?;
    html::write_html_to_file(&html_content, &config.html_output)?;
    info!("Page regenerated: {:?}", config.html_output);

    Ok(())
}
