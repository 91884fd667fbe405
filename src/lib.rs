// ABOUTME: Library module for the carousel-block crate.
// ABOUTME: Contains the headless carousel controller plus page generation and watch tooling.

pub mod carousel;
pub mod config;
pub mod dom;
pub mod errors;
pub mod events;
pub mod html;
pub mod markup;
pub mod resources;
pub mod scheduler;
pub mod script;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use carousel::{classes, AutoplayState, Carousel, CarouselElements, TouchState};
pub use config::{CarouselConfig, Config};
pub use dom::{Document, NodeId};
pub use errors::{CarouselError, Result};
pub use events::{Event, EventTarget, Key};
pub use html::{generate_page, render_page, write_html_to_file, PageConfig};
pub use markup::{load_block, parse_block, Block, BlockFormat};
pub use resources::ResourceFile;
pub use scheduler::{Scheduler, TimerHandle};
pub use script::{parse_steps, run_script, Snapshot, Step};
pub use watch::{watch_block, WatchConfig};

#[cfg(test)]
mod tests;
