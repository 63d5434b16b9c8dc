//! Text renderer for substituting placeholder values
//!
//! This module walks a parsed template and writes each literal segment
//! through unchanged, replacing placeholders with their bound values.

pub mod config;
pub mod text;

pub use config::{MissingPolicy, TextConfig};
pub use text::render_text;
