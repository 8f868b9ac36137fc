//! Report rendering for normalized analyses.
//!
//! Renderers consume the canonical [`crate::models::Analysis`] only: every
//! placeholder was already substituted by the normalizer, except detection
//! labels, which are a presentation concern and come from the display
//! accessors on [`crate::models::Detection`].

pub mod generator;

pub use generator::{
    generate_json_report, generate_markdown_report, generate_text_report, RenderOptions,
};
