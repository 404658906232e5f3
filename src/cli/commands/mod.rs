//! CLI command implementations.

mod config;
mod languages;
mod render;

pub use config::run_config;
pub use languages::run_languages;
pub use render::{run_render, RenderPlan};
