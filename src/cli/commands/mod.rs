//! CLI command implementations.

mod batch;
mod config;
mod generate;
mod render;
mod serve;

pub use batch::run_batch;
pub use config::run_config;
pub use generate::run_generate;
pub use render::run_render;
pub use serve::run_serve;
