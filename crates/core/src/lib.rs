pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod human;
pub mod labels;
pub mod legend;
pub mod loader;
pub mod logging;
pub mod model;
pub mod palette;
pub mod render;
pub mod search;
pub mod tooltip;
pub mod treemap;

pub use chart::*;
pub use config::*;
pub use error::*;
pub use model::*;
