pub mod config;
pub mod sim_params;
pub mod view;

// Re-export key types for easier use by dependent crates
pub use config::{
    DisplayConfig, GridConfig, Glyphs, LifeConfig, PatternConfig, TimingConfig, MAX_GRID_DIMENSION,
};
pub use sim_params::LifeParams;
pub use view::GridView;
