use serde::{Deserialize, Serialize};

/// Runtime parameters derived from the configuration, read by the controller on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeParams {
    // Grid
    pub width: usize,
    pub height: usize,

    // Time
    pub update_interval_s: f64, // Seconds between generations

    // Patterns
    pub random_block_width: usize,
    pub random_block_height: usize,
    pub seed: Option<u64>, // None = seed from OS entropy
}

impl Default for LifeParams {
    fn default() -> Self {
        LifeParams {
            width: 30,
            height: 15,
            update_interval_s: 0.75,
            random_block_width: 5,
            random_block_height: 5,
            seed: None,
        }
    }
}
