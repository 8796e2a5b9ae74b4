//! Console Game of Life: a bounded double-buffered grid, pattern stamps, and a
//! cursor-driven controller stepped on a fixed interval.

pub mod clock;
pub mod game_loop;
pub mod grid;
pub mod input;
pub mod patterns;
pub mod render;
pub mod simulation;

// Re-export key types for easier use by the binary
pub use clock::{Clock, SystemClock};
pub use grid::{Grid, GridError};
pub use input::{Command, InputSource, TerminalInput};
pub use render::{FrameStyle, Renderer, TerminalRenderer};
pub use simulation::{LifeSimulation, Phase};
