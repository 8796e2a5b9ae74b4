use crate::clock::Clock;
use crate::input::InputSource;
use crate::render::Renderer;
use crate::simulation::LifeSimulation;
use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;
use std::time::Duration;

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Loop iterations processed.
    pub iterations: u64,
    /// Frames handed to the renderer, including the initial one.
    pub frames_rendered: u64,
}

/// Runs poll -> tick -> render until an exit is requested.
/// A frame is drawn only when a command changed the view or an update interval elapsed.
pub fn run<R, I, D, C>(
    sim: &mut LifeSimulation<R>,
    input: &mut I,
    renderer: &mut D,
    clock: &mut C,
    frame_pause: Duration,
) -> Result<LoopStats>
where
    R: Rng,
    I: InputSource + ?Sized,
    D: Renderer + ?Sized,
    C: Clock + ?Sized,
{
    let mut stats = LoopStats::default();

    renderer.render(&sim.view()).context("Failed to draw initial frame")?;
    stats.frames_rendered += 1;
    info!("Entering main loop.");

    while sim.is_running() {
        stats.iterations += 1;

        // --- 1. Input ---
        let mut dirty = false;
        for command in input.poll_commands().context("Failed to poll input")? {
            dirty |= sim.apply(command);
            if !sim.is_running() {
                break;
            }
        }
        if !sim.is_running() {
            break;
        }

        // --- 2. Fixed-interval update ---
        dirty |= sim.tick(clock.delta_secs());

        // --- 3. Render ---
        if dirty {
            renderer.render(&sim.view()).context("Failed to draw frame")?;
            stats.frames_rendered += 1;
        }

        if !frame_pause.is_zero() {
            std::thread::sleep(frame_pause);
        }
    }

    debug!("Loop stats: {:?}", stats);
    let view = sim.view();
    info!(
        "Left main loop after {} iterations at generation {} ({} live cells).",
        stats.iterations,
        view.generation,
        view.population()
    );
    Ok(stats)
}
