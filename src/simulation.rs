use crate::grid::Grid;
use crate::input::Command;
use crate::patterns::{self, Pattern, BEACON, GLIDER};
use anyhow::Result;
use life_common::{GridView, LifeParams};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Relative slack when comparing the accumulated timer against the update interval.
const TIMER_TOLERANCE: f64 = 1e-9;

/// Lifecycle phase derived from the `running` and `simulating` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing placed since the last reset; ticks don't advance generations.
    Idle,
    /// Life has been placed; every interval crossing steps the grid.
    Running,
    /// Exit requested. No further ticks or commands are processed.
    Terminated,
}

/// Owns the grid and drives it from input commands and elapsed time.
pub struct LifeSimulation<R: Rng = StdRng> {
    /// Runtime parameters derived from the configuration.
    params: LifeParams,
    grid: Grid,
    /// Random source for random block placement.
    rng: R,
    /// Cursor position as (x, y).
    cursor: (usize, usize),
    /// Generations stepped since the last reset.
    generation: u64,
    /// False once an exit has been requested.
    running: bool,
    /// Whether interval crossings step the grid.
    simulating: bool,
    /// Seconds accumulated since the last interval crossing.
    timer: f64,
}

impl LifeSimulation<StdRng> {
    /// Creates a simulation seeded from `params.seed`, or from OS entropy when unset.
    pub fn new(params: LifeParams) -> Result<Self> {
        let rng = match params.seed {
            Some(seed) => {
                info!("Seeding random block generator with {}.", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> LifeSimulation<R> {
    /// Creates a simulation drawing random blocks from `rng`.
    pub fn with_rng(params: LifeParams, rng: R) -> Result<Self> {
        if !params.update_interval_s.is_finite() || params.update_interval_s <= 0.0 {
            anyhow::bail!(
                "update interval must be a positive number of seconds (got {}).",
                params.update_interval_s
            );
        }
        let grid = Grid::new(params.width, params.height)?;
        debug!("Simulation Parameters: {:#?}", params);

        Ok(Self {
            params,
            grid,
            rng,
            cursor: (0, 0),
            generation: 0,
            running: true,
            simulating: false,
            timer: 0.0,
        })
    }

    pub fn params(&self) -> &LifeParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn phase(&self) -> Phase {
        if !self.running {
            Phase::Terminated
        } else if self.simulating {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Read-only view for renderers.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            cells: self.grid.cells(),
            width: self.grid.width(),
            height: self.grid.height(),
            cursor: self.cursor,
            generation: self.generation,
            simulating: self.simulating,
        }
    }

    /// Accumulates `delta_secs` of elapsed time. Once the accumulated time reaches the
    /// update interval the timer restarts from zero, and if simulating, one generation
    /// is stepped. Returns `true` when an interval boundary was crossed.
    pub fn tick(&mut self, delta_secs: f64) -> bool {
        if !self.running || !delta_secs.is_finite() || delta_secs < 0.0 {
            return false;
        }

        self.timer += delta_secs;
        // Ten 0.075 s deltas sum to 0.7499999999999999, which must still cross 0.75
        let threshold = self.params.update_interval_s * (1.0 - TIMER_TOLERANCE);
        if self.timer < threshold {
            return false;
        }
        self.timer = 0.0;

        if self.simulating {
            self.generation += 1;
            self.grid.step();
            trace!(
                "Generation {} | Population: {}",
                self.generation,
                self.grid.population()
            );
        }
        true
    }

    /// Clears the grid, zeroes the generation counter and stops simulating.
    pub fn reset(&mut self) {
        if !self.running {
            return;
        }
        info!("Resetting grid at generation {}.", self.generation);
        self.generation = 0;
        self.simulating = false;
        self.grid.reset();
    }

    /// Moves the cursor, wrapping around the grid edges.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        if !self.running {
            return;
        }
        self.cursor = (
            wrap(self.cursor.0, dx, self.grid.width()),
            wrap(self.cursor.1, dy, self.grid.height()),
        );
        debug!("Cursor moved to ({}, {}).", self.cursor.0, self.cursor.1);
    }

    pub fn place_glider(&mut self) {
        self.place(&GLIDER);
    }

    pub fn place_beacon(&mut self) {
        self.place(&BEACON);
    }

    fn place(&mut self, pattern: &Pattern) {
        if !self.running {
            return;
        }
        let (x, y) = self.cursor;
        let placed = patterns::place_pattern(&mut self.grid, pattern, x, y);
        debug!(
            "Placed {} at ({}, {}): {}/{} cells on grid.",
            pattern.name,
            x,
            y,
            placed,
            pattern.cells.len()
        );
        self.start_simulating();
    }

    /// Places a random block of the configured size at the cursor.
    pub fn place_random_block(&mut self) {
        if !self.running {
            return;
        }
        let (x, y) = self.cursor;
        let (w, h) = (self.params.random_block_width, self.params.random_block_height);
        patterns::place_random_block(&mut self.grid, x, y, w, h, &mut self.rng);
        debug!("Placed {}x{} random block at ({}, {}).", w, h, x, y);
        self.start_simulating();
    }

    /// Flips the cell under the cursor.
    pub fn toggle_cell(&mut self) {
        if !self.running {
            return;
        }
        let (x, y) = self.cursor;
        self.grid.toggle(x, y);
        debug!("Toggled cell ({}, {}).", x, y);
        self.start_simulating();
    }

    fn start_simulating(&mut self) {
        if !self.simulating {
            info!("Simulation started.");
            self.simulating = true;
        }
    }

    /// Ends the session. Irreversible.
    pub fn request_exit(&mut self) {
        if self.running {
            info!("Exit requested at generation {}.", self.generation);
            self.running = false;
        }
    }

    /// Dispatches one input command. Returns `true` if the view changed.
    pub fn apply(&mut self, command: Command) -> bool {
        if !self.running {
            return false;
        }
        match command {
            Command::Exit => {
                self.request_exit();
                return false;
            }
            Command::MoveCursor { dx, dy } => self.move_cursor(dx, dy),
            Command::Reset => self.reset(),
            Command::PlaceGlider => self.place_glider(),
            Command::PlaceBeacon => self.place_beacon(),
            Command::PlaceRandomBlock => self.place_random_block(),
            Command::ToggleCell => self.toggle_cell(),
        }
        true
    }
}

// `pos + delta` modulo `len`, always in 0..len.
fn wrap(pos: usize, delta: isize, len: usize) -> usize {
    (pos as i128 + delta as i128).rem_euclid(len as i128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::ConstRng;

    fn params(width: usize, height: usize) -> LifeParams {
        LifeParams {
            width,
            height,
            seed: Some(1),
            ..LifeParams::default()
        }
    }

    fn sim(width: usize, height: usize) -> LifeSimulation {
        LifeSimulation::new(params(width, height)).unwrap()
    }

    fn sorted_live<R: Rng>(sim: &LifeSimulation<R>) -> Vec<(usize, usize)> {
        let mut cells: Vec<_> = sim.grid().live_cells().collect();
        cells.sort();
        cells
    }

    #[test]
    fn starts_idle_at_origin() {
        let sim = sim(30, 15);
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.cursor(), (0, 0));
        assert_eq!(sim.generation(), 0);
        assert!(sim.is_running());
        assert!(!sim.is_simulating());
        assert!(sim.grid().is_empty());
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(LifeSimulation::new(params(0, 10)).is_err());
        let bad_interval = LifeParams { update_interval_s: 0.0, ..params(4, 4) };
        assert!(LifeSimulation::new(bad_interval).is_err());
    }

    #[test]
    fn cursor_wraps_on_both_axes() {
        let mut sim = sim(30, 15);
        sim.move_cursor(-1, 0);
        assert_eq!(sim.cursor(), (29, 0));
        sim.move_cursor(1, 0);
        assert_eq!(sim.cursor(), (0, 0));
        sim.move_cursor(0, -1);
        assert_eq!(sim.cursor(), (0, 14));
        sim.move_cursor(0, 1);
        assert_eq!(sim.cursor(), (0, 0));
        sim.move_cursor(-31, 16);
        assert_eq!(sim.cursor(), (29, 1));
    }

    #[test]
    fn placement_starts_simulation() {
        for place in [
            LifeSimulation::place_glider as fn(&mut LifeSimulation),
            LifeSimulation::place_beacon,
            LifeSimulation::place_random_block,
            LifeSimulation::toggle_cell,
        ] {
            let mut sim = sim(10, 10);
            place(&mut sim);
            assert_eq!(sim.phase(), Phase::Running);
        }
    }

    #[test]
    fn clipped_placement_still_starts_simulation() {
        let mut sim = sim(30, 15);
        sim.move_cursor(-1, -1);
        sim.place_glider();
        assert!(sim.grid().is_empty());
        assert!(sim.is_simulating());
    }

    #[test]
    fn glider_translates_after_one_generation() {
        let mut sim = sim(8, 8);
        sim.place_glider();
        assert!(sim.tick(0.75));
        assert_eq!(sim.generation(), 1);
        assert_eq!(
            sorted_live(&sim),
            vec![(0, 1), (1, 2), (1, 3), (2, 1), (2, 2)]
        );

        // Four generations later the shape reappears shifted by (1, 1)
        for _ in 0..3 {
            sim.tick(0.75);
        }
        assert_eq!(sim.generation(), 4);
        assert_eq!(
            sorted_live(&sim),
            vec![(1, 3), (2, 1), (2, 3), (3, 2), (3, 3)]
        );
    }

    #[test]
    fn lone_cell_dies_after_one_tick() {
        let mut sim = sim(3, 3);
        sim.move_cursor(1, 1);
        sim.toggle_cell();
        sim.tick(1.0);
        assert!(sim.grid().is_empty());
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn exact_interval_advances_once_per_crossing() {
        let mut sim = sim(8, 8);
        sim.place_beacon();

        // 0.25 is exact in binary, so three of them sum to exactly 0.75
        let mut crossings = 0;
        for _ in 0..12 {
            if sim.tick(0.25) {
                crossings += 1;
            }
        }
        assert_eq!(crossings, 4);
        assert_eq!(sim.generation(), 4);

        assert!(!sim.tick(0.5));
        assert_eq!(sim.generation(), 4);
    }

    #[test]
    fn inexact_deltas_still_cross_the_interval() {
        let mut sim = sim(8, 8);
        sim.place_glider();

        // 0.075 has no exact binary form; ten of them sum just under 0.75
        let crossings: Vec<bool> = (0..10).map(|_| sim.tick(0.075)).collect();
        assert_eq!(crossings.iter().filter(|&&c| c).count(), 1);
        assert!(crossings[9]);
        assert_eq!(sim.generation(), 1);

        let more = (0..20).filter(|_| sim.tick(0.075)).count();
        assert_eq!(more, 2);
        assert_eq!(sim.generation(), 3);
    }

    #[test]
    fn large_delta_steps_only_once() {
        let mut sim = sim(8, 8);
        sim.place_glider();
        assert!(sim.tick(10.0));
        assert_eq!(sim.generation(), 1);
        // The remainder is discarded, not carried over
        assert!(!sim.tick(0.5));
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn idle_ticks_do_not_advance_generation() {
        let mut sim = sim(8, 8);
        assert!(sim.tick(0.75));
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut sim = sim(8, 8);
        sim.place_glider();
        assert!(!sim.tick(f64::NAN));
        assert!(!sim.tick(-5.0));
        assert!(!sim.tick(f64::INFINITY));
        assert!(!sim.tick(0.5));
        assert!(sim.tick(0.25));
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut sim = sim(10, 10);
        sim.place_random_block();
        sim.tick(0.75);
        sim.tick(0.75);

        sim.reset();
        let first = (sim.generation(), sim.grid().cells().to_vec(), sim.phase());
        sim.reset();
        let second = (sim.generation(), sim.grid().cells().to_vec(), sim.phase());

        assert_eq!(first, second);
        assert_eq!(first.0, 0);
        assert!(sim.grid().is_empty());
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn reset_keeps_cursor() {
        let mut sim = sim(10, 10);
        sim.move_cursor(3, 4);
        sim.reset();
        assert_eq!(sim.cursor(), (3, 4));
    }

    #[test]
    fn injected_rng_drives_random_block() {
        let mut sim = LifeSimulation::with_rng(params(10, 10), ConstRng(0)).unwrap();
        sim.move_cursor(2, 2);
        sim.place_random_block();
        assert_eq!(sim.grid().population(), 25);
        assert!(sim.grid().get(6, 6).unwrap());
        assert!(!sim.grid().get(7, 7).unwrap());
    }

    #[test]
    fn seeded_simulations_agree() {
        let mut a = sim(20, 20);
        let mut b = sim(20, 20);
        for s in [&mut a, &mut b] {
            s.move_cursor(5, 5);
            s.place_random_block();
            s.move_cursor(6, 0);
            s.place_random_block();
        }
        assert_eq!(a.grid().cells(), b.grid().cells());
    }

    #[test]
    fn exit_is_terminal() {
        let mut sim = sim(8, 8);
        sim.place_glider();
        assert!(!sim.apply(Command::Exit));
        assert_eq!(sim.phase(), Phase::Terminated);

        assert!(!sim.tick(5.0));
        assert!(!sim.apply(Command::Reset));
        sim.reset();
        sim.move_cursor(1, 1);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.cursor(), (0, 0));
        assert_eq!(sim.grid().population(), 5);
        assert_eq!(sim.phase(), Phase::Terminated);
    }

    #[test]
    fn apply_dispatches_commands() {
        let mut sim = sim(10, 10);
        assert!(sim.apply(Command::MoveCursor { dx: 2, dy: 1 }));
        assert_eq!(sim.cursor(), (2, 1));
        assert!(sim.apply(Command::PlaceBeacon));
        assert_eq!(sim.grid().population(), 6);
        assert!(sim.apply(Command::ToggleCell));
        assert_eq!(sim.grid().population(), 5);
        assert!(sim.apply(Command::Reset));
        assert!(sim.grid().is_empty());
        assert!(sim.apply(Command::PlaceGlider));
        assert_eq!(sim.grid().population(), 5);
    }

    #[test]
    fn view_mirrors_state() {
        let mut sim = sim(6, 4);
        sim.move_cursor(-1, 2);
        sim.toggle_cell();
        sim.tick(0.75);
        let view = sim.view();
        assert_eq!((view.width, view.height), (6, 4));
        assert_eq!(view.cursor, (5, 2));
        assert_eq!(view.generation, 1);
        assert!(view.simulating);
        assert_eq!(view.cells.len(), 24);
    }
}
