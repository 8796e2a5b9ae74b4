use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, execute, terminal};
use env_logger::{Builder, Target};
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use life_common::LifeConfig;
use life_engine::{
    game_loop, FrameStyle, LifeSimulation, SystemClock, TerminalInput, TerminalRenderer,
};

/// Command-line arguments for the console Game of Life
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a config.toml file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Seed for random blocks (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds between generations (overrides the config file)
    #[arg(long)]
    interval: Option<f64>,

    /// Write logs to this file; the terminal is busy drawing the grid
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Loads the config file (if any) and applies command-line overrides.
    fn resolve_config(&self) -> Result<LifeConfig> {
        let mut config = match &self.config {
            Some(path) => LifeConfig::load(path)?,
            None => LifeConfig::default(),
        };
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(seed) = self.seed {
            config.patterns.seed = Some(seed);
        }
        if let Some(interval) = self.interval {
            config.timing.update_interval_s = interval;
        }
        config.validate().context("Invalid configuration after command-line overrides")?;
        Ok(config)
    }
}

fn init_logger(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file '{}'", path.display()))?;
            Builder::new()
                .filter(None, LevelFilter::Info)
                .parse_default_env()
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        // Stderr shares the screen with the grid, so stay quiet unless RUST_LOG asks otherwise
        None => env_logger::init(),
    }
    Ok(())
}

/// Raw mode + alternate screen for the lifetime of the guard.
struct TermGuard<W: Write> {
    out: W,
}

impl<W: Write> TermGuard<W> {
    /// Any setup step that fails drops the guard, undoing the steps before it.
    fn new(out: W) -> io::Result<Self> {
        let mut guard = Self { out };
        terminal::enable_raw_mode()?;
        execute!(
            guard.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TermGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // --- Load Configuration ---
    let config = args.resolve_config()?;
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    init_logger(args.log_file.as_ref())?;
    info!("Starting Game of Life ({}x{} grid)...", config.grid.width, config.grid.height);

    // --- Initialize Simulation ---
    let params = config.get_life_params();
    let mut sim = LifeSimulation::new(params)?;
    let style = FrameStyle {
        glyphs: config.display.glyphs(),
        show_help: config.display.show_help,
        random_block: (config.patterns.random_block_width, config.patterns.random_block_height),
    };
    let frame_pause = Duration::from_millis(config.timing.frame_pause_ms);

    // --- Main Loop ---
    let stats = {
        let guard = TermGuard::new(io::stdout()).context("Failed to set up terminal")?;
        let mut renderer = TerminalRenderer::new(&guard.out, style);
        game_loop::run(
            &mut sim,
            &mut TerminalInput,
            &mut renderer,
            &mut SystemClock::new(),
            frame_pause,
        )?
        // guard drops here, restoring the terminal
    };

    let view = sim.view();
    println!(
        "Reached generation {} with {} live cells.",
        view.generation,
        view.population()
    );
    info!("Game of Life complete ({} frames drawn).", stats.frames_rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn overrides_replace_defaults() {
        let args = Args::parse_from([
            "life-engine",
            "--width",
            "40",
            "--height",
            "20",
            "--seed",
            "9",
            "--interval",
            "0.25",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!((config.grid.width, config.grid.height), (40, 20));
        assert_eq!(config.patterns.seed, Some(9));
        assert_eq!(config.timing.update_interval_s, 0.25);
        assert_eq!(config.display, life_common::DisplayConfig::default());
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = Args::parse_from(["life-engine", "--width", "0"]);
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn override_can_repair_invalid_file_value() {
        let path = std::env::temp_dir()
            .join(format!("life-engine-{}-zero-width.toml", std::process::id()));
        std::fs::write(&path, "[grid]\nwidth = 0\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let repaired = Args::parse_from(["life-engine", "--config", &path_arg, "--width", "10"]);
        let result = repaired.resolve_config();
        let unrepaired = Args::parse_from(["life-engine", "--config", &path_arg]).resolve_config();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(result.unwrap().grid.width, 10);
        let err = unrepaired.unwrap_err();
        assert!(format!("{err:#}").contains("after command-line overrides"), "{err:#}");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["life-engine", "--config", "/nonexistent/life.toml"]);
        let err = args.resolve_config().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }

    /// Records every write except the one entering the alternate screen, which fails.
    struct BrokenScreen(Rc<RefCell<Vec<u8>>>);

    impl Write for BrokenScreen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.windows(6).any(|w| w == b"?1049h") {
                return Err(io::Error::other("alternate screen unavailable"));
            }
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_terminal_setup_still_restores_screen() {
        let written = Rc::new(RefCell::new(Vec::new()));
        assert!(TermGuard::new(BrokenScreen(Rc::clone(&written))).is_err());

        let written = String::from_utf8(written.borrow().clone()).unwrap();
        assert!(written.contains("\x1b[?25h"), "{written:?}");
        assert!(written.contains("\x1b[?1049l"), "{written:?}");
    }

    #[test]
    fn args_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
