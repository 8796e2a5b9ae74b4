use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;
use std::time::Duration;

/// A discrete user action, produced once per detected key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    MoveCursor { dx: isize, dy: isize },
    Reset,
    PlaceGlider,
    PlaceBeacon,
    PlaceRandomBlock,
    ToggleCell,
}

/// Anything that can report the commands issued since it was last polled.
pub trait InputSource {
    /// Returns pending commands in the order they were issued. Must not block.
    fn poll_commands(&mut self) -> Result<Vec<Command>>;
}

/// Maps a key event to a command. Key releases and repeats map to nothing.
pub fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Exit),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Command::Exit,
        KeyCode::Left | KeyCode::Char('h') => Command::MoveCursor { dx: -1, dy: 0 },
        KeyCode::Right | KeyCode::Char('l') => Command::MoveCursor { dx: 1, dy: 0 },
        KeyCode::Up | KeyCode::Char('k') => Command::MoveCursor { dx: 0, dy: -1 },
        KeyCode::Down | KeyCode::Char('j') => Command::MoveCursor { dx: 0, dy: 1 },
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Reset,
        KeyCode::Char('g') | KeyCode::Char('G') => Command::PlaceGlider,
        KeyCode::Char('b') | KeyCode::Char('B') => Command::PlaceBeacon,
        KeyCode::Char('a') | KeyCode::Char('A') => Command::PlaceRandomBlock,
        KeyCode::Char(' ') => Command::ToggleCell,
        _ => return None,
    };
    Some(command)
}

/// Reads key presses from the terminal's event queue (crossterm).
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_commands(&mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        // Drain everything queued this frame without waiting
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = command_for_key(&key) {
                    trace!("Key {:?} -> {:?}", key.code, command);
                    commands.push(command);
                }
            }
        }
        Ok(commands)
    }
}
