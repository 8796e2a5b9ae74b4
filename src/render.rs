use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{self, BeginSynchronizedUpdate, ClearType, EndSynchronizedUpdate},
};
use life_common::{Glyphs, GridView};
use std::io::Write;

/// Anything that can present a frame of the simulation.
pub trait Renderer {
    fn render(&mut self, view: &GridView<'_>) -> Result<()>;
}

const MARGIN: &str = "    ";

const TITLE: &str = "         Conway's Game of Life";
const HELP: [&str; 5] = [
    "  Use the arrow keys to move the cursor",
    "  Place different patterns at the cursor",
    "          R to reset the grid",
    "          G to make a glider",
    "          B to make a beacon",
];
const HELP_FOOTER: &str = "   Space to toggle a cell, Esc to quit";

/// How a frame is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub glyphs: Glyphs,
    pub show_help: bool,
    /// Random block size quoted in the help text.
    pub random_block: (usize, usize),
}

impl Default for FrameStyle {
    fn default() -> Self {
        FrameStyle {
            glyphs: Glyphs::default(),
            show_help: true,
            random_block: (5, 5),
        }
    }
}

/// Builds the text lines of one frame: header, then the bordered grid.
/// The cursor glyph overrides the cell under it.
pub fn compose_frame(view: &GridView<'_>, style: &FrameStyle) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.height + HELP.len() + 6);

    lines.push(TITLE.to_string());
    if style.show_help {
        lines.extend(HELP.iter().map(|line| line.to_string()));
        let (w, h) = style.random_block;
        lines.push(format!("      A to make a random {}x{} pattern", w, h));
        lines.push(HELP_FOOTER.to_string());
    }
    lines.push(format!("         Current generation: {}", view.generation));

    let border = format!("{MARGIN}+{}+", "-".repeat(view.width));
    lines.push(border.clone());
    for y in 0..view.height {
        let mut line = String::with_capacity(MARGIN.len() + view.width + 2);
        line.push_str(MARGIN);
        line.push('|');
        for x in 0..view.width {
            let glyph = if view.is_cursor(x, y) {
                style.glyphs.cursor
            } else if view.is_alive(x, y) {
                style.glyphs.alive
            } else {
                style.glyphs.dead
            };
            line.push(glyph);
        }
        line.push('|');
        lines.push(line);
    }
    lines.push(border);
    lines
}

/// Draws frames onto a terminal through crossterm, replacing the previous frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    style: FrameStyle,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, style: FrameStyle) -> Self {
        Self { out, style }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &GridView<'_>) -> Result<()> {
        let lines = compose_frame(view, &self.style);

        queue!(
            self.out,
            BeginSynchronizedUpdate,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::All)
        )?;
        for line in &lines {
            // Raw mode: no implicit carriage return on newline
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}
