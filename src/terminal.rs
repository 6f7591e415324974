use crate::color::Color;
use crate::graphics::{draw_model, fill_triangle, Framebuffer};
use crate::overlay::{OverlayItem, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::render::Renderer;
use crate::scene::Frame;
use anyhow::Context;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};

/// Used when the terminal size cannot be queried
const FALLBACK_SIZE: (usize, usize) = (80, 24);
/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// A line of overlay text placed on the character grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub row: usize,
    pub col: usize,
    pub color: Color,
    pub text: String,
}

impl TextLine {
    fn len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Clears the framebuffer and draws the model and overlay shapes
pub fn rasterize(frame: &Frame<'_>, fb: &mut Framebuffer) {
    fb.clear(frame.clear);
    if let Some(model) = &frame.model {
        let aspect = fb.width() as f64 / fb.height().max(1) as f64;
        draw_model(
            model,
            &frame.camera.view(),
            &frame.camera.projection(aspect),
            frame.camera.near,
            &frame.lighting,
            fb,
        );
    }

    let scale_x = fb.width() as f64 / SCREEN_WIDTH;
    let scale_y = fb.height() as f64 / SCREEN_HEIGHT;
    for item in &frame.overlay {
        if let OverlayItem::Triangle { points, color } = item {
            let scaled = points.map(|[x, y]| [x * scale_x, y * scale_y]);
            fill_triangle(&scaled, fb, *color);
        }
    }
}

/// Lines overlapping `col..end` on `row`, together with every line they
/// would push into when moved up one row. `None` when the stack reaches the
/// top of the grid.
fn lift_stack(placed: &[TextLine], row: usize, col: usize, end: usize) -> Option<Vec<usize>> {
    let mut lifted = Vec::new();
    let mut pending = vec![(row, col, end)];
    while let Some((row, col, end)) = pending.pop() {
        for (i, line) in placed.iter().enumerate() {
            if line.row != row || line.col >= end || col >= line.col + line.len() {
                continue;
            }
            if lifted.contains(&i) {
                continue;
            }
            if row == 0 {
                return None;
            }
            lifted.push(i);
            pending.push((row - 1, line.col, line.col + line.len()));
        }
    }
    Some(lifted)
}

/// Places overlay text on a `cols` x `rows` grid. A line landing on an
/// occupied row moves down to the next free one. A line pushed past the
/// last row takes the last row and lifts the lines above it; it is dropped
/// only when the column is full. Long lines are clipped at the right edge.
pub fn layout_text(items: &[OverlayItem], cols: usize, rows: usize) -> Vec<TextLine> {
    let mut placed: Vec<TextLine> = Vec::new();
    for item in items {
        let OverlayItem::Text {
            position,
            color,
            text,
        } = item
        else {
            continue;
        };

        let col = (position[0] / SCREEN_WIDTH * cols as f64).round() as usize;
        if col >= cols {
            continue;
        }
        let text: String = text.chars().take(cols - col).collect();
        if text.is_empty() {
            continue;
        }
        let end = col + text.chars().count();

        let mut row = (position[1] / SCREEN_HEIGHT * rows as f64).floor() as usize;
        while placed
            .iter()
            .any(|line| line.row == row && line.col < end && col < line.col + line.len())
        {
            row += 1;
        }
        if row >= rows {
            if rows == 0 {
                continue;
            }
            row = rows - 1;
            let Some(lifted) = lift_stack(&placed, row, col, end) else {
                continue;
            };
            for i in lifted {
                placed[i].row -= 1;
            }
        }
        placed.push(TextLine {
            row,
            col,
            color: *color,
            text,
        });
    }
    placed
}

/// Switches `out` to the alternate screen. Raw mode is already on, so
/// `leave_raw_mode` runs when the switch fails.
fn enter_alternate_screen<W: Write>(
    out: &mut W,
    leave_raw_mode: impl FnOnce(),
) -> anyhow::Result<()> {
    if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
        leave_raw_mode();
        return Err(err).context("Failed to enter alternate screen");
    }
    Ok(())
}

/// Software renderer presenting to a terminal with half-block cells
pub struct TerminalRenderer<W: Write> {
    out: W,
    fb: Framebuffer,
    /// Fixed grid size; `None` follows the terminal
    fixed_size: Option<(usize, usize)>,
    restore_on_drop: bool,
}

impl TerminalRenderer<Stdout> {
    /// Switches the terminal to raw mode on the alternate screen. The
    /// terminal is restored when the renderer is dropped.
    pub fn stdout() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = io::stdout();
        enter_alternate_screen(&mut out, || {
            let _ = terminal::disable_raw_mode();
        })?;
        Ok(TerminalRenderer {
            out,
            fb: Framebuffer::new(0, 0),
            fixed_size: None,
            restore_on_drop: true,
        })
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Renders into any writer on a fixed grid, leaving terminal modes alone
    #[cfg(test)]
    pub fn with_size(out: W, cols: usize, rows: usize) -> Self {
        TerminalRenderer {
            out,
            fb: Framebuffer::new(cols, rows * 2),
            fixed_size: Some((cols, rows)),
            restore_on_drop: false,
        }
    }

    #[cfg(test)]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn grid_size(&self) -> (usize, usize) {
        self.fixed_size.unwrap_or_else(|| {
            termsize::get()
                .map(|size| (size.cols as usize, size.rows as usize))
                .unwrap_or(FALLBACK_SIZE)
        })
    }

    fn present(&mut self, lines: &[TextLine], cols: usize, rows: usize) -> io::Result<()> {
        let mut glyphs: Vec<Option<(char, Color)>> = vec![None; cols * rows];
        for line in lines {
            for (i, ch) in line.text.chars().enumerate() {
                glyphs[line.row * cols + line.col + i] = Some((ch, line.color));
            }
        }

        let mut current_fg = None;
        let mut current_bg = None;
        for row in 0..rows {
            queue!(self.out, MoveTo(0, row as u16))?;
            for col in 0..cols {
                let top = self.fb.pixel(col, row * 2);
                let bottom = self.fb.pixel(col, row * 2 + 1);
                let (ch, fg, bg) = match glyphs[row * cols + col] {
                    Some((ch, color)) => (ch, color, top),
                    None => (HALF_BLOCK, top, bottom),
                };
                if current_fg != Some(fg) {
                    queue!(self.out, SetForegroundColor(fg.into()))?;
                    current_fg = Some(fg);
                }
                if current_bg != Some(bg) {
                    queue!(self.out, SetBackgroundColor(bg.into()))?;
                    current_bg = Some(bg);
                }
                queue!(self.out, Print(ch))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        let (cols, rows) = self.grid_size();
        self.fb.resize(cols, rows * 2);
        rasterize(frame, &mut self.fb);
        let lines = layout_text(&frame.overlay, cols, rows);
        self.present(&lines, cols, rows)
            .context("Failed to present frame")
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if self.restore_on_drop {
            let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
}
