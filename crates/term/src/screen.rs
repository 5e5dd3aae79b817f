//! Screen: owns the terminal while the app runs and presents frames.
//!
//! Each [`Screen::present`] renders a [`ViewState`] into a back buffer, writes
//! only the cells that differ from what the terminal already shows, then
//! swaps the buffers. A new viewport size or [`Screen::force_repaint`] makes
//! the next frame a full repaint.

use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetBackgroundColor, SetColors,
        SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::game_view::{GameView, ViewState, Viewport};

/// What one `present` call wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painted {
    pub full: bool,
    pub cells: usize,
}

pub struct Screen<W: Write> {
    out: W,
    view: GameView,
    /// What the terminal currently shows
    shown: FrameBuffer,
    next: FrameBuffer,
    repaint: bool,
    raw: bool,
    buf: Vec<u8>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, view: GameView) -> Self {
        Self {
            out,
            view,
            shown: FrameBuffer::new(0, 0),
            next: FrameBuffer::new(0, 0),
            repaint: true,
            raw: false,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.raw = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.repaint = true;
        Ok(())
    }

    /// Give the terminal back. Also runs on drop if still entered.
    pub fn leave(&mut self) -> Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Make the next frame a full repaint (after a resize or anything else
    /// that may have scribbled on the terminal).
    pub fn force_repaint(&mut self) {
        self.repaint = true;
    }

    /// Render `state` at `viewport` and write the changes.
    pub fn present(&mut self, state: &ViewState<'_>, viewport: Viewport) -> Result<Painted> {
        self.view.render_into(state, viewport, &mut self.next);

        let full = self.repaint
            || self.shown.width() != self.next.width()
            || self.shown.height() != self.next.height();
        let prev = (!full).then_some(&self.shown);

        self.buf.clear();
        let cells = paint(prev, &self.next, &mut self.buf)?;
        if full || cells > 0 {
            self.flush_buf()?;
        }

        std::mem::swap(&mut self.shown, &mut self.next);
        self.repaint = false;
        Ok(Painted { full, cells })
    }

    /// Writer the frames go to
    pub fn output(&self) -> &W {
        &self.out
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for Screen<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Queue the commands that turn `prev` into `next`, or repaint everything when
/// there is no `prev`. Returns how many cells were written.
fn paint(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<usize> {
    let width = usize::from(next.width());
    if width == 0 {
        return Ok(0);
    }
    if prev.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut pen = Pen::default();
    let mut written = 0;
    let prev_rows = prev.map(|p| p.cells().chunks(width));
    let mut prev_rows = prev_rows.into_iter().flatten();

    for (y, row) in next.cells().chunks(width).enumerate() {
        let old = prev_rows.next();
        let same = |x: usize| old.and_then(|old| old.get(x)) == Some(&row[x]);
        let mut x = 0;
        while x < row.len() {
            if same(x) {
                x += 1;
                continue;
            }
            let start = x;
            while x < row.len() && !same(x) {
                x += 1;
            }
            out.queue(cursor::MoveTo(start as u16, y as u16))?;
            for cell in &row[start..x] {
                pen.draw(out, *cell)?;
            }
            written += x - start;
        }
    }

    if written > 0 || prev.is_none() {
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(ResetColor)?;
    }
    Ok(written)
}

/// Tracks the terminal's current style so runs only emit what changes.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn draw(&mut self, out: &mut Vec<u8>, cell: Cell) -> Result<()> {
        self.apply(out, cell.style)?;
        out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn apply(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        let Some(old) = self.style.replace(style) else {
            return set_all(out, style);
        };
        if old == style {
            return Ok(());
        }
        if old.bold != style.bold || old.dim != style.dim {
            // SGR reset also drops colors.
            return set_all(out, style);
        }
        if old.fg != style.fg {
            out.queue(SetForegroundColor(color(style.fg)))?;
        }
        if old.bg != style.bg {
            out.queue(SetBackgroundColor(color(style.bg)))?;
        }
        Ok(())
    }
}

fn set_all(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetColors(Colors::new(color(style.fg), color(style.bg))))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
