//! GameView: maps a session snapshot into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::types::{PieceKind, Task, TaskId};
use crate::core::{GameState, Inventory, RandomSource, RewardTally, Stall};
use crate::engine::Session;
use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything one frame shows, borrowed from the session and the host.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub game: &'a GameState,
    pub paused: bool,
    pub inventory: &'a Inventory,
    pub rewards: &'a RewardTally,
    /// Tasks in display order with their scores
    pub ranked: &'a [(&'a Task, f64)],
    pub recommended: Option<TaskId>,
    pub selected: Option<TaskId>,
    /// Title being typed for a new task
    pub entry: Option<&'a str>,
    /// One-line message (last error, last reward)
    pub status: Option<&'a str>,
}

impl<'a> ViewState<'a> {
    /// Snapshot a session. `ranked` is normally `session.ranked()`.
    pub fn from_session<R: RandomSource>(
        session: &'a Session<R>,
        ranked: &'a [(&'a Task, f64)],
    ) -> Self {
        Self {
            game: session.game(),
            paused: session.is_paused(),
            inventory: session.inventory(),
            rewards: session.rewards(),
            ranked,
            recommended: session.recommended().map(|t| t.id),
            selected: None,
            entry: None,
            status: None,
        }
    }

    pub fn with_selected(mut self, selected: Option<TaskId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_entry(mut self, entry: Option<&'a str>) -> Self {
        self.entry = entry;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

/// A lightweight terminal renderer for the falling-block board and task list.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const MIN_PANEL_W: u16 = 16;
const HELP: &str = "arrows move/rotate  space drop  p pause  r restart  n new  enter done  q quit";

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a frame into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, view: &ViewState<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board = view.game.board();
        let board_px_w = u16::from(board.width()) * self.cell_w;
        let board_px_h = u16::from(board.height()) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        // Board sits left of center so the task panel has room.
        let start_x = viewport.width.saturating_sub(frame_w) / 4;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h + 1) / 2,
            AnchorY::Top => 0,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Settled cells carry no kind, so they share one color.
        let settled = CellStyle::new(Rgb::new(150, 150, 165), BOARD_BG);
        for y in 0..i16::from(board.height()) {
            for x in 0..i16::from(board.width()) {
                if board.is_occupied(x, y) {
                    self.fill_cell_rect(fb, start_x, start_y, x as u16, y as u16, '▓', settled);
                } else {
                    self.draw_empty_cell(fb, start_x, start_y, x as u16, y as u16);
                }
            }
        }

        if let (Some(active), Some(ghost_y)) = (view.game.active(), view.game.ghost_y()) {
            let ghost_style = CellStyle::new(Rgb::new(140, 140, 140), BOARD_BG).dim();
            let ghost = crate::core::ActivePiece { y: ghost_y, ..active };
            for (x, y) in ghost.cells() {
                if board.is_valid(x, y) {
                    self.fill_cell_rect(fb, start_x, start_y, x as u16, y as u16, '░', ghost_style);
                }
            }
        }

        if let Some(active) = view.game.active() {
            let style = CellStyle::new(piece_color(active.kind), BOARD_BG).bold();
            for (x, y) in active.cells() {
                if board.is_valid(x, y) {
                    self.fill_cell_rect(fb, start_x, start_y, x as u16, y as u16, '█', style);
                }
            }
        }

        self.draw_side_panel(fb, view, viewport, start_x, start_y, frame_w);
        self.draw_footer(fb, view, viewport, start_x, start_y + frame_h);

        if view.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        } else if let Some(stall) = view.game.stall().filter(|_| view.game.is_stalled()) {
            let text = match stall {
                Stall::OutOfPieces => "FINISH A TASK",
                Stall::SpawnBlocked => "BLOCKED - R",
            };
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, view: &ViewState<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(view, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        view: &ViewState<'_>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < MIN_PANEL_W {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_str(panel_x + 8, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, view.game.score(), value);
        fb.put_u32(panel_x + 8, y, view.game.lines(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "PIECES", label);
        y = y.saturating_add(1);
        let mut x = panel_x;
        for kind in PieceKind::ALL {
            let count = view.inventory.count(kind);
            let style = CellStyle::new(piece_color(kind), PANEL_BG);
            let style = if count == 0 { style.dim() } else { style.bold() };
            fb.put_str(x, y, kind.as_str(), style);
            let end = fb.put_u32(x + 1, y, count, if count == 0 { dim } else { value });
            x = end.saturating_add(1);
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "DONE", label);
        fb.put_str(panel_x + 8, y, "EARNED", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, view.rewards.tasks_completed, value);
        fb.put_u32(panel_x + 8, y, view.rewards.pieces_granted, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "TASKS", label);
        y = y.saturating_add(1);
        if view.ranked.is_empty() {
            fb.put_str(panel_x, y, "none yet - press n", dim);
            return;
        }

        let highlight = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(50, 60, 90)).bold();
        for (task, score) in view.ranked {
            if y >= viewport.height.saturating_sub(2) {
                break;
            }
            let style = if task.completed { dim } else { value };
            let marker = if Some(task.id) == view.recommended { '*' } else { ' ' };
            fb.put_char(panel_x, y, marker, label);
            fb.put_str(panel_x + 1, y, if task.completed { "[x]" } else { "[ ]" }, style);

            // Score with two decimals, as hundredths.
            let hundredths = (score * 100.0).round() as u32;
            let mut cx = fb.put_u32(panel_x + 5, y, hundredths / 100, style);
            fb.put_char(cx, y, '.', style);
            cx += 1;
            let frac = hundredths % 100;
            if frac < 10 {
                fb.put_char(cx, y, '0', style);
                cx += 1;
            }
            cx = fb.put_u32(cx, y, frac, style) + 1;

            let room = (panel_x + panel_w).saturating_sub(cx);
            fb.put_str_max(cx, y, &task.title, room, style);

            if Some(task.id) == view.selected {
                fb.restyle_span(panel_x + 1, y, panel_w.saturating_sub(1), highlight);
            }
            y = y.saturating_add(1);
        }
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, view: &ViewState<'_>, viewport: Viewport, x: u16, y: u16) {
        if y >= viewport.height {
            return;
        }
        let style = CellStyle::new(Rgb::new(180, 180, 180), PANEL_BG);
        if let Some(text) = view.entry {
            let prompt = style.bold();
            let end = fb.put_str_max(x, y, "new task: ", viewport.width, prompt);
            let end = fb.put_str_max(end, y, text, viewport.width, style);
            fb.put_char(end, y, '_', prompt);
        } else if let Some(status) = view.status {
            fb.put_str(x, y, status, style);
        } else {
            fb.put_str(x, y, HELP, style.dim());
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}
