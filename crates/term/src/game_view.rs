//! BattleView: maps a [`RoundSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Board, Piece, RoundSnapshot, SessionSnapshot};
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
use crate::types::{Cell, TEMPLATE_SIZE};

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

const BG: Rgb = Rgb::new(0, 0, 0);
const TEXT: Rgb = Rgb::new(255, 255, 255);
const SHADOW: Rgb = Rgb::new(185, 185, 185);

/// Border color per player, cycled for larger rounds.
pub const BORDER_COLORS: [Rgb; 2] = [Rgb::new(155, 0, 0), Rgb::new(0, 155, 155)];

/// Block colors as `(shade, highlight)`, indexed by piece color.
pub const PALETTE: [(Rgb, Rgb); 4] = [
    (Rgb::new(0, 0, 155), Rgb::new(0, 0, 255)),
    (Rgb::new(0, 155, 0), Rgb::new(0, 255, 0)),
    (Rgb::new(155, 0, 0), Rgb::new(255, 0, 0)),
    (Rgb::new(155, 155, 0), Rgb::new(255, 255, 0)),
];

/// Columns between neighbouring boards and between the boards and the panel.
const GAP: u16 = 2;
const PANEL_W: u16 = 12;
/// Template rows shown for a preview; the last row of every template is blank.
const PREVIEW_ROWS: usize = TEMPLATE_SIZE - 1;

/// Style for a block of palette color `color`.
pub fn block_style(color: u8) -> Style {
    let (shade, light) = PALETTE[color as usize % PALETTE.len()];
    Style::new(light, shade).bold()
}

pub fn border_style(player: usize) -> Style {
    Style::new(BORDER_COLORS[player % BORDER_COLORS.len()], BG).bold()
}

/// Terminal renderer for a battle round.
#[derive(Debug, Clone)]
pub struct BattleView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for BattleView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

/// Computed placement of every element for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    origin_x: u16,
    origin_y: u16,
    frame_w: u16,
    frame_h: u16,
    total_w: u16,
    total_h: u16,
}

impl Layout {
    fn board_x(&self, player: usize) -> u16 {
        self.origin_x + (player as u16) * (self.frame_w + GAP)
    }

    fn panel_x(&self, players: usize) -> u16 {
        self.board_x(players)
    }
}

impl BattleView {
    fn layout(&self, snap: &RoundSnapshot, viewport: Viewport) -> Layout {
        let (bw, bh) = snap
            .sessions
            .first()
            .map(|s| (s.board.width() as u16, s.board.height() as u16))
            .unwrap_or((0, 0));
        let frame_w = bw * self.cell_w + 2;
        let frame_h = bh * self.cell_h + 2;
        let players = snap.sessions.len() as u16;
        let total_w = players * (frame_w + GAP) + PANEL_W;
        // One status line below the boards.
        let total_h = frame_h + 1;
        Layout {
            origin_x: viewport.width.saturating_sub(total_w) / 2,
            origin_y: viewport.height.saturating_sub(total_h) / 2,
            frame_w,
            frame_h,
            total_w,
            total_h,
        }
    }

    /// Render the round into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &RoundSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::new(' ', Style::new(TEXT, BG)));

        let layout = self.layout(snap, viewport);
        for session in &snap.sessions {
            self.draw_session(fb, &layout, session, !snap.over);
        }
        self.draw_panel(fb, &layout, snap);

        if snap.over {
            self.draw_banner(fb, &layout, "GAME OVER", Some("Press a key to play."));
        } else if snap.paused {
            self.draw_banner(fb, &layout, "PAUSED", Some("Press a key to play."));
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &RoundSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_session(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        session: &SessionSnapshot,
        mark_game_over: bool,
    ) {
        let x0 = layout.board_x(session.index);
        let y0 = layout.origin_y;
        draw_border(
            fb,
            x0,
            y0,
            layout.frame_w,
            layout.frame_h,
            border_style(session.index),
        );
        self.draw_board(fb, x0 + 1, y0 + 1, &session.board);
        if let Some(piece) = session.falling {
            self.draw_falling(fb, x0 + 1, y0 + 1, &session.board, &piece);
        }

        let status = Style::new(TEXT, BG);
        let line_y = y0 + layout.frame_h;
        let mut x = fb.put_str(x0, line_y, "P", status);
        x = fb.put_u32(x, line_y, session.index as u32 + 1, status);
        x = fb.put_str(x, line_y, " Score ", status);
        x = fb.put_u32(x, line_y, session.score, status);
        x = fb.put_str(x, line_y, " Lv ", status);
        fb.put_u32(x, line_y, session.level, status);

        if mark_game_over && session.game_over {
            let text = "GAME OVER";
            let tx = x0 + layout.frame_w.saturating_sub(text.len() as u16) / 2;
            let ty = y0 + layout.frame_h / 2;
            fb.put_str(tx, ty, text, Style::new(TEXT, BG).bold());
        }
    }

    fn draw_board(&self, fb: &mut FrameBuffer, x0: u16, y0: u16, board: &Board) {
        let empty = Style::new(Rgb::new(60, 60, 60), BG).dim();
        for y in 0..board.height() as usize {
            for (x, cell) in board.row(y).iter().enumerate() {
                let (ch, style) = match *cell {
                    Cell::Filled(color) => ('█', block_style(color)),
                    Cell::Blank | Cell::Poison => ('·', empty),
                };
                self.fill_cell(fb, x0, y0, x as u16, y as u16, ch, style);
            }
        }
    }

    /// Draw the falling piece, clipped to the visible board.
    fn draw_falling(&self, fb: &mut FrameBuffer, x0: u16, y0: u16, board: &Board, piece: &Piece) {
        let style = block_style(piece.color);
        for (x, y) in piece.cells_at(0, 0) {
            if board.is_in_bounds(x, y) {
                self.fill_cell(fb, x0, y0, x as u16, y as u16, '█', style);
            }
        }
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, x0: u16, y0: u16, piece: &Piece) {
        let style = block_style(piece.color);
        for ly in 0..PREVIEW_ROWS {
            for lx in 0..TEMPLATE_SIZE {
                if piece.cell(lx, ly).is_filled() {
                    self.fill_cell(fb, x0, y0, lx as u16, ly as u16, '█', style);
                }
            }
        }
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, layout: &Layout, snap: &RoundSnapshot) {
        let x = layout.panel_x(snap.sessions.len());
        if x >= fb.width() {
            return;
        }
        let label = Style::new(TEXT, BG).bold();
        let value = Style::new(TEXT, BG);

        let mut y = layout.origin_y;
        if let Some(first) = snap.sessions.first() {
            fb.put_str(x, y, "SCORE", label);
            fb.put_u32(x, y + 1, first.score, value);
            fb.put_str(x, y + 3, "LEVEL", label);
            fb.put_u32(x, y + 4, first.level, value);
            y += 6;
        }

        fb.put_str(x, y, "NEXT", label);
        y += 1;
        for session in &snap.sessions {
            if y >= layout.origin_y + layout.total_h {
                break;
            }
            let tag = border_style(session.index);
            let cx = fb.put_str(x, y, "P", tag);
            fb.put_u32(cx, y, session.index as u32 + 1, tag);
            self.draw_preview(fb, x, y + 1, &session.next);
            y += PREVIEW_ROWS as u16 * self.cell_h + 1;
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, layout: &Layout, title: &str, hint: Option<&str>) {
        let mid_y = layout.origin_y + layout.total_h / 2;
        let title_x = centered(layout.origin_x, layout.total_w, title);
        let pad = Style::new(TEXT, BG);
        fb.fill_rect(
            title_x.saturating_sub(1),
            mid_y.saturating_sub(1),
            title.chars().count() as u16 + 3,
            3,
            ' ',
            pad,
        );
        fb.put_str(title_x + 1, mid_y, title, Style::new(SHADOW, BG));
        fb.put_str(title_x, mid_y, title, Style::new(TEXT, BG).bold());

        if let Some(hint) = hint {
            let hint_x = centered(layout.origin_x, layout.total_w, hint);
            let hint_y = mid_y + 2;
            fb.fill_rect(hint_x, hint_y, hint.chars().count() as u16, 1, ' ', pad);
            fb.put_str(hint_x, hint_y, hint, pad);
        }
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        x0: u16,
        y0: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: Style,
    ) {
        let px = x0 + cell_x * self.cell_w;
        let py = y0 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }
}

fn centered(x0: u16, width: u16, text: &str) -> u16 {
    x0 + width.saturating_sub(text.chars().count() as u16) / 2
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: Style) {
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
