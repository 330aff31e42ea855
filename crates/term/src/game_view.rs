//! GameView: maps a session snapshot into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::engine::{BlastError, Phase, SessionSnapshot, Status};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::DisplayBucket;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(90, 90, 110);
const HINT_BG: Rgb = Rgb::new(60, 60, 40);

/// Block colors by color index.
const PALETTE: [Rgb; 6] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 120, 220),
    Rgb::new(100, 220, 120),
    Rgb::new(240, 220, 80),
    Rgb::new(200, 120, 220),
    Rgb::new(80, 220, 220),
];

/// Glyph for a block, by display bucket: bigger groups get heavier icons.
pub fn bucket_glyph(bucket: DisplayBucket) -> char {
    match bucket {
        DisplayBucket::Default => '●',
        DisplayBucket::A => '◆',
        DisplayBucket::B => '★',
        DisplayBucket::C => '✸',
    }
}

pub fn color_rgb(color: u8) -> Rgb {
    PALETTE
        .get(color as usize)
        .copied()
        .unwrap_or(Rgb::new(128, 128, 128))
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // Glyph plus a space keeps cells roughly square.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer. Allocation-free once the
    /// framebuffer has the viewport's size.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().glyph(' '));

        let board = &snap.board;
        let rows = board.rows as u16;
        let columns = board.columns as u16;
        let frame_w = columns * self.cell_w + 2;
        let frame_h = rows + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            columns * self.cell_w,
            rows,
            ' ',
            CellStyle::new(BOARD_BG, BOARD_BG),
        );
        fb.draw_box(start_x, start_y, frame_w, frame_h, border);

        for r in 0..board.rows as usize {
            for c in 0..board.columns as usize {
                let bg = if snap.cursor == (r as u8, c as u8) {
                    CURSOR_BG
                } else if snap.hint == Some((r as u8, c as u8)) {
                    HINT_BG
                } else {
                    BOARD_BG
                };
                let px = start_x + 1 + c as u16 * self.cell_w;
                let py = start_y + 1 + r as u16;
                self.draw_cell(fb, px, py, board.color_at(r, c), board.buckets[r][c], bg);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        match (snap.phase, snap.status) {
            (Phase::Shuffling, _) => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "SHUFFLE")
            }
            (_, Status::NoMoves) => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "NO MOVES")
            }
            _ => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        px: u16,
        py: u16,
        color: Option<u8>,
        bucket: u8,
        bg: Rgb,
    ) {
        let empty = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
        fb.fill_rect(px, py, self.cell_w, 1, ' ', empty);

        match color {
            Some(color) => {
                let bucket = DisplayBucket::from_u8(bucket).unwrap_or_default();
                let mut style = CellStyle::new(color_rgb(color), bg);
                if bucket != DisplayBucket::Default {
                    style = style.bold();
                }
                fb.put_char(px, py, bucket_glyph(bucket), style);
            }
            None => fb.put_char(px, py, '·', empty),
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let dim = value.dim();

        let mut y = start_y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("MOVES", snap.moves),
            ("SHUFFLES", snap.shuffles),
            ("GROUPS", snap.board.group_count as u32),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        let x = fb.put_str(panel_x, y, "COLORS ", dim);
        fb.put_u32(x, y, snap.board.color_count as u32, dim);
        y = y.saturating_add(2);

        self.draw_status(fb, panel_x, y, snap.status, value);
        y = y.saturating_add(2);

        for help in ["arrows move", "space blast", "? hint  x shuffle", "r restart  q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y += 1;
        }
    }

    fn draw_status(&self, fb: &mut FrameBuffer, x: u16, y: u16, status: Status, style: CellStyle) {
        match status {
            Status::Ready => {
                fb.put_str(x, y, "Ready", style);
            }
            Status::Blasted { size, points } => {
                let cx = fb.put_str(x, y, "Blast ", style);
                let cx = fb.put_u32(cx, y, size as u32, style);
                let cx = fb.put_str(cx, y, " +", style);
                fb.put_u32(cx, y, points, style);
            }
            Status::Rejected(err) => {
                let warn = CellStyle {
                    fg: Rgb::new(240, 160, 80),
                    ..style
                };
                let text = match err {
                    BlastError::OutOfRange => "Off the board",
                    BlastError::EmptyCell => "Empty cell",
                    BlastError::GroupTooSmall => "Group too small",
                    BlastError::Busy => "Wait...",
                };
                fb.put_str(x, y, text, warn);
            }
            Status::Deadlocked => {
                fb.put_str(x, y, "No moves, shuffling", style);
            }
            Status::Shuffled => {
                fb.put_str(x, y, "Shuffled", style);
            }
            Status::NoMoves => {
                fb.put_str(x, y, "Stuck: press r", style.bold());
            }
            Status::Hint => {
                fb.put_str(x, y, "Try here", style);
            }
            Status::Restarted => {
                fb.put_str(x, y, "New board", style);
            }
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
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Columns reserved for the side panel when centering.
const PANEL_W: u16 = 20;
