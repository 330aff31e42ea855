//! TerminalRenderer: presents framebuffers on a crossterm backend.
//!
//! Frames are double-buffered. The first frame (and any frame after a resize
//! or [`TerminalRenderer::invalidate`]) is sent whole; later frames only send
//! the horizontal runs that changed. Escape sequences are queued into a byte
//! buffer and written with one `write_all` per frame.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    front: Option<FrameBuffer>,
    bytes: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            front: None,
            bytes: Vec::with_capacity(32 * 1024),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.bytes.clear();
        self.bytes.queue(terminal::EnterAlternateScreen)?;
        self.bytes.queue(cursor::Hide)?;
        self.bytes.queue(terminal::DisableLineWrap)?;
        self.write_out()
    }

    /// Undo [`enter`](Self::enter).
    pub fn leave(&mut self) -> Result<()> {
        self.bytes.clear();
        self.bytes.queue(ResetColor)?;
        self.bytes.queue(SetAttribute(Attribute::Reset))?;
        self.bytes.queue(terminal::EnableLineWrap)?;
        self.bytes.queue(cursor::Show)?;
        self.bytes.queue(terminal::LeaveAlternateScreen)?;
        self.write_out()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Send the next frame in full.
    pub fn invalidate(&mut self) {
        self.front = None;
    }

    /// Present `frame` and take the previous front buffer in exchange.
    ///
    /// The caller keeps drawing into the buffer it gets back, so no frame is
    /// ever cloned. Returns the number of bytes written.
    pub fn present(&mut self, frame: &mut FrameBuffer) -> Result<usize> {
        self.bytes.clear();
        match self.front.take() {
            Some(mut front) if same_size(&front, frame) => {
                encode_diff_into(&front, frame, &mut self.bytes)?;
                std::mem::swap(&mut front, frame);
                self.front = Some(front);
            }
            stale => {
                encode_full_into(frame, &mut self.bytes)?;
                let mut front = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                front.resize(frame.width(), frame.height());
                std::mem::swap(&mut front, frame);
                self.front = Some(front);
            }
        }
        let written = self.bytes.len();
        self.write_out()?;
        Ok(written)
    }

    fn write_out(&mut self) -> Result<()> {
        self.out.write_all(&self.bytes).context("write frame")?;
        self.out.flush().context("flush frame")?;
        Ok(())
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Tracks the style last emitted so runs of equal style cost nothing.
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn new() -> Self {
        Self { style: None }
    }

    fn ink(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        if self.style == Some(style) {
            return Ok(());
        }
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(SetForegroundColor(to_color(style.fg)))?;
        out.queue(SetBackgroundColor(to_color(style.bg)))?;
        if style.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        self.style = Some(style);
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Queue a whole-screen redraw of `frame` into `out`.
pub fn encode_full_into(frame: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::new();
    for y in 0..frame.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..frame.width() {
            let cell = frame.get(x, y).unwrap_or_default();
            pen.ink(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
    }
    pen.finish(out)
}

/// Queue only the cells of `next` that differ from `prev` into `out`.
/// Both frames must have the same size.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::new();
    for y in 0..next.height() {
        let mut x = 0;
        while let Some((start, end)) = next_changed_run(prev, next, y, x) {
            out.queue(cursor::MoveTo(start, y))?;
            for cx in start..end {
                let cell = next.get(cx, y).unwrap_or_default();
                pen.ink(out, cell.style)?;
                out.queue(Print(cell.ch))?;
            }
            x = end;
        }
    }
    pen.finish(out)
}

/// First run `[start, end)` of differing cells on row `y` at or after `from`.
fn next_changed_run(prev: &FrameBuffer, next: &FrameBuffer, y: u16, from: u16) -> Option<(u16, u16)> {
    let differs = |x: u16| prev.get(x, y) != next.get(x, y);
    let width = next.width();
    let start = (from..width).find(|&x| differs(x))?;
    let end = (start + 1..width).find(|&x| !differs(x)).unwrap_or(width);
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> CellStyle {
        CellStyle::default()
    }

    #[test]
    fn changed_runs_are_coalesced() {
        let a = FrameBuffer::new(6, 1);
        let mut b = FrameBuffer::new(6, 1);
        for x in [1, 2, 4] {
            b.put_char(x, 0, 'X', style());
        }
        assert_eq!(next_changed_run(&a, &b, 0, 0), Some((1, 3)));
        assert_eq!(next_changed_run(&a, &b, 0, 3), Some((4, 5)));
        assert_eq!(next_changed_run(&a, &b, 0, 5), None);
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let a = FrameBuffer::new(4, 2);
        let b = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        assert!(!out.contains(&b' '));
    }

    #[test]
    fn present_swaps_and_then_diffs() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut frame = FrameBuffer::new(8, 2);
        frame.put_str(0, 0, "hello", style());

        let full = renderer.present(&mut frame).unwrap();
        assert!(full > 0);
        let text = String::from_utf8_lossy(renderer.writer()).to_string();
        assert!(text.contains('h') && text.contains('o'));

        // The buffer handed back is blank; redrawing the same text diffs to nothing.
        frame.put_str(0, 0, "hello", style());
        let second = renderer.present(&mut frame).unwrap();
        assert!(second < full);
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut frame = FrameBuffer::new(4, 1);
        renderer.present(&mut frame).unwrap();
        let before = renderer.writer().len();

        let mut bigger = FrameBuffer::new(6, 2);
        renderer.present(&mut bigger).unwrap();
        let emitted = &renderer.writer()[before..];
        let clear = {
            let mut v = Vec::new();
            v.queue(terminal::Clear(terminal::ClearType::All)).unwrap();
            v
        };
        assert!(emitted.windows(clear.len()).any(|w| w == clear.as_slice()));
    }
}
