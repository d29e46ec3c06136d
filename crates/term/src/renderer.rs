//! Terminal flusher: pushes framebuffers out through crossterm.
//!
//! The flusher owns the raw-mode/alternate-screen lifecycle and keeps a
//! copy of the frame it last presented. Each present scans rows for
//! changed runs and re-encodes only those cells. Style changes are
//! tracked component-wise, so a run of equally styled cells costs one
//! cursor move and zero style commands.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// The style most recently written to the wire. With only foreground,
/// background and bold in play, each component can be switched on its
/// own instead of resetting and reapplying the whole style.
#[derive(Default)]
struct StyleTracker {
    active: Option<CellStyle>,
}

impl StyleTracker {
    fn switch(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        match self.active {
            Some(active) if active == style => return Ok(()),
            Some(active) => {
                if active.fg != style.fg {
                    out.queue(SetForegroundColor(truecolor(style.fg)))?;
                }
                if active.bg != style.bg {
                    out.queue(SetBackgroundColor(truecolor(style.bg)))?;
                }
                if active.bold != style.bold {
                    let toggle = if style.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    out.queue(SetAttribute(toggle))?;
                }
            }
            None => {
                out.queue(SetForegroundColor(truecolor(style.fg)))?;
                out.queue(SetBackgroundColor(truecolor(style.bg)))?;
                if style.bold {
                    out.queue(SetAttribute(Attribute::Bold))?;
                }
            }
        }
        self.active = Some(style);
        Ok(())
    }
}

fn truecolor(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: Option<FrameBuffer>,
    wire: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            wire: Vec::with_capacity(32 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.wire.clear();
        self.wire.queue(terminal::EnterAlternateScreen)?;
        self.wire.queue(cursor::Hide)?;
        self.wire.queue(terminal::DisableLineWrap)?;
        self.flush_wire()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.wire.clear();
        self.wire.queue(ResetColor)?;
        self.wire.queue(SetAttribute(Attribute::Reset))?;
        self.wire.queue(terminal::EnableLineWrap)?;
        self.wire.queue(cursor::Show)?;
        self.wire.queue(terminal::LeaveAlternateScreen)?;
        self.flush_wire()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Forget the shown frame so the next present redraws everything.
    /// Useful after a terminal resize.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Present a frame.
    ///
    /// Same-sized frames are diffed against the one on screen and only
    /// the changed runs are re-encoded; a first present or a size change
    /// clears and redraws. The frame is then copied into the shown slot,
    /// reusing its allocation, so the caller keeps ownership.
    pub fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.wire.clear();
        let mut styles = StyleTracker::default();
        match &self.shown {
            Some(prev) if prev.width() == frame.width() && prev.height() == frame.height() => {
                encode_changes(&mut self.wire, &mut styles, prev, frame)?;
            }
            _ => encode_frame(&mut self.wire, &mut styles, frame)?,
        }
        self.wire.queue(ResetColor)?;
        self.wire.queue(SetAttribute(Attribute::Reset))?;
        self.flush_wire()?;

        match &mut self.shown {
            Some(prev) => prev.clone_from(frame),
            slot => *slot = Some(frame.clone()),
        }
        Ok(())
    }

    fn flush_wire(&mut self) -> Result<()> {
        self.stdout.write_all(&self.wire)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn encode_frame(out: &mut Vec<u8>, styles: &mut StyleTracker, frame: &FrameBuffer) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for y in 0..frame.height() {
        paint_run(out, styles, frame, 0, y, frame.width())?;
    }
    Ok(())
}

fn encode_changes(
    out: &mut Vec<u8>,
    styles: &mut StyleTracker,
    prev: &FrameBuffer,
    next: &FrameBuffer,
) -> Result<()> {
    for y in 0..next.height() {
        for (x, len) in changed_runs(prev, next, y) {
            paint_run(out, styles, next, x, y, len)?;
        }
    }
    Ok(())
}

fn paint_run(
    out: &mut Vec<u8>,
    styles: &mut StyleTracker,
    frame: &FrameBuffer,
    x: u16,
    y: u16,
    len: u16,
) -> Result<()> {
    out.queue(cursor::MoveTo(x, y))?;
    for dx in 0..len {
        let cell = frame.get(x + dx, y).unwrap_or_default();
        styles.switch(out, cell.style)?;
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

/// Spans of row `y` where `next` differs from `prev`, adjacent changed
/// cells coalesced into `(start, len)` pairs. Both frames must share
/// dimensions; size changes go through the full-frame path instead.
fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer, y: u16) -> Vec<(u16, u16)> {
    let mut runs: Vec<(u16, u16)> = Vec::new();
    for x in 0..next.width() {
        if prev.get(x, y) == next.get(x, y) {
            continue;
        }
        match runs.last_mut() {
            Some((start, len)) if *start + *len == x => *len += 1,
            _ => runs.push((x, 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_converts_to_truecolor() {
        let style = CellStyle::default();
        assert_eq!(
            truecolor(style.fg),
            Color::Rgb {
                r: style.fg.r,
                g: style.fg.g,
                b: style.fg.b
            }
        );
    }

    #[test]
    fn repeated_style_switch_writes_nothing() {
        let mut out = Vec::new();
        let mut styles = StyleTracker::default();
        styles.switch(&mut out, CellStyle::default()).unwrap();
        let after_first = out.len();
        styles.switch(&mut out, CellStyle::default()).unwrap();
        assert_eq!(out.len(), after_first);
    }

    #[test]
    fn style_switch_touches_only_the_changed_component() {
        let mut out = Vec::new();
        let mut styles = StyleTracker::default();
        styles.switch(&mut out, CellStyle::default()).unwrap();

        out.clear();
        let bold = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        styles.switch(&mut out, bold).unwrap();
        let encoded = String::from_utf8(out).unwrap();
        // Colors did not change, so no truecolor sequences go out.
        assert!(!encoded.is_empty());
        assert!(!encoded.contains("38;2"));
        assert!(!encoded.contains("48;2"));
    }

    #[test]
    fn changed_cells_coalesce_into_row_runs() {
        let base = FrameBuffer::new(6, 2);
        let mut next = base.clone();
        next.put_char(1, 0, 'x', CellStyle::default());
        next.put_char(2, 0, 'y', CellStyle::default());
        next.put_char(4, 0, 'z', CellStyle::default());

        assert_eq!(changed_runs(&base, &next, 0), vec![(1, 2), (4, 1)]);
        assert!(changed_runs(&base, &next, 1).is_empty());
    }

    #[test]
    fn full_frame_encoding_carries_every_glyph() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 0, "abc", CellStyle::default());
        fb.put_str(0, 1, "def", CellStyle::default());

        let mut out = Vec::new();
        encode_frame(&mut out, &mut StyleTracker::default(), &fb).unwrap();
        let encoded = String::from_utf8(out).unwrap();
        assert!(encoded.contains("abc"));
        assert!(encoded.contains("def"));
    }
}
