//! A render surface that records draw commands instead of rasterizing

use serde::Serialize;

use crate::platform::RenderSurface;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DrawCmd {
    Clear(u32),
    Fill(Rect),
}

/// Records the most recent frame. `clear` starts a new frame.
#[derive(Debug, Clone, Serialize)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCmd>,
    frames: u64,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Fill(rect) => Some(rect),
            DrawCmd::Clear(_) => None,
        })
    }

    /// Number of frames started so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSurface for DrawList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: u32) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
        self.frames += 1;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: u32) {
        self.commands.push(DrawCmd::Fill(Rect {
            x,
            y,
            width,
            height,
            color,
        }));
    }
}
