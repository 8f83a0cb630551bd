// record.rs - Command-recording surface

use crate::error::EngineError;

use super::surface::{Path, Stroke, Style, Surface};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Resize { w: u32, h: u32 },
    Clear,
    FillRect { x: f32, y: f32, w: f32, h: f32, style: Style },
    FillPath { path: Path, style: Style },
    StrokePath { path: Path, style: Style, stroke: Stroke },
}

/// Keeps every primitive it is handed instead of drawing it. Can be told
/// to reject the n-th primitive, to exercise frame failure handling.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    w: u32,
    h: u32,
    ops: Vec<DrawOp>,
    fail_at: Option<usize>,
    seen: usize,
}

impl Recorder {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h, ..Self::default() }
    }

    /// Fail the primitive with zero-based index `n`, counted across frames.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    fn push(&mut self, op: &'static str, draw: DrawOp) -> Result<(), EngineError> {
        let n = self.seen;
        self.seen += 1;
        if self.fail_at == Some(n) {
            return Err(EngineError::surface(op, "rejected by recorder"));
        }
        self.ops.push(draw);
        Ok(())
    }
}

impl Surface for Recorder {
    fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    fn resize(&mut self, w: u32, h: u32) -> Result<(), EngineError> {
        self.w = w;
        self.h = h;
        self.ops.push(DrawOp::Resize { w, h });
        Ok(())
    }

    fn clear(&mut self) -> Result<(), EngineError> {
        self.push("clear", DrawOp::Clear)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: &Style) -> Result<(), EngineError> {
        self.push("fill_rect", DrawOp::FillRect { x, y, w, h, style: style.clone() })
    }

    fn fill_path(&mut self, path: &Path, style: &Style) -> Result<(), EngineError> {
        self.push("fill_path", DrawOp::FillPath { path: path.clone(), style: style.clone() })
    }

    fn stroke_path(&mut self, path: &Path, style: &Style, stroke: Stroke) -> Result<(), EngineError> {
        self.push("stroke_path", DrawOp::StrokePath { path: path.clone(), style: style.clone(), stroke })
    }
}
