//! Renderer trait abstraction.

use thiserror::Error;

use crate::projector::{DrawOp, Frame};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Trait for frame renderers.
///
/// A backend walks the frame's draw list and paints it however it can:
/// GPU surface, canvas element, or plain text when no surface exists.
pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> RenderResult<()>;
}

/// Degraded textual renderer.
///
/// Used when no drawing surface is available: each draw op becomes one
/// descriptive line, so the editor state stays observable.
#[derive(Debug, Default)]
pub struct TextRenderer {
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines produced by the last render.
    pub fn output(&self) -> &[String] {
        &self.lines
    }

    fn describe(op: &DrawOp) -> String {
        match op {
            DrawOp::Rect { rect, rotation, .. } => {
                if *rotation == 0.0 {
                    format!(
                        "rect {:.0}x{:.0} at ({:.0}, {:.0})",
                        rect.width(),
                        rect.height(),
                        rect.x0,
                        rect.y0
                    )
                } else {
                    format!(
                        "rect {:.0}x{:.0} at ({:.0}, {:.0}) rotated {:.0}deg",
                        rect.width(),
                        rect.height(),
                        rect.x0,
                        rect.y0,
                        rotation
                    )
                }
            }
            DrawOp::Circle { center, radius, .. } => {
                format!("circle r{:.0} at ({:.0}, {:.0})", radius, center.x, center.y)
            }
            DrawOp::Line { from, to, .. } => format!(
                "line ({:.0}, {:.0}) -> ({:.0}, {:.0})",
                from.x, from.y, to.x, to.y
            ),
            DrawOp::Label { position, text, .. } => {
                format!("label '{}' at ({:.0}, {:.0})", text, position.x, position.y)
            }
            DrawOp::Outline { rect, .. } => format!(
                "outline {:.0}x{:.0} at ({:.0}, {:.0})",
                rect.width(),
                rect.height(),
                rect.x0,
                rect.y0
            ),
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        self.lines = frame.ops.iter().map(Self::describe).collect();
        Ok(())
    }
}
