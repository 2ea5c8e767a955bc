//! FlowSeat Render Library
//!
//! Projects editor state into a backend-agnostic draw list and defines the
//! renderer abstraction over it.

pub mod projector;
mod renderer;

pub use projector::{status_fill, DrawOp, Frame, FrameContext, GridStyle, Palette};
pub use renderer::{RenderError, RenderResult, Renderer, TextRenderer};
