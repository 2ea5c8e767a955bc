//! Viewport controller: stage sizing and the pan/zoom view transform.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::layout::Layout;

/// Minimum stage surface, regardless of content.
pub const STAGE_MIN_SIZE: Size = Size::new(2800.0, 1800.0);
/// Padding kept around content (or the site floor) inside the stage.
pub const STAGE_EXPAND_MARGIN: f64 = 320.0;

/// The only supported zoom level. The zoom plumbing stays in place so
/// persisted viewports keep their shape when a range ships later.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 1.0;

/// View state over the stage.
///
/// The stage is a larger surface the site floor (and any stray content)
/// sits on; `offset` is where design-space origin lands on the stage.
/// Screen position of a design point is `(point + offset) * zoom + pan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Vec2,
    zoom: f64,
    /// Size of the visible canvas widget, in screen pixels.
    pub canvas_size: Size,
    pub stage_size: Size,
    pub stage_offset: Vec2,
    /// Content bounds from the last stage update, in design units.
    pub content_bounds: Option<Rect>,
    initialized: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            canvas_size: Size::ZERO,
            stage_size: STAGE_MIN_SIZE,
            stage_offset: Vec2::new(STAGE_EXPAND_MARGIN, STAGE_EXPAND_MARGIN),
            content_bounds: None,
            initialized: false,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Clamp into the supported zoom range. Out-of-range requests are
    /// rejected quietly.
    pub fn set_zoom(&mut self, zoom: f64) {
        let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (clamped - zoom).abs() > f64::EPSILON {
            log::debug!("zoom {zoom} outside supported range, clamped to {clamped}");
        }
        self.zoom = clamped;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Record the canvas widget size. The first known size centers the
    /// stage in the canvas.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
        self.maybe_center();
    }

    fn maybe_center(&mut self) {
        if self.initialized || self.canvas_size.width <= 0.0 || self.canvas_size.height <= 0.0 {
            return;
        }
        self.pan = Vec2::new(
            self.canvas_size.width / 2.0 - self.stage_size.width * self.zoom / 2.0,
            self.canvas_size.height / 2.0 - self.stage_size.height * self.zoom / 2.0,
        );
        self.initialized = true;
    }

    /// Convert a screen point to design coordinates.
    pub fn screen_to_stage(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom - self.stage_offset.x,
            (screen.y - self.pan.y) / self.zoom - self.stage_offset.y,
        )
    }

    /// Convert a design point to screen coordinates.
    pub fn stage_to_screen(&self, stage: Point) -> Point {
        Point::new(
            (stage.x + self.stage_offset.x) * self.zoom + self.pan.x,
            (stage.y + self.stage_offset.y) * self.zoom + self.pan.y,
        )
    }

    /// Recompute stage size and offset from the layout.
    ///
    /// With explicit site dimensions the stage wraps the floor with the
    /// expand margin. Without them the stage wraps the element extent; the
    /// offset only ever grows, and when it does the pan shifts by the exact
    /// delta so content keeps its screen position.
    pub fn update_stage_bounds(&mut self, layout: &Layout) {
        let had_bounds = self.content_bounds.is_some();
        let previous_offset = self.stage_offset;

        match layout.dimensions {
            Some(dims) => {
                let floor = dims.pixel_size();
                self.stage_size = Size::new(
                    (floor.width + 2.0 * STAGE_EXPAND_MARGIN).max(STAGE_MIN_SIZE.width),
                    (floor.height + 2.0 * STAGE_EXPAND_MARGIN).max(STAGE_MIN_SIZE.height),
                );
                self.stage_offset = Vec2::new(STAGE_EXPAND_MARGIN, STAGE_EXPAND_MARGIN);
                self.content_bounds = Some(Rect::from_origin_size(Point::ZERO, floor));
            }
            None => match layout.extent() {
                Some(extent) => {
                    self.stage_size = Size::new(
                        (extent.width() + 2.0 * STAGE_EXPAND_MARGIN).max(STAGE_MIN_SIZE.width),
                        (extent.height() + 2.0 * STAGE_EXPAND_MARGIN).max(STAGE_MIN_SIZE.height),
                    );
                    let base = Vec2::new(
                        STAGE_EXPAND_MARGIN + (-extent.x0).max(0.0),
                        STAGE_EXPAND_MARGIN + (-extent.y0).max(0.0),
                    );
                    // Offsets are monotonic so content never slides back.
                    self.stage_offset = Vec2::new(
                        base.x.max(previous_offset.x),
                        base.y.max(previous_offset.y),
                    );
                    self.content_bounds = Some(extent);
                }
                None => {
                    self.stage_size = STAGE_MIN_SIZE;
                    self.stage_offset = previous_offset;
                    self.content_bounds = None;
                }
            },
        }

        if had_bounds && self.stage_offset != previous_offset {
            // Screen position is `(point + offset) * zoom + pan`, so the
            // offset delta scales by zoom before it lands in pan.
            let delta = (previous_offset - self.stage_offset) * self.zoom;
            self.pan += delta;
            log::debug!("stage offset moved, pan compensated by {delta:?}");
        }

        self.maybe_center();
    }
}
