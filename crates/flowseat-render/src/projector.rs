//! Frame projection: scene + selection + viewport state into a draw list.
//!
//! The projector owns what things look like; backends only execute draw
//! ops. All op coordinates are screen-space.

use kurbo::{Point, Rect};
use peniko::Color;

use flowseat_core::element::{Element, ElementId, ElementKind, ElementStatus};
use flowseat_core::layout::Layout;
use flowseat_core::selection::Selection;
use flowseat_core::transform;
use flowseat_core::viewport::Viewport;

/// Corner radius for non-seat elements.
const ELEMENT_CORNER_RADIUS: f64 = 8.0;
/// Radius of the rotation handle knob.
const HANDLE_KNOB_RADIUS: f64 = 10.0;
/// Spacing of grid lines across the site floor, in design units.
const GRID_SPACING: f64 = 50.0;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    None,
    #[default]
    Lines,
}

/// Colors for a projected frame.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub floor: Color,
    pub grid: Color,
    pub selection: Color,
    pub preview: Color,
    pub marquee_fill: Color,
    pub vip: Color,
    pub label: Color,
    pub gizmo: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(241, 245, 249, 255),
            floor: Color::from_rgba8(255, 255, 255, 255),
            grid: Color::from_rgba8(226, 232, 240, 255),
            selection: Color::from_rgba8(59, 130, 246, 255),
            preview: Color::from_rgba8(147, 197, 253, 255),
            marquee_fill: Color::from_rgba8(59, 130, 246, 40),
            vip: Color::from_rgba8(234, 179, 8, 255),
            label: Color::from_rgba8(30, 41, 59, 255),
            gizmo: Color::from_rgba8(99, 102, 241, 255),
        }
    }
}

/// Fill color for an element's booking status.
pub fn status_fill(status: ElementStatus) -> Color {
    match status {
        ElementStatus::Open => Color::from_rgba8(236, 253, 245, 255),
        ElementStatus::Reserved => Color::from_rgba8(254, 243, 199, 255),
        ElementStatus::Blocked => Color::from_rgba8(226, 232, 240, 255),
        ElementStatus::Occupied => Color::from_rgba8(219, 234, 254, 255),
    }
}

/// One screen-space drawing instruction.
#[derive(Debug, Clone)]
pub enum DrawOp {
    Rect {
        rect: Rect,
        /// Rotation in degrees about the rect center.
        rotation: f64,
        corner_radius: f64,
        fill: Color,
        stroke: Option<(Color, f64)>,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Option<(Color, f64)>,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Outline {
        rect: Rect,
        color: Color,
        width: f64,
    },
    Label {
        position: Point,
        text: String,
        color: Color,
    },
}

/// A projected frame: ordered draw list plus the stage backdrop color.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub ops: Vec<DrawOp>,
}

/// Context for projecting one frame.
pub struct FrameContext<'a> {
    layout: &'a Layout,
    viewport: &'a Viewport,
    selection: &'a Selection,
    marquee: Option<(Rect, &'a [ElementId])>,
    rotation_handle: Option<ElementId>,
    grid_style: GridStyle,
    palette: Palette,
}

impl<'a> FrameContext<'a> {
    pub fn new(layout: &'a Layout, viewport: &'a Viewport, selection: &'a Selection) -> Self {
        Self {
            layout,
            viewport,
            selection,
            marquee: None,
            rotation_handle: None,
            grid_style: GridStyle::default(),
            palette: Palette::default(),
        }
    }

    /// Show an in-flight marquee with its preview candidates.
    pub fn with_marquee(mut self, rect: Rect, preview: &'a [ElementId]) -> Self {
        self.marquee = Some((rect, preview));
        self
    }

    /// Show the rotation gizmo on an element.
    pub fn with_rotation_handle(mut self, id: Option<ElementId>) -> Self {
        self.rotation_handle = id;
        self
    }

    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    fn to_screen(&self, p: Point) -> Point {
        self.viewport.stage_to_screen(p)
    }

    fn rect_to_screen(&self, r: Rect) -> Rect {
        Rect::from_points(self.to_screen(Point::new(r.x0, r.y0)), self.to_screen(Point::new(r.x1, r.y1)))
    }

    /// Project the scene into a frame.
    pub fn project(&self) -> Frame {
        let mut ops = Vec::new();

        self.push_floor(&mut ops);
        for element in &self.layout.elements {
            self.push_element(&mut ops, element);
        }
        self.push_highlights(&mut ops);
        self.push_marquee(&mut ops);
        self.push_gizmo(&mut ops);

        Frame { ops }
    }

    fn push_floor(&self, ops: &mut Vec<DrawOp>) {
        let floor = self.layout.bounds();
        ops.push(DrawOp::Rect {
            rect: self.rect_to_screen(floor),
            rotation: 0.0,
            corner_radius: 0.0,
            fill: self.palette.floor,
            stroke: Some((self.palette.grid, 2.0)),
        });

        if self.grid_style == GridStyle::Lines {
            let mut x = floor.x0 + GRID_SPACING;
            while x < floor.x1 {
                ops.push(DrawOp::Line {
                    from: self.to_screen(Point::new(x, floor.y0)),
                    to: self.to_screen(Point::new(x, floor.y1)),
                    color: self.palette.grid,
                    width: 1.0,
                });
                x += GRID_SPACING;
            }
            let mut y = floor.y0 + GRID_SPACING;
            while y < floor.y1 {
                ops.push(DrawOp::Line {
                    from: self.to_screen(Point::new(floor.x0, y)),
                    to: self.to_screen(Point::new(floor.x1, y)),
                    color: self.palette.grid,
                    width: 1.0,
                });
                y += GRID_SPACING;
            }
        }
    }

    fn push_element(&self, ops: &mut Vec<DrawOp>, element: &Element) {
        let fill = status_fill(element.status);
        let stroke = if element.is_vip() {
            Some((self.palette.vip, 3.0))
        } else {
            None
        };

        match element.kind {
            ElementKind::Seat => ops.push(DrawOp::Circle {
                center: self.to_screen(element.center()),
                radius: element.size.width / 2.0 * self.viewport.zoom(),
                fill,
                stroke,
            }),
            _ => ops.push(DrawOp::Rect {
                rect: self.rect_to_screen(element.rect()),
                rotation: element.rotation(),
                corner_radius: ELEMENT_CORNER_RADIUS,
                fill,
                stroke,
            }),
        }

        ops.push(DrawOp::Label {
            position: self.to_screen(element.center()),
            text: element.label.clone(),
            color: self.palette.label,
        });
    }

    fn push_highlights(&self, ops: &mut Vec<DrawOp>) {
        let preview: &[ElementId] = self.marquee.map(|(_, p)| p).unwrap_or(&[]);
        for element in &self.layout.elements {
            let color = if self.selection.contains(element.id) {
                Some(self.palette.selection)
            } else if preview.contains(&element.id) {
                Some(self.palette.preview)
            } else {
                None
            };
            if let Some(color) = color {
                ops.push(DrawOp::Outline {
                    rect: self.rect_to_screen(element.rect()).inflate(3.0, 3.0),
                    color,
                    width: 2.0,
                });
            }
        }
    }

    fn push_marquee(&self, ops: &mut Vec<DrawOp>) {
        if let Some((rect, _)) = self.marquee {
            ops.push(DrawOp::Rect {
                rect: self.rect_to_screen(rect),
                rotation: 0.0,
                corner_radius: 0.0,
                fill: self.palette.marquee_fill,
                stroke: Some((self.palette.selection, 1.0)),
            });
        }
    }

    fn push_gizmo(&self, ops: &mut Vec<DrawOp>) {
        let element = match self.rotation_handle.and_then(|id| self.layout.element(id)) {
            Some(el) => el,
            None => return,
        };
        let center = element.center();
        let radius = transform::rotation_handle_radius(element.size.width, element.size.height);
        let knob = transform::rotation_handle_position(center, radius, element.rotation());

        ops.push(DrawOp::Circle {
            center: self.to_screen(center),
            radius: radius * self.viewport.zoom(),
            fill: Color::from_rgba8(0, 0, 0, 0),
            stroke: Some((self.palette.gizmo, 1.0)),
        });
        ops.push(DrawOp::Line {
            from: self.to_screen(center),
            to: self.to_screen(knob),
            color: self.palette.gizmo,
            width: 1.0,
        });
        ops.push(DrawOp::Circle {
            center: self.to_screen(knob),
            radius: HANDLE_KNOB_RADIUS,
            fill: self.palette.gizmo,
            stroke: None,
        });
        ops.push(DrawOp::Label {
            position: self.to_screen(Point::new(center.x, center.y - radius - 24.0)),
            text: format!("{:.0}\u{00B0}", element.rotation()),
            color: self.palette.gizmo,
        });
    }
}
