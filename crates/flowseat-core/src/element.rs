//! Venue elements: seats, tables, sofas, and stage blocks.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transform::normalize_degrees;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// The kinds of element that can be placed on a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Seat,
    Table,
    Sofa,
    Stage,
}

impl ElementKind {
    /// Label prefix used when auto-numbering new elements.
    pub fn label_prefix(&self) -> &'static str {
        match self {
            ElementKind::Seat => "Seat",
            ElementKind::Table => "Table",
            ElementKind::Sofa => "Sofa",
            ElementKind::Stage => "Stage",
        }
    }

    /// Whether this kind holds guests. Seat-like kinds reset their booking
    /// state when cloned; stage blocks are scenery.
    pub fn is_seat_like(&self) -> bool {
        matches!(self, ElementKind::Seat | ElementKind::Table | ElementKind::Sofa)
    }

    /// Default size for a freshly created element of this kind.
    pub fn default_size(&self) -> Size {
        match self {
            ElementKind::Seat => Size::new(46.0, 46.0),
            ElementKind::Table => Size::new(120.0, 120.0),
            ElementKind::Sofa => Size::new(160.0, 70.0),
            ElementKind::Stage => Size::new(220.0, 120.0),
        }
    }

    /// Default guest capacity for this kind.
    pub fn default_capacity(&self) -> u32 {
        match self {
            ElementKind::Seat => 1,
            ElementKind::Table => 8,
            ElementKind::Sofa => 4,
            ElementKind::Stage => 0,
        }
    }

    /// Tags stamped onto new elements of this kind.
    pub fn default_tags(&self) -> Vec<String> {
        match self {
            ElementKind::Sofa => vec!["lounge".to_string()],
            ElementKind::Stage => vec!["stage".to_string()],
            _ => Vec::new(),
        }
    }
}

/// Booking status of a seat-like element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementStatus {
    #[default]
    Open,
    Reserved,
    Blocked,
    Occupied,
}

/// A placed element on the seating layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub label: String,
    /// Top-left corner in design units.
    pub position: Point,
    pub size: Size,
    /// Rotation in degrees, always normalized to `[0, 360)`.
    rotation: f64,
    pub status: ElementStatus,
    pub capacity: u32,
    /// Guests currently assigned to this element.
    pub guests: Vec<Uuid>,
    pub price: Option<f64>,
    pub tags: Vec<String>,
}

impl Element {
    /// Instantiate a fresh element from the kind's template, numbered with
    /// `count` existing elements of the same kind.
    pub fn from_template(kind: ElementKind, position: Point, count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: format!("{} {}", kind.label_prefix(), count + 1),
            position,
            size: kind.default_size(),
            rotation: 0.0,
            status: ElementStatus::Open,
            capacity: kind.default_capacity(),
            guests: Vec::new(),
            price: None,
            tags: kind.default_tags(),
        }
    }

    /// Bounding rectangle ignoring rotation.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Center point of the element box.
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set the rotation, normalizing into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Set the rotation from a raw user-entered value: rounded to a whole
    /// degree, then normalized.
    pub fn set_rotation_rounded(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees.round());
    }

    /// Whether this element carries a `vip` tag (case-insensitive).
    pub fn is_vip(&self) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case("vip"))
    }

    /// Whether the element has any free capacity left.
    pub fn has_free_capacity(&self) -> bool {
        (self.guests.len() as u32) < self.capacity
    }

    /// Clone this element as a new, independent element offset from the
    /// source. Seat-like kinds reset to an open, unassigned state so a
    /// booking can never be copied.
    pub fn clone_offset(&self, offset: Vec2, label_suffix: Option<&str>) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.position += offset;
        if let Some(suffix) = label_suffix {
            copy.label.push_str(suffix);
        }
        if copy.kind.is_seat_like() {
            copy.status = ElementStatus::Open;
            copy.guests.clear();
        }
        copy
    }
}
