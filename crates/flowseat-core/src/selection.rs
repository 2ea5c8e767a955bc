//! Selection state: what is selected, and the in-flight marquee.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::geometry;

/// Movement (in either axis) before a marquee press counts as a drag
/// instead of a click.
pub const MARQUEE_DRAG_THRESHOLD: f64 = 2.0;

/// Window within which a second pointer-down that misses every element
/// switches multi-select mode on.
pub const DOUBLE_PRESS_WINDOW_MS: u64 = 320;

/// The current selection.
///
/// A multi selection never holds fewer than two ids; transitions collapse
/// it to `Single` or `None` as members leave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Single(ElementId),
    Multi(Vec<ElementId>),
}

impl Selection {
    /// Normalize a candidate id list into the right variant.
    pub fn from_ids(mut ids: Vec<ElementId>) -> Self {
        ids.dedup();
        match ids.len() {
            0 => Selection::None,
            1 => Selection::Single(ids[0]),
            _ => Selection::Multi(ids),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(s) => *s == id,
            Selection::Multi(ids) => ids.contains(&id),
        }
    }

    /// All selected ids, in selection order.
    pub fn ids(&self) -> Vec<ElementId> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![*id],
            Selection::Multi(ids) => ids.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::None => 0,
            Selection::Single(_) => 1,
            Selection::Multi(ids) => ids.len(),
        }
    }

    /// The single selected element, if exactly one is selected.
    pub fn single(&self) -> Option<ElementId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }

    /// Replace the selection with a single element.
    pub fn select(&mut self, id: ElementId) {
        *self = Selection::Single(id);
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Toggle an element's membership (the ctrl/cmd-click path). Toggling
    /// the same element twice restores the original membership.
    pub fn toggle(&mut self, id: ElementId) {
        let mut ids = self.ids();
        match ids.iter().position(|x| *x == id) {
            Some(idx) => {
                ids.remove(idx);
            }
            None => ids.push(id),
        }
        *self = Selection::from_ids(ids);
    }

    /// Add an element to the selection if it is not already a member.
    /// Unlike [`Selection::toggle`] this never removes anything.
    pub fn ensure(&mut self, id: ElementId) {
        if !self.contains(id) {
            let mut ids = self.ids();
            ids.push(id);
            *self = Selection::from_ids(ids);
        }
    }

    /// Drop an element that no longer exists, collapsing the variant.
    pub fn remove(&mut self, id: ElementId) {
        let mut ids = self.ids();
        ids.retain(|x| *x != id);
        *self = Selection::from_ids(ids);
    }
}

/// An in-flight marquee drag.
///
/// The preview set is recomputed on every move; the selection itself only
/// changes when the marquee is released.
#[derive(Debug, Clone)]
pub struct Marquee {
    pub anchor: Point,
    pub current: Point,
    /// Candidate ids under the marquee right now.
    pub preview: Vec<ElementId>,
    /// Whether the pointer has moved past the drag threshold.
    pub moved: bool,
}

impl Marquee {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            current: anchor,
            preview: Vec::new(),
            moved: false,
        }
    }

    /// Track pointer movement. Once the threshold is crossed the marquee
    /// stays a drag even if the pointer returns to the anchor.
    pub fn update(&mut self, point: Point) {
        self.current = point;
        if (point.x - self.anchor.x).abs() > MARQUEE_DRAG_THRESHOLD
            || (point.y - self.anchor.y).abs() > MARQUEE_DRAG_THRESHOLD
        {
            self.moved = true;
        }
    }

    pub fn rect(&self) -> Rect {
        geometry::rect_from_corners(self.anchor, self.current)
    }
}
