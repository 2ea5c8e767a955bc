//! Scene model: the ordered collection of elements on a venue layout.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind};
use crate::geometry;

/// Measurement unit for site dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteUnit {
    #[default]
    Meters,
}

impl SiteUnit {
    /// Design pixels per unit.
    pub fn scale(&self) -> f64 {
        match self {
            SiteUnit::Meters => 50.0,
        }
    }
}

/// Default site size when none is configured: 48 x 32 meters.
pub const DEFAULT_SITE_WIDTH: f64 = 48.0;
pub const DEFAULT_SITE_HEIGHT: f64 = 32.0;

/// Physical dimensions of the venue floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteDimensions {
    pub width: f64,
    pub height: f64,
    pub unit: SiteUnit,
}

impl Default for SiteDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SITE_WIDTH,
            height: DEFAULT_SITE_HEIGHT,
            unit: SiteUnit::Meters,
        }
    }
}

impl SiteDimensions {
    /// Size of the floor in design pixels.
    pub fn pixel_size(&self) -> Size {
        let scale = self.unit.scale();
        Size::new(self.width * scale, self.height * scale)
    }
}

/// The seating layout: an ordered list of elements plus the site's physical
/// dimensions.
///
/// Element order is z-order, back to front. Ids are never reused; removal
/// leaves a hole in the numbering rather than renumbering survivors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    pub elements: Vec<Element>,
    pub dimensions: Option<SiteDimensions>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canvas rectangle elements are clamped into: the site floor at the
    /// origin, falling back to the default dimensions.
    pub fn bounds(&self) -> Rect {
        let size = self.dimensions.unwrap_or_default().pixel_size();
        Rect::from_origin_size(Point::ZERO, size)
    }

    /// Tight union of all element boxes, if any elements exist.
    pub fn extent(&self) -> Option<Rect> {
        let mut iter = self.elements.iter();
        let first = iter.next()?.rect();
        Some(iter.fold(first, |acc, el| acc.union(el.rect())))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|el| el.id == id)
    }

    fn count_of_kind(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|el| el.kind == kind).count()
    }

    /// Create a new element of `kind` centered on `point`, clamped into the
    /// canvas, and place it on top of the stack. Returns its id.
    pub fn create(&mut self, kind: ElementKind, point: Point) -> ElementId {
        let size = kind.default_size();
        let origin = Point::new(point.x - size.width / 2.0, point.y - size.height / 2.0);
        let count = self.count_of_kind(kind);
        let mut element = Element::from_template(kind, origin, count);
        self.clamp_into_bounds(&mut element);
        let id = element.id;
        log::debug!("created {:?} '{}' at {:?}", kind, element.label, element.position);
        self.elements.push(element);
        id
    }

    /// Duplicate an existing element with the standard duplicate offset.
    /// Returns the new id, or `None` if the source is gone.
    pub fn duplicate(&mut self, id: ElementId, offset: Vec2) -> Option<ElementId> {
        let copy = self.element(id)?.clone_offset(offset, None);
        Some(self.insert_clone(copy))
    }

    /// Insert an already-cloned element (paste path), clamping it into the
    /// canvas and placing it on top. Returns its id.
    pub fn insert_clone(&mut self, mut element: Element) -> ElementId {
        self.clamp_into_bounds(&mut element);
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove a batch of elements, returning the removed ones so the caller
    /// can detach any assigned guests. Unknown ids are skipped.
    pub fn remove_batch(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let mut removed = Vec::new();
        self.elements.retain(|el| {
            if ids.contains(&el.id) {
                removed.push(el.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Move an element to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ElementId) {
        if let Some(idx) = self.elements.iter().position(|el| el.id == id) {
            let element = self.elements.remove(idx);
            self.elements.push(element);
        }
    }

    /// Move an element to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: ElementId) {
        if let Some(idx) = self.elements.iter().position(|el| el.id == id) {
            let element = self.elements.remove(idx);
            self.elements.insert(0, element);
        }
    }

    /// Topmost element whose box contains the point, if any.
    pub fn element_at_point(&self, point: Point) -> Option<&Element> {
        self.elements.iter().rev().find(|el| el.rect().contains(point))
    }

    /// Ids of all elements whose boxes overlap the rect (inclusive), in
    /// z-order.
    pub fn elements_in_rect(&self, rect: &Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| geometry::rects_overlap(&el.rect(), rect))
            .map(|el| el.id)
            .collect()
    }

    /// Move an element to a new origin, clamped into the canvas.
    pub fn move_element_to(&mut self, id: ElementId, origin: Point) {
        let bounds = self.bounds();
        if let Some(el) = self.element_mut(id) {
            el.position = geometry::clamp_origin(origin, el.size, &bounds);
        }
    }

    /// Resize an element, then re-clamp its origin so it stays inside.
    pub fn resize_element(&mut self, id: ElementId, size: Size) {
        let bounds = self.bounds();
        if let Some(el) = self.element_mut(id) {
            el.size = Size::new(size.width.max(1.0), size.height.max(1.0));
            el.position = geometry::clamp_origin(el.position, el.size, &bounds);
        }
    }

    /// Re-clamp an element into the canvas after an external mutation.
    pub fn clamp_element(&mut self, id: ElementId) {
        let bounds = self.bounds();
        if let Some(el) = self.element_mut(id) {
            el.position = geometry::clamp_origin(el.position, el.size, &bounds);
        }
    }

    fn clamp_into_bounds(&self, element: &mut Element) {
        let bounds = self.bounds();
        element.position = geometry::clamp_origin(element.position, element.size, &bounds);
    }
}
