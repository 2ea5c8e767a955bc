//! Seating plans: the persisted document holding a layout, its guest list,
//! and the audit trail.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::element::{Element, ElementId, ElementKind};
use crate::layout::Layout;
use crate::transform::{DUPLICATE_OFFSET, PASTE_OFFSET};

/// Unique identifier for a plan.
pub type PlanId = Uuid;
/// Unique identifier for a guest.
pub type GuestId = Uuid;

/// Check-in lifecycle of a guest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    #[default]
    Invited,
    Arrived,
    Cancelled,
}

/// Check-in state with the arrival timestamp, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub status: CheckInStatus,
    pub time: Option<String>,
}

/// A guest on the plan's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub email: String,
    pub tags: Vec<String>,
    /// Element this guest is seated at, if any. Kept consistent with the
    /// element's guest list at all times.
    pub seat_id: Option<ElementId>,
    pub check_in: CheckIn,
}

impl Guest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            tags: Vec::new(),
            seat_id: None,
            check_in: CheckIn::default(),
        }
    }
}

/// A pre-parsed guest row handed in by an import front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRecord {
    pub name: String,
    pub email: String,
    pub tags: Vec<String>,
}

/// One line of the plan's audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// RFC 3339 timestamp.
    pub time: String,
    pub message: String,
    pub element_id: Option<ElementId>,
}

/// Why a guest could not be seated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("guest not found")]
    UnknownGuest,
    #[error("element not found")]
    UnknownElement,
    #[error("element is at capacity")]
    Full,
}

/// Summary returned when a plan is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    pub share_url: String,
    pub guest_count: usize,
    pub seated_count: usize,
}

/// A complete seating plan document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub date: Option<String>,
    pub venue: Option<String>,
    /// Declared venue capacity, independent of element capacities.
    pub capacity: u32,
    pub guests: Vec<Guest>,
    pub layout: Layout,
    pub audit: Vec<AuditEntry>,
    pub share_url: Option<String>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: None,
            venue: None,
            capacity: 0,
            guests: Vec::new(),
            layout: Layout::new(),
            audit: Vec::new(),
            share_url: None,
        }
    }

    /// Serialize to JSON for persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn guest(&self, id: GuestId) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == id)
    }

    pub fn guest_mut(&mut self, id: GuestId) -> Option<&mut Guest> {
        self.guests.iter_mut().find(|g| g.id == id)
    }

    /// Append an audit entry with the current wall-clock time.
    pub fn record(&mut self, message: impl Into<String>, element_id: Option<ElementId>) {
        self.audit.push(AuditEntry {
            id: Uuid::new_v4(),
            time: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
            message: message.into(),
            element_id,
        });
    }

    /// Create a new element and log it.
    pub fn add_element(&mut self, kind: ElementKind, point: Point) -> ElementId {
        let id = self.layout.create(kind, point);
        if let Some(el) = self.layout.element(id) {
            let message = format!("Added {}", el.label);
            self.record(message, Some(id));
        }
        id
    }

    /// Duplicate an element and log it. `None` if the source is gone.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let copy_id = self.layout.duplicate(id, DUPLICATE_OFFSET)?;
        if let Some(el) = self.layout.element(copy_id) {
            let message = format!("Duplicated {}", el.label);
            self.record(message, Some(copy_id));
        }
        Some(copy_id)
    }

    /// Insert a clipboard clone with the paste offset and `" copy"` label
    /// suffix, and log it.
    pub fn paste_element(&mut self, source: &Element) -> ElementId {
        let id = self
            .layout
            .insert_clone(source.clone_offset(PASTE_OFFSET, Some(" copy")));
        if let Some(el) = self.layout.element(id) {
            let message = format!("Pasted {}", el.label);
            self.record(message, Some(id));
        }
        id
    }

    /// Remove a batch of elements atomically: every guest seated at a
    /// removed element is detached, and one audit entry is written per
    /// element. Returns the number of elements removed.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> usize {
        let removed = self.layout.remove_batch(ids);
        for element in &removed {
            for guest in self.guests.iter_mut() {
                if guest.seat_id == Some(element.id) {
                    guest.seat_id = None;
                }
            }
            self.record(format!("Removed {}", element.label), Some(element.id));
        }
        removed.len()
    }

    /// Seat a guest at an element, moving them off any previous seat. Both
    /// sides of the link are updated together.
    pub fn attach_guest(&mut self, guest_id: GuestId, element_id: ElementId) -> Result<(), AttachError> {
        if self.guest(guest_id).is_none() {
            return Err(AttachError::UnknownGuest);
        }
        {
            let element = self
                .layout
                .element(element_id)
                .ok_or(AttachError::UnknownElement)?;
            if !element.has_free_capacity() && !element.guests.contains(&guest_id) {
                return Err(AttachError::Full);
            }
        }
        self.detach_guest(guest_id);
        if let Some(el) = self.layout.element_mut(element_id) {
            if !el.guests.contains(&guest_id) {
                el.guests.push(guest_id);
            }
        }
        if let Some(guest) = self.guest_mut(guest_id) {
            guest.seat_id = Some(element_id);
        }
        Ok(())
    }

    /// Unseat a guest. No-op if the guest is unknown or unassigned.
    pub fn detach_guest(&mut self, guest_id: GuestId) {
        let seat = match self.guest(guest_id).and_then(|g| g.seat_id) {
            Some(seat) => seat,
            None => return,
        };
        if let Some(el) = self.layout.element_mut(seat) {
            el.guests.retain(|g| *g != guest_id);
        }
        if let Some(guest) = self.guest_mut(guest_id) {
            guest.seat_id = None;
        }
    }

    /// Add imported guest records to the list and log the import.
    pub fn import_guests(&mut self, records: Vec<GuestRecord>) -> usize {
        let count = records.len();
        for record in records {
            let mut guest = Guest::new(record.name, record.email);
            guest.tags = record.tags;
            self.guests.push(guest);
        }
        if count > 0 {
            self.record(format!("Imported {count} guests"), None);
        }
        count
    }

    /// Change an element's capacity. Guests beyond the new capacity are
    /// detached, most recently seated first.
    pub fn set_element_capacity(&mut self, element_id: ElementId, capacity: u32) {
        let overflow: Vec<GuestId> = match self.layout.element_mut(element_id) {
            Some(el) => {
                el.capacity = capacity;
                el.guests.iter().copied().skip(capacity as usize).collect()
            }
            None => return,
        };
        for guest_id in overflow {
            self.detach_guest(guest_id);
        }
        if let Some(el) = self.layout.element(element_id) {
            let message = format!("Set capacity of {} to {}", el.label, capacity);
            self.record(message, Some(element_id));
        }
    }

    /// Number of guests currently seated.
    pub fn seated_count(&self) -> usize {
        self.guests.iter().filter(|g| g.seat_id.is_some()).count()
    }

    /// Publish the plan: derive a share link under `base_url`, log it, and
    /// return a summary snapshot.
    pub fn publish(&mut self, base_url: &str) -> PublishSummary {
        let share_url = format!("{}/{}", base_url.trim_end_matches('/'), self.id);
        self.share_url = Some(share_url.clone());
        self.record("Published plan", None);
        PublishSummary {
            share_url,
            guest_count: self.guests.len(),
            seated_count: self.seated_count(),
        }
    }

    /// Even out table occupancy: repeatedly move one guest from the fullest
    /// multi-capacity element to the emptiest with free capacity, until the
    /// spread is at most one guest.
    pub fn balance_tables(&mut self) -> usize {
        let mut moves = 0;
        loop {
            let tables: Vec<(ElementId, usize, bool)> = self
                .layout
                .elements
                .iter()
                .filter(|el| el.kind.is_seat_like() && el.capacity > 1)
                .map(|el| (el.id, el.guests.len(), el.has_free_capacity()))
                .collect();
            if tables.len() < 2 {
                break;
            }
            let fullest = match tables.iter().max_by_key(|(_, n, _)| *n) {
                Some(t) => *t,
                None => break,
            };
            let emptiest = match tables
                .iter()
                .filter(|(_, _, free)| *free)
                .min_by_key(|(_, n, _)| *n)
            {
                Some(t) => *t,
                None => break,
            };
            if fullest.0 == emptiest.0 || fullest.1 <= emptiest.1 + 1 {
                break;
            }
            let moved = self
                .layout
                .element(fullest.0)
                .and_then(|el| el.guests.last().copied());
            match moved {
                Some(guest_id) => {
                    if self.attach_guest(guest_id, emptiest.0).is_err() {
                        break;
                    }
                    moves += 1;
                }
                None => break,
            }
        }
        if moves > 0 {
            self.record(format!("Balanced tables ({moves} guests moved)"), None);
        }
        moves
    }

    /// Seat unassigned guests carrying `tag` at matching elements with free
    /// capacity, round-robin.
    pub fn balance_guests_by_tag(&mut self, tag: &str) -> usize {
        let guests: Vec<GuestId> = self
            .guests
            .iter()
            .filter(|g| g.seat_id.is_none() && g.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .map(|g| g.id)
            .collect();
        let targets: Vec<ElementId> = self
            .layout
            .elements
            .iter()
            .filter(|el| {
                el.kind.is_seat_like() && el.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
            })
            .map(|el| el.id)
            .collect();
        if targets.is_empty() {
            return 0;
        }
        let mut seated = 0;
        let mut cursor = 0;
        'guests: for guest_id in guests {
            // Try each target once, starting after the last used one.
            for _ in 0..targets.len() {
                let target = targets[cursor % targets.len()];
                cursor += 1;
                if self.attach_guest(guest_id, target).is_ok() {
                    seated += 1;
                    continue 'guests;
                }
            }
            break;
        }
        if seated > 0 {
            self.record(format!("Seated {seated} '{tag}' guests"), None);
        }
        seated
    }
}
