//! FlowSeat Core Library
//!
//! Platform-agnostic core data structures and logic for the FlowSeat
//! seating-plan editor.

pub mod editor;
pub mod element;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod plan;
pub mod selection;
pub mod session;
pub mod store;
pub mod transform;
pub mod viewport;

pub use editor::{EditorSession, InspectorState, Notice, Tool, ToolbarState};
pub use element::{Element, ElementId, ElementKind, ElementStatus};
pub use layout::{Layout, SiteDimensions, SiteUnit};
pub use plan::{AuditEntry, Guest, GuestRecord, Plan, PlanId};
pub use selection::{Marquee, Selection};
pub use session::{Session, SessionProvider, UserProfile};
pub use transform::{
    normalize_degrees, snap_point, snap_to_grid, FINE_GRID_SIZE, GRID_SIZE,
    ROTATION_HANDLE_MIN_RADIUS, ROTATION_HANDLE_PADDING,
};
pub use viewport::{Viewport, STAGE_EXPAND_MARGIN, STAGE_MIN_SIZE};
