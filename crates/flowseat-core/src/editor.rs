//! The editor session: single owner of all mutable editor state.
//!
//! Hosts feed pointer events and intent calls in; state comes back out
//! through read-only projections (inspector, toolbar, notices). No other
//! type mutates selection, gestures, or the current plan.

use kurbo::{Point, Vec2};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::element::{Element, ElementId, ElementKind, ElementStatus};
use crate::input::{Modifiers, MouseButton, PointerCapture, PointerEvent};
use crate::plan::{AttachError, GuestId, GuestRecord, Plan, PlanId};
use crate::selection::{Marquee, Selection, DOUBLE_PRESS_WINDOW_MS};
use crate::session::Session;
use crate::store::{Store, StoreResult, SyncBridge, SyncOutcome};
use crate::transform;
use crate::viewport::Viewport;

/// Hit tolerance around the rotation handle knob, in design units.
const ROTATION_HANDLE_HIT_RADIUS: f64 = 16.0;

/// The editor only tracks its primary pointer; multi-touch gestures are a
/// host concern.
const PRIMARY_POINTER: u64 = 0;

/// Active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Place(ElementKind),
    Rotate,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// What the inspector panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectorState {
    Empty,
    Single(ElementId),
    Group(Vec<ElementId>),
}

/// Enabled state for the toolbar actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    pub tool: Tool,
    pub can_copy: bool,
    pub can_paste: bool,
    pub can_duplicate: bool,
    pub can_delete: bool,
    pub can_rotate: bool,
}

/// The gesture currently in flight.
#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    Marquee(Marquee),
    DragSingle {
        id: ElementId,
        grab_offset: Vec2,
        moved: bool,
    },
    DragGroup {
        start: Point,
        origins: HashMap<ElementId, Point>,
        group_box: kurbo::Rect,
        moved: bool,
    },
    RotateTool {
        id: ElementId,
    },
    RotateHandle {
        id: ElementId,
    },
}

/// The editor session.
pub struct EditorSession<S: Store> {
    plans: Vec<Plan>,
    current_plan: Option<PlanId>,
    pub viewport: Viewport,
    selection: Selection,
    tool: Tool,
    gesture: Gesture,
    /// Element showing its rotation handle, if any.
    rotation_handle: Option<ElementId>,
    clipboard: Option<Element>,
    capture: PointerCapture,
    bridge: SyncBridge<S>,
    session: Option<Session>,
    notices: Vec<Notice>,
    /// Multi-select mode. While on, empty-canvas presses start a marquee
    /// instead of clearing the selection.
    multi_mode: bool,
    /// Timestamp of the previous pointer-down, for double-press detection.
    last_press_ms: Option<u64>,
}

impl<S: Store> EditorSession<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            plans: Vec::new(),
            current_plan: None,
            viewport: Viewport::new(),
            selection: Selection::None,
            tool: Tool::Select,
            gesture: Gesture::Idle,
            rotation_handle: None,
            clipboard: None,
            capture: PointerCapture::new(),
            bridge: SyncBridge::new(store),
            session: None,
            notices: Vec::new(),
            multi_mode: false,
            last_press_ms: None,
        }
    }

    // --- plan management ---

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn current_plan(&self) -> Option<&Plan> {
        let id = self.current_plan?;
        self.plans.iter().find(|p| p.id == id)
    }

    fn current_plan_mut(&mut self) -> Option<&mut Plan> {
        let id = self.current_plan?;
        self.plans.iter_mut().find(|p| p.id == id)
    }

    /// Create a plan and make it current.
    pub fn create_plan(&mut self, name: impl Into<String>) -> PlanId {
        let plan = Plan::new(name);
        let id = plan.id;
        self.plans.push(plan);
        self.select_plan(id);
        self.schedule_sync();
        id
    }

    /// Switch the current plan, resetting all per-plan editor state.
    pub fn select_plan(&mut self, id: PlanId) {
        if !self.plans.iter().any(|p| p.id == id) {
            log::debug!("select_plan: unknown plan {id}");
            return;
        }
        self.current_plan = Some(id);
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.rotation_handle = None;
        self.multi_mode = false;
        self.last_press_ms = None;
        self.capture.release_all();
        if let Some(plan) = self.current_plan() {
            let layout = plan.layout.clone();
            self.viewport.update_stage_bounds(&layout);
        }
    }

    /// Load plans from the backing store, replacing the local list.
    pub async fn load_plans(&mut self) -> StoreResult<usize> {
        let ids = self.bridge.store().list().await?;
        let mut plans = Vec::with_capacity(ids.len());
        for id in ids {
            plans.push(self.bridge.store().load(id).await?);
        }
        let count = plans.len();
        self.plans = plans;
        if let Some(first) = self.plans.first().map(|p| p.id) {
            if self.current_plan.is_none() {
                self.select_plan(first);
            }
        }
        Ok(count)
    }

    /// Delete a plan locally and from the store, dropping any pending sync.
    pub async fn delete_plan(&mut self, id: PlanId) -> StoreResult<()> {
        self.bridge.cancel(id);
        self.plans.retain(|p| p.id != id);
        if self.current_plan == Some(id) {
            self.current_plan = self.plans.first().map(|p| p.id);
            self.selection.clear();
            self.gesture = Gesture::Idle;
            self.rotation_handle = None;
            self.multi_mode = false;
        }
        self.bridge.store().delete(id).await
    }

    // --- session ---

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Apply a session change from the auth provider. Going to `None`
    /// clears user-scoped state and cancels every pending sync.
    pub fn set_session(&mut self, session: Option<Session>) {
        let signed_out = session.is_none() && self.session.is_some();
        self.session = session;
        if signed_out {
            self.bridge.cancel_all();
            self.plans.clear();
            self.current_plan = None;
            self.selection.clear();
            self.gesture = Gesture::Idle;
            self.rotation_handle = None;
            self.multi_mode = false;
            self.clipboard = None;
            log::info!("signed out, local editor state cleared");
        }
    }

    // --- sync ---

    fn schedule_sync(&mut self) {
        if let Some(id) = self.current_plan {
            self.bridge.schedule(id, Instant::now());
        }
    }

    pub fn sync_pending(&self) -> bool {
        self.current_plan.map(|id| self.bridge.is_pending(id)).unwrap_or(false)
    }

    /// Drive debounced saves. Failures surface as notices; the in-memory
    /// plan stays authoritative and the next mutation retries.
    pub async fn tick(&mut self, now: Instant) {
        let plans = &self.plans;
        let outcomes = self
            .bridge
            .flush_due(now, |id| plans.iter().find(|p| p.id == id).cloned())
            .await;
        for outcome in outcomes {
            match outcome {
                SyncOutcome::Saved(id) => log::debug!("plan {id} saved"),
                SyncOutcome::Skipped(_) => {}
                SyncOutcome::Failed(_, e) => {
                    self.notices
                        .push(Notice::Error(format!("Could not save plan: {e}")));
                }
            }
        }
    }

    /// Save the current plan immediately (e.g. before navigating away).
    pub async fn flush_current(&mut self) -> StoreResult<()> {
        let plan = match self.current_plan().cloned() {
            Some(plan) => plan,
            None => return Ok(()),
        };
        self.bridge.flush_immediate(&plan).await
    }

    // --- projections ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn rotation_handle(&self) -> Option<ElementId> {
        self.rotation_handle
    }

    /// Whether multi-select mode is on.
    pub fn multi_mode(&self) -> bool {
        self.multi_mode
    }

    /// The in-flight marquee, for rendering.
    pub fn marquee(&self) -> Option<&Marquee> {
        match &self.gesture {
            Gesture::Marquee(m) => Some(m),
            _ => None,
        }
    }

    pub fn inspector(&self) -> InspectorState {
        match &self.selection {
            Selection::None => InspectorState::Empty,
            Selection::Single(id) => InspectorState::Single(*id),
            Selection::Multi(ids) => InspectorState::Group(ids.clone()),
        }
    }

    pub fn toolbar(&self) -> ToolbarState {
        let single = self.selection.single().is_some();
        let any = !self.selection.is_empty();
        ToolbarState {
            tool: self.tool,
            can_copy: single,
            can_paste: self.clipboard.is_some(),
            can_duplicate: any,
            can_delete: any,
            can_rotate: single,
        }
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- intents ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        if tool != Tool::Select {
            self.rotation_handle = None;
        }
    }

    pub fn select_element(&mut self, id: ElementId) {
        if self.current_plan().map(|p| p.layout.contains(id)).unwrap_or(false) {
            self.selection.select(id);
            self.multi_mode = false;
        }
    }

    pub fn toggle_multi_selection(&mut self, id: ElementId) {
        if self.current_plan().map(|p| p.layout.contains(id)).unwrap_or(false) {
            self.selection.toggle(id);
            self.multi_mode = matches!(self.selection, Selection::Multi(_));
            self.rotation_handle = None;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.multi_mode = false;
        self.rotation_handle = None;
    }

    /// Create an element of `kind` centered on a design-space point and
    /// select it.
    pub fn create_element_at(&mut self, kind: ElementKind, point: Point) -> Option<ElementId> {
        let id = self.current_plan_mut()?.add_element(kind, point);
        self.selection.select(id);
        self.refresh_stage();
        self.schedule_sync();
        Some(id)
    }

    /// Copy the single selected element to the clipboard.
    pub fn copy(&mut self) {
        let id = match self.selection.single() {
            Some(id) => id,
            None => return,
        };
        self.clipboard = self
            .current_plan()
            .and_then(|p| p.layout.element(id))
            .cloned();
    }

    /// Paste the clipboard as a fresh element and select it.
    pub fn paste(&mut self) -> Option<ElementId> {
        let source = self.clipboard.clone()?;
        let id = self.current_plan_mut()?.paste_element(&source);
        self.selection.select(id);
        self.refresh_stage();
        self.schedule_sync();
        Some(id)
    }

    /// Duplicate every selected element; the duplicates become the new
    /// selection.
    pub fn duplicate_selected(&mut self) {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return;
        }
        let mut created = Vec::new();
        if let Some(plan) = self.current_plan_mut() {
            for id in ids {
                if let Some(copy) = plan.duplicate_element(id) {
                    created.push(copy);
                }
            }
        }
        if !created.is_empty() {
            self.selection = Selection::from_ids(created);
            self.refresh_stage();
            self.schedule_sync();
        }
    }

    /// Delete every selected element, detaching seated guests.
    pub fn delete_selected(&mut self) {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return;
        }
        let removed = match self.current_plan_mut() {
            Some(plan) => plan.delete_elements(&ids),
            None => 0,
        };
        self.selection.clear();
        self.rotation_handle = None;
        if removed > 0 {
            self.refresh_stage();
            self.schedule_sync();
        }
    }

    pub fn bring_selected_to_front(&mut self) {
        if let Some(id) = self.selection.single() {
            if let Some(plan) = self.current_plan_mut() {
                plan.layout.bring_to_front(id);
                self.schedule_sync();
            }
        }
    }

    pub fn send_selected_to_back(&mut self) {
        if let Some(id) = self.selection.single() {
            if let Some(plan) = self.current_plan_mut() {
                plan.layout.send_to_back(id);
                self.schedule_sync();
            }
        }
    }

    /// Set the single selected element's rotation from a numeric input.
    pub fn rotate_selected_to(&mut self, degrees: f64) {
        let id = match self.selection.single() {
            Some(id) => id,
            None => return,
        };
        if let Some(el) = self.current_plan_mut().and_then(|p| p.layout.element_mut(id)) {
            el.set_rotation_rounded(degrees);
            self.schedule_sync();
        }
    }

    /// Toggle the rotation handle on the single selected element.
    pub fn toggle_rotation_handle(&mut self) {
        match (self.rotation_handle, self.selection.single()) {
            (Some(_), _) => self.rotation_handle = None,
            (None, Some(id)) => self.rotation_handle = Some(id),
            (None, None) => {}
        }
    }

    pub fn set_element_status(&mut self, id: ElementId, status: ElementStatus) {
        if let Some(el) = self.current_plan_mut().and_then(|p| p.layout.element_mut(id)) {
            el.status = status;
            self.schedule_sync();
        }
    }

    pub fn set_element_label(&mut self, id: ElementId, label: impl Into<String>) {
        if let Some(el) = self.current_plan_mut().and_then(|p| p.layout.element_mut(id)) {
            el.label = label.into();
            self.schedule_sync();
        }
    }

    pub fn set_element_capacity(&mut self, id: ElementId, capacity: u32) {
        if let Some(plan) = self.current_plan_mut() {
            plan.set_element_capacity(id, capacity);
            self.schedule_sync();
        }
    }

    /// Seat a guest, reporting capacity problems as notices.
    pub fn attach_guest(&mut self, guest: GuestId, element: ElementId) {
        let result = match self.current_plan_mut() {
            Some(plan) => plan.attach_guest(guest, element),
            None => return,
        };
        match result {
            Ok(()) => self.schedule_sync(),
            Err(AttachError::Full) => self
                .notices
                .push(Notice::Error("That element is already full".to_string())),
            Err(AttachError::UnknownGuest) | Err(AttachError::UnknownElement) => {
                log::debug!("attach_guest: stale reference ignored");
            }
        }
    }

    pub fn detach_guest(&mut self, guest: GuestId) {
        if let Some(plan) = self.current_plan_mut() {
            plan.detach_guest(guest);
            self.schedule_sync();
        }
    }

    pub fn import_guests(&mut self, records: Vec<GuestRecord>) {
        let count = match self.current_plan_mut() {
            Some(plan) => plan.import_guests(records),
            None => return,
        };
        if count > 0 {
            self.notices.push(Notice::Info(format!("Imported {count} guests")));
            self.schedule_sync();
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    fn refresh_stage(&mut self) {
        if let Some(plan) = self.current_plan() {
            let layout = plan.layout.clone();
            self.viewport.update_stage_bounds(&layout);
        }
    }

    // --- pointer state machine ---

    /// Feed a pointer event through the gesture state machine. Positions
    /// are screen coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                timestamp_ms,
                modifiers,
            } => self.pointer_down(position, timestamp_ms, modifiers),
            PointerEvent::Move { position, modifiers } => self.pointer_move(position, modifiers),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(position),
            PointerEvent::Scroll { delta, .. } => self.viewport.pan_by(delta),
            _ => {}
        }
    }

    fn pointer_down(&mut self, screen: Point, timestamp_ms: u64, modifiers: Modifiers) {
        if self.current_plan().is_none() {
            return;
        }
        let point = self.viewport.screen_to_stage(screen);
        self.capture.capture(PRIMARY_POINTER);
        let double_press = self
            .last_press_ms
            .map(|last| timestamp_ms.saturating_sub(last) < DOUBLE_PRESS_WINDOW_MS)
            .unwrap_or(false);
        self.last_press_ms = Some(timestamp_ms);

        match self.tool {
            Tool::Place(kind) => {
                let _ = self.create_element_at(kind, point);
                return;
            }
            Tool::Rotate => {
                if let Some(id) = self.hit_test(point) {
                    self.selection.select(id);
                    self.gesture = Gesture::RotateTool { id };
                }
                return;
            }
            Tool::Select => {}
        }

        // Rotation handle knob wins over element bodies.
        if let Some(id) = self.rotation_handle {
            if self.hit_rotation_handle(id, point) {
                self.gesture = Gesture::RotateHandle { id };
                return;
            }
        }

        match self.hit_test(point) {
            Some(id) => {
                if modifiers.multi_select() {
                    self.selection.toggle(id);
                    self.multi_mode = matches!(self.selection, Selection::Multi(_));
                    self.rotation_handle = None;
                    return;
                }

                if self.multi_mode {
                    // A plain press pulls the element into the set; with
                    // more than one member it becomes a group drag.
                    self.selection.ensure(id);
                    if self.selection.len() > 1 {
                        self.begin_group_drag(point);
                        return;
                    }
                    self.multi_mode = false;
                }
                self.selection.select(id);
                self.begin_single_drag(id, point);
            }
            None => {
                if double_press {
                    // Two quick presses on empty canvas force multi-select
                    // mode with nothing selected.
                    self.multi_mode = true;
                    self.selection.clear();
                    self.rotation_handle = None;
                }
                if self.multi_mode {
                    self.gesture = Gesture::Marquee(Marquee::new(point));
                } else {
                    // Outside multi-select mode an empty-canvas press
                    // clears the selection.
                    self.selection.clear();
                    self.rotation_handle = None;
                }
            }
        }
    }

    fn begin_single_drag(&mut self, id: ElementId, point: Point) {
        if let Some(el) = self.current_plan().and_then(|p| p.layout.element(id)) {
            let grab_offset = point - el.position;
            self.gesture = Gesture::DragSingle {
                id,
                grab_offset,
                moved: false,
            };
        }
    }

    fn begin_group_drag(&mut self, point: Point) {
        let plan = match self.current_plan() {
            Some(plan) => plan,
            None => return,
        };
        let mut origins = HashMap::new();
        let mut group_box: Option<kurbo::Rect> = None;
        for id in self.selection.ids() {
            if let Some(el) = plan.layout.element(id) {
                origins.insert(id, el.position);
                group_box = Some(match group_box {
                    Some(b) => b.union(el.rect()),
                    None => el.rect(),
                });
            }
        }
        if let Some(group_box) = group_box {
            self.gesture = Gesture::DragGroup {
                start: point,
                origins,
                group_box,
                moved: false,
            };
        }
    }

    fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        let point = self.viewport.screen_to_stage(screen);
        let grid = transform::grid_step(modifiers.shift);

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Marquee(marquee) => {
                marquee.update(point);
                let rect = marquee.rect();
                let current = self.current_plan;
                if let Some(plan) = self.plans.iter().find(|p| Some(p.id) == current) {
                    marquee.preview = plan.layout.elements_in_rect(&rect);
                }
            }
            Gesture::DragSingle { id, grab_offset, moved } => {
                let id = *id;
                let target = transform::snap_point(point - *grab_offset, grid);
                *moved = true;
                if let Some(plan) = self.current_plan_mut() {
                    plan.layout.move_element_to(id, target);
                }
            }
            Gesture::DragGroup {
                start,
                origins,
                group_box,
                moved,
            } => {
                let delta = point - *start;
                let origins = origins.clone();
                let group_box = *group_box;
                *moved = true;
                let bounds = match self.current_plan() {
                    Some(plan) => plan.layout.bounds(),
                    None => return,
                };
                let delta = transform::clamp_group_delta(delta, &group_box, &bounds);
                if let Some(plan) = self.current_plan_mut() {
                    // Each member snaps and clamps on its own; groups may
                    // compress against the canvas edge.
                    for (id, origin) in origins {
                        let target = transform::snap_point(origin + delta, grid);
                        plan.layout.move_element_to(id, target);
                    }
                }
            }
            Gesture::RotateTool { id } => {
                let id = *id;
                self.apply_pointer_rotation(id, point, transform::pointer_angle);
            }
            Gesture::RotateHandle { id } => {
                let id = *id;
                self.apply_pointer_rotation(id, point, transform::handle_angle);
            }
        }
    }

    fn apply_pointer_rotation(&mut self, id: ElementId, point: Point, angle_of: fn(Point, Point) -> f64) {
        let center = match self.current_plan().and_then(|p| p.layout.element(id)) {
            Some(el) => el.center(),
            None => {
                // Element deleted mid-gesture; abandon it.
                self.gesture = Gesture::Idle;
                return;
            }
        };
        let angle = angle_of(center, point);
        if let Some(el) = self.current_plan_mut().and_then(|p| p.layout.element_mut(id)) {
            el.set_rotation(angle);
        }
    }

    fn pointer_up(&mut self, _screen: Point) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => {}
            Gesture::Marquee(marquee) => {
                if marquee.moved {
                    self.selection = Selection::from_ids(marquee.preview);
                    // Committing fewer than two members drops out of
                    // multi-select mode; a non-moved press keeps the prior
                    // selection and the mode (click-no-op).
                    self.multi_mode = matches!(self.selection, Selection::Multi(_));
                    self.rotation_handle = None;
                }
            }
            Gesture::DragSingle { moved, .. } | Gesture::DragGroup { moved, .. } => {
                if moved {
                    self.refresh_stage();
                    self.schedule_sync();
                }
            }
            Gesture::RotateTool { .. } | Gesture::RotateHandle { .. } => {
                self.schedule_sync();
            }
        }
        self.capture.release(PRIMARY_POINTER);
    }

    fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.current_plan()?.layout.element_at_point(point).map(|el| el.id)
    }

    fn hit_rotation_handle(&self, id: ElementId, point: Point) -> bool {
        let el = match self.current_plan().and_then(|p| p.layout.element(id)) {
            Some(el) => el,
            None => return false,
        };
        let radius = transform::rotation_handle_radius(el.size.width, el.size.height);
        let knob = transform::rotation_handle_position(el.center(), radius, el.rotation());
        let dx = point.x - knob.x;
        let dy = point.y - knob.y;
        dx * dx + dy * dy <= ROTATION_HANDLE_HIT_RADIUS * ROTATION_HANDLE_HIT_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{block_on, MemoryStore};

    fn session() -> EditorSession<MemoryStore> {
        let mut editor = EditorSession::new(Arc::new(MemoryStore::new()));
        editor.create_plan("Test plan");
        editor
    }

    fn down(editor: &mut EditorSession<MemoryStore>, stage: Point, ts: u64, mods: Modifiers) {
        let screen = editor.viewport.stage_to_screen(stage);
        editor.handle_pointer(PointerEvent::Down {
            position: screen,
            button: MouseButton::Left,
            timestamp_ms: ts,
            modifiers: mods,
        });
    }

    fn drag_to(editor: &mut EditorSession<MemoryStore>, stage: Point, mods: Modifiers) {
        let screen = editor.viewport.stage_to_screen(stage);
        editor.handle_pointer(PointerEvent::Move {
            position: screen,
            modifiers: mods,
        });
    }

    fn up(editor: &mut EditorSession<MemoryStore>, stage: Point) {
        let screen = editor.viewport.stage_to_screen(stage);
        editor.handle_pointer(PointerEvent::Up {
            position: screen,
            button: MouseButton::Left,
        });
    }

    #[test]
    fn test_place_tool_creates_selected_element() {
        let mut editor = session();
        editor.set_tool(Tool::Place(ElementKind::Table));
        down(&mut editor, Point::new(400.0, 400.0), 0, Modifiers::default());
        up(&mut editor, Point::new(400.0, 400.0));

        let plan = editor.current_plan().unwrap();
        assert_eq!(plan.layout.elements.len(), 1);
        let id = plan.layout.elements[0].id;
        assert_eq!(editor.selection().single(), Some(id));
        assert!(editor.sync_pending());
    }

    #[test]
    fn test_click_selects_and_drag_moves_with_snap() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        // Seat origin is (177, 177).
        down(&mut editor, Point::new(200.0, 200.0), 0, Modifiers::default());
        assert_eq!(editor.selection().single(), Some(id));

        drag_to(&mut editor, Point::new(254.0, 203.0), Modifiers::default());
        up(&mut editor, Point::new(254.0, 203.0));

        let el = editor.current_plan().unwrap().layout.element(id).unwrap();
        // Origin followed the grab offset, snapped to the 10-unit grid.
        assert!((el.position.x - 230.0).abs() < f64::EPSILON);
        assert!((el.position.y - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shift_drag_uses_fine_grid() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        down(&mut editor, Point::new(200.0, 200.0), 0, Modifiers::default());
        let shift = Modifiers { shift: true, ..Modifiers::default() };
        drag_to(&mut editor, Point::new(203.0, 200.0), shift);
        up(&mut editor, Point::new(203.0, 200.0));

        let el = editor.current_plan().unwrap().layout.element(id).unwrap();
        assert!((el.position.x - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_clamps_to_canvas() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        down(&mut editor, Point::new(200.0, 200.0), 0, Modifiers::default());
        drag_to(&mut editor, Point::new(9000.0, -500.0), Modifiers::default());
        up(&mut editor, Point::new(9000.0, -500.0));

        let el = editor.current_plan().unwrap().layout.element(id).unwrap();
        let bounds = editor.current_plan().unwrap().layout.bounds();
        assert!(el.rect().x1 <= bounds.x1 + f64::EPSILON);
        assert!(el.position.y >= 0.0);
    }

    #[test]
    fn test_ctrl_click_toggles_membership() {
        let mut editor = session();
        let a = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        let b = editor.create_element_at(ElementKind::Seat, Point::new(400.0, 400.0)).unwrap();
        let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };

        editor.select_element(a);
        down(&mut editor, Point::new(400.0, 400.0), 0, ctrl);
        up(&mut editor, Point::new(400.0, 400.0));
        assert!(editor.selection().contains(a));
        assert!(editor.selection().contains(b));

        down(&mut editor, Point::new(400.0, 400.0), 100, ctrl);
        up(&mut editor, Point::new(400.0, 400.0));
        assert_eq!(editor.selection().single(), Some(a));
    }

    #[test]
    fn test_empty_canvas_click_clears_single_selection() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        editor.select_element(id);

        down(&mut editor, Point::new(1000.0, 1000.0), 0, Modifiers::default());
        up(&mut editor, Point::new(1000.0, 1000.0));

        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_double_press_on_empty_canvas_enters_multi_mode() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        editor.select_element(id);

        down(&mut editor, Point::new(1000.0, 1000.0), 1000, Modifiers::default());
        up(&mut editor, Point::new(1000.0, 1000.0));
        assert!(!editor.multi_mode());

        down(&mut editor, Point::new(1000.0, 1000.0), 1200, Modifiers::default());
        // The second press flips multi-select on with nothing selected and
        // already tracks a marquee.
        assert!(editor.multi_mode());
        assert!(editor.selection().is_empty());
        assert!(editor.marquee().is_some());
        up(&mut editor, Point::new(1000.0, 1000.0));
        assert!(editor.multi_mode());
    }

    #[test]
    fn test_marquee_selects_only_overlapping() {
        let mut editor = session();
        let inside = editor.create_element_at(ElementKind::Seat, Point::new(50.0, 50.0)).unwrap();
        let outside = editor.create_element_at(ElementKind::Seat, Point::new(500.0, 500.0)).unwrap();

        // Double press on empty canvas to enter multi-select, then drag the
        // marquee with the second press.
        down(&mut editor, Point::new(0.0, 0.0), 0, Modifiers::default());
        up(&mut editor, Point::new(0.0, 0.0));
        down(&mut editor, Point::new(0.0, 0.0), 100, Modifiers::default());
        drag_to(&mut editor, Point::new(100.0, 100.0), Modifiers::default());
        up(&mut editor, Point::new(100.0, 100.0));

        assert!(editor.selection().contains(inside));
        assert!(!editor.selection().contains(outside));
    }

    #[test]
    fn test_marquee_click_preserves_multi_selection() {
        let mut editor = session();
        let a = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        let b = editor.create_element_at(ElementKind::Seat, Point::new(400.0, 400.0)).unwrap();
        editor.select_element(a);
        editor.toggle_multi_selection(b);
        assert!(editor.multi_mode());

        // Pointer down and up on empty space without crossing the drag
        // threshold is a click-no-op.
        down(&mut editor, Point::new(1000.0, 1000.0), 1000, Modifiers::default());
        drag_to(&mut editor, Point::new(1001.0, 1000.0), Modifiers::default());
        up(&mut editor, Point::new(1001.0, 1000.0));

        assert!(editor.selection().contains(a));
        assert!(editor.selection().contains(b));
        assert!(editor.multi_mode());
    }

    #[test]
    fn test_marquee_collapses_single_hit() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(50.0, 50.0)).unwrap();
        down(&mut editor, Point::new(0.0, 0.0), 0, Modifiers::default());
        up(&mut editor, Point::new(0.0, 0.0));
        down(&mut editor, Point::new(0.0, 0.0), 100, Modifiers::default());
        drag_to(&mut editor, Point::new(100.0, 100.0), Modifiers::default());
        up(&mut editor, Point::new(100.0, 100.0));
        assert_eq!(editor.selection(), &Selection::Single(id));
        assert!(!editor.multi_mode());
    }

    #[test]
    fn test_group_drag_moves_all_members() {
        let mut editor = session();
        let a = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        let b = editor.create_element_at(ElementKind::Seat, Point::new(300.0, 200.0)).unwrap();
        editor.select_element(a);
        editor.toggle_multi_selection(b);

        down(&mut editor, Point::new(200.0, 200.0), 0, Modifiers::default());
        drag_to(&mut editor, Point::new(300.0, 250.0), Modifiers::default());
        up(&mut editor, Point::new(300.0, 250.0));

        // Origins (177,177) and (277,177) carry the shared (100,50) delta
        // and snap to the 10-unit grid.
        let a_after = editor.current_plan().unwrap().layout.element(a).unwrap().position;
        let b_after = editor.current_plan().unwrap().layout.element(b).unwrap().position;
        assert!((a_after.x - 280.0).abs() < f64::EPSILON);
        assert!((a_after.y - 230.0).abs() < f64::EPSILON);
        assert!((b_after.x - 380.0).abs() < f64::EPSILON);
        assert!((b_after.y - 230.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_press_outside_multi_set_extends_group_drag() {
        let mut editor = session();
        let a = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        let b = editor.create_element_at(ElementKind::Seat, Point::new(300.0, 200.0)).unwrap();
        let c = editor.create_element_at(ElementKind::Seat, Point::new(400.0, 200.0)).unwrap();
        editor.select_element(a);
        editor.toggle_multi_selection(b);

        // A plain press on an unselected element while multi-select is on
        // pulls it into the set and drags the whole group.
        down(&mut editor, Point::new(400.0, 200.0), 0, Modifiers::default());
        assert!(editor.selection().contains(c));
        drag_to(&mut editor, Point::new(450.0, 250.0), Modifiers::default());
        up(&mut editor, Point::new(450.0, 250.0));

        // Origins (177,177), (277,177), (377,177) carry the shared (50,50)
        // delta and snap to the 10-unit grid.
        let plan = editor.current_plan().unwrap();
        assert!((plan.layout.element(a).unwrap().position.x - 230.0).abs() < f64::EPSILON);
        assert!((plan.layout.element(b).unwrap().position.x - 330.0).abs() < f64::EPSILON);
        assert!((plan.layout.element(c).unwrap().position.x - 430.0).abs() < f64::EPSILON);
        assert!((plan.layout.element(c).unwrap().position.y - 230.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_tool_sets_pointer_angle() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Table, Point::new(400.0, 400.0)).unwrap();
        editor.set_tool(Tool::Rotate);

        down(&mut editor, Point::new(400.0, 400.0), 0, Modifiers::default());
        // Pointer due south of the center: atan2 says 90 degrees.
        drag_to(&mut editor, Point::new(400.0, 600.0), Modifiers::default());
        up(&mut editor, Point::new(400.0, 600.0));

        let el = editor.current_plan().unwrap().layout.element(id).unwrap();
        assert!((el.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_handle_drag_uses_offset_angle() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(400.0, 400.0)).unwrap();
        editor.select_element(id);
        editor.toggle_rotation_handle();
        assert_eq!(editor.rotation_handle(), Some(id));

        // Knob starts on the orbit straight above the center (angle 0).
        let radius = transform::rotation_handle_radius(46.0, 46.0);
        let knob = Point::new(400.0, 400.0 - radius);
        down(&mut editor, knob, 0, Modifiers::default());
        // Drag due east of the center: handle angle is 90.
        drag_to(&mut editor, Point::new(600.0, 400.0), Modifiers::default());
        up(&mut editor, Point::new(600.0, 400.0));

        let el = editor.current_plan().unwrap().layout.element(id).unwrap();
        assert!((el.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_numeric_normalizes() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Table, Point::new(300.0, 300.0)).unwrap();
        editor.select_element(id);

        editor.rotate_selected_to(370.0);
        assert!((editor.current_plan().unwrap().layout.element(id).unwrap().rotation() - 10.0).abs() < f64::EPSILON);
        editor.rotate_selected_to(-10.0);
        assert!((editor.current_plan().unwrap().layout.element(id).unwrap().rotation() - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_copy_paste_twice_distinct_clones() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(500.0, 500.0)).unwrap();
        editor.select_element(id);
        editor.copy();

        let first = editor.paste().unwrap();
        let second = editor.paste().unwrap();
        assert_ne!(first, second);

        let plan = editor.current_plan().unwrap();
        let source = plan.layout.element(id).unwrap();
        let a = plan.layout.element(first).unwrap();
        let b = plan.layout.element(second).unwrap();
        // Both offset from the clipboard source, not from each other.
        assert!((a.position.x - source.position.x - 24.0).abs() < f64::EPSILON);
        assert!((b.position.x - source.position.x - 24.0).abs() < f64::EPSILON);
        assert!(a.label.ends_with(" copy"));
        // The second paste is the live selection.
        assert_eq!(editor.selection().single(), Some(second));
    }

    #[test]
    fn test_delete_selected_clears_selection_and_detaches() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Table, Point::new(300.0, 300.0)).unwrap();
        let guest = crate::plan::Guest::new("Ada", "ada@example.com");
        let guest_id = guest.id;
        editor.current_plan_mut().unwrap().guests.push(guest);
        editor.attach_guest(guest_id, id);

        editor.select_element(id);
        editor.delete_selected();

        let plan = editor.current_plan().unwrap();
        assert!(plan.layout.elements.is_empty());
        assert_eq!(plan.guest(guest_id).unwrap().seat_id, None);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_attach_full_element_raises_notice() {
        let mut editor = session();
        let seat = editor.create_element_at(ElementKind::Seat, Point::new(300.0, 300.0)).unwrap();
        let a = crate::plan::Guest::new("A", "a@example.com");
        let b = crate::plan::Guest::new("B", "b@example.com");
        let (a_id, b_id) = (a.id, b.id);
        {
            let plan = editor.current_plan_mut().unwrap();
            plan.guests.push(a);
            plan.guests.push(b);
        }
        editor.attach_guest(a_id, seat);
        editor.attach_guest(b_id, seat);

        let notices = editor.take_notices();
        assert!(notices.iter().any(|n| matches!(n, Notice::Error(_))));
        assert!(editor.take_notices().is_empty());
    }

    #[test]
    fn test_toolbar_reflects_selection() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(300.0, 300.0)).unwrap();
        editor.clear_selection();
        let tb = editor.toolbar();
        assert!(!tb.can_copy);
        assert!(!tb.can_delete);
        assert!(!tb.can_paste);

        editor.select_element(id);
        let tb = editor.toolbar();
        assert!(tb.can_copy);
        assert!(tb.can_rotate);

        editor.copy();
        assert!(editor.toolbar().can_paste);
    }

    #[test]
    fn test_inspector_states() {
        let mut editor = session();
        assert_eq!(editor.inspector(), InspectorState::Empty);
        let a = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        assert_eq!(editor.inspector(), InspectorState::Single(a));
        let b = editor.create_element_at(ElementKind::Seat, Point::new(400.0, 400.0)).unwrap();
        editor.toggle_multi_selection(a);
        assert_eq!(editor.inspector(), InspectorState::Group(vec![b, a]));
    }

    #[test]
    fn test_plan_switch_resets_editor_state() {
        let mut editor = session();
        let id = editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0)).unwrap();
        editor.select_element(id);
        editor.toggle_rotation_handle();

        let second = editor.create_plan("Other");
        assert_eq!(editor.current_plan().unwrap().id, second);
        assert!(editor.selection().is_empty());
        assert!(editor.rotation_handle().is_none());
    }

    #[test]
    fn test_delete_plan_cancels_pending_sync() {
        let mut editor = session();
        editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0));
        let id = editor.current_plan().unwrap().id;
        assert!(editor.sync_pending());

        block_on(editor.delete_plan(id)).unwrap();
        assert!(!editor.bridge.is_pending(id));
        assert!(editor.plans().is_empty());
    }

    #[test]
    fn test_sign_out_clears_state() {
        let mut editor = session();
        editor.set_session(Some(Session {
            user: crate::session::UserProfile {
                id: "u1".into(),
                email: "ada@example.com".into(),
                name: "Ada".into(),
                avatar_url: None,
            },
        }));
        editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0));
        assert!(editor.sync_pending());

        editor.set_session(None);
        assert!(editor.plans().is_empty());
        assert!(editor.current_plan().is_none());
        assert!(!editor.sync_pending());
    }

    #[test]
    fn test_tick_saves_and_failures_keep_state() {
        let mut editor = session();
        editor.create_element_at(ElementKind::Seat, Point::new(200.0, 200.0));
        let id = editor.current_plan().unwrap().id;

        block_on(editor.tick(Instant::now() + crate::store::PLAN_SYNC_DELAY));
        assert!(!editor.sync_pending());
        assert!(block_on(editor.bridge.store().exists(id)).unwrap());
    }

    #[test]
    fn test_stale_intents_are_noops() {
        let mut editor = session();
        let ghost = uuid::Uuid::new_v4();
        editor.select_element(ghost);
        assert!(editor.selection().is_empty());
        editor.set_element_status(ghost, ElementStatus::Reserved);
        editor.attach_guest(uuid::Uuid::new_v4(), ghost);
        assert!(editor.take_notices().is_empty());
    }
}
