use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::background::BackgroundState;
use crate::config::MapConfig;
use crate::debug::{DebugProbe, NoopProbe};
use crate::error::MapError;
use crate::hit_test::find_nearest;
use crate::poller::{PollPhase, PollerState};
use crate::render::{Scene, SceneInput, build_scene};
use crate::selection::Selection;
use crate::snapshot::{Entity, MapSnapshot};
use crate::viewport::{Viewport, wheel_factor};

/// Pointer travel (screen px) below which a press/release counts as a click.
pub const CLICK_SLOP_PX: f64 = 5.0;

/// Upper bound on drain rounds per dispatch for probe-injected events.
pub const MAX_INJECTED_ROUNDS: usize = 8;

/// Everything that can happen to the map view.
#[derive(Debug, Clone)]
pub enum MapEvent {
    Mounted { visible: bool },
    RefreshTick,
    CountdownTick,
    VisibilityChanged { visible: bool },
    FetchSucceeded {
        snapshot: Arc<MapSnapshot>,
        received_at: DateTime<Utc>,
    },
    FetchFailed(MapError),
    ImageLoaded { url: String, width: f64, height: f64 },
    ImageFailed { url: String, reason: String },
    CanvasResized { width: f64, height: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    Wheel { x: f64, y: f64, delta_y: f64 },
    Pinch { x: f64, y: f64, factor: f64 },
    ResetView,
    DismissSelection,
}

impl MapEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mounted { .. } => "mounted",
            Self::RefreshTick => "refresh_tick",
            Self::CountdownTick => "countdown_tick",
            Self::VisibilityChanged { .. } => "visibility_changed",
            Self::FetchSucceeded { .. } => "fetch_succeeded",
            Self::FetchFailed(_) => "fetch_failed",
            Self::ImageLoaded { .. } => "image_loaded",
            Self::ImageFailed { .. } => "image_failed",
            Self::CanvasResized { .. } => "canvas_resized",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerLeave => "pointer_leave",
            Self::Wheel { .. } => "wheel",
            Self::Pinch { .. } => "pinch",
            Self::ResetView => "reset_view",
            Self::DismissSelection => "dismiss_selection",
        }
    }
}

/// Work the host must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSnapshot,
    LoadImage(String),
    Redraw,
    SelectionChanged(Option<String>),
    Report(MapError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DragState {
    active: bool,
    start: (f64, f64),
    last: (f64, f64),
}

/// Complete map view state. Only [`reduce`] changes it.
///
/// Two sizes are tracked. `surface` is the drawing area in CSS pixels, as
/// reported by the container. The map space is what entities are projected
/// into: the background's natural size once one has decoded, the surface
/// before that. The viewport maps map space onto the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    viewport: Viewport,
    snapshot: Option<Arc<MapSnapshot>>,
    selection: Selection,
    poller: PollerState,
    background: BackgroundState,
    surface: (f64, f64),
    drag: DragState,
    fetch_error: Option<MapError>,
    image_error: Option<MapError>,
    hit_radius_px: f64,
}

impl MapState {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            viewport: Viewport::default(),
            snapshot: None,
            selection: Selection::default(),
            poller: PollerState::new(config.countdown_secs),
            background: BackgroundState::default(),
            surface: (0.0, 0.0),
            drag: DragState::default(),
            fetch_error: None,
            image_error: None,
            hit_radius_px: config.hit_radius_px,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn snapshot(&self) -> Option<&MapSnapshot> {
        self.snapshot.as_deref()
    }

    pub fn poller(&self) -> &PollerState {
        &self.poller
    }

    pub fn background(&self) -> &BackgroundState {
        &self.background
    }

    pub fn surface(&self) -> (f64, f64) {
        self.surface
    }

    pub fn map_space(&self) -> (f64, f64) {
        self.background
            .current()
            .map_or(self.surface, |img| (img.width, img.height))
    }

    /// The view `ResetView` returns to: the whole background fitted to the
    /// surface, when there is a background to fit.
    fn home_view(&self) -> Option<Viewport> {
        let img = self.background.current()?;
        Viewport::fitted((img.width, img.height), self.surface)
    }

    fn at_home(&self) -> bool {
        match self.home_view() {
            Some(home) => self.viewport == home,
            None => self.viewport == Viewport::default(),
        }
    }

    fn go_home(&mut self) {
        match self.home_view() {
            Some(home) => self.viewport = home,
            None => self.viewport.reset(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.id()
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selection.resolve(self.snapshot())
    }

    pub fn fetch_error(&self) -> Option<&MapError> {
        self.fetch_error.as_ref()
    }

    pub fn image_error(&self) -> Option<&MapError> {
        self.image_error.as_ref()
    }

    /// Page-level messages, at most one per error kind.
    pub fn error_messages(&self) -> Vec<String> {
        self.fetch_error
            .iter()
            .chain(self.image_error.iter())
            .map(ToString::to_string)
            .collect()
    }

    pub fn scene(&self) -> Scene {
        build_scene(SceneInput {
            snapshot: self.snapshot(),
            viewport: &self.viewport,
            map_space: self.map_space(),
            surface: self.surface,
            background: self.background.current(),
            selected: self.selection.id(),
        })
    }

    /// Values the surrounding page displays.
    pub fn view(&self) -> MapView {
        let snapshot = self.snapshot();
        MapView {
            countdown: self.poller.countdown(),
            phase: self.poller.phase(),
            loading_map: self.background.pending().is_some(),
            errors: self.error_messages(),
            server_label: snapshot.map(|s| s.server_label.clone()),
            online_count: snapshot.map(|s| s.online_count),
            selected: self.selected_entity().cloned(),
            scale: self.viewport.scale,
            last_update: self.poller.last_success(),
        }
    }

    fn hit(&self, x: f64, y: f64) -> Option<String> {
        let snapshot = self.snapshot()?;
        find_nearest(
            (x, y),
            &snapshot.entities,
            &self.viewport,
            snapshot.world_size,
            self.map_space(),
            self.hit_radius_px,
        )
        .map(|entity| entity.id.clone())
    }
}

/// Page chrome derived from [`MapState`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub countdown: u8,
    pub phase: PollPhase,
    pub loading_map: bool,
    pub errors: Vec<String>,
    pub server_label: Option<String>,
    pub online_count: Option<u32>,
    pub selected: Option<Entity>,
    pub scale: f64,
    pub last_update: Option<DateTime<Utc>>,
}

/// The single state transition function: `(state, event) -> (state, effects)`.
pub fn reduce(mut state: MapState, event: MapEvent) -> (MapState, Vec<Effect>) {
    let effects = apply(&mut state, event);
    (state, effects)
}

fn apply(state: &mut MapState, event: MapEvent) -> Vec<Effect> {
    let mut effects = Vec::new();

    match event {
        MapEvent::Mounted { visible } => {
            state.poller.set_visible(visible);
            if state.poller.refresh_tick() {
                effects.push(Effect::FetchSnapshot);
            }
        }
        MapEvent::RefreshTick => {
            if state.poller.refresh_tick() {
                effects.push(Effect::FetchSnapshot);
            }
        }
        MapEvent::CountdownTick => state.poller.countdown_tick(),
        MapEvent::VisibilityChanged { visible } => state.poller.set_visible(visible),
        MapEvent::FetchSucceeded {
            snapshot,
            received_at,
        } => {
            state.poller.succeeded(received_at);
            state.fetch_error = None;
            if state.background.request(&snapshot.background_image_ref) {
                effects.push(Effect::LoadImage(snapshot.background_image_ref.clone()));
            }
            if state.selection.retain_in(&snapshot) {
                effects.push(Effect::SelectionChanged(None));
            }
            state.snapshot = Some(snapshot);
            effects.push(Effect::Redraw);
        }
        MapEvent::FetchFailed(err) => {
            state.poller.failed();
            state.fetch_error = Some(err.clone());
            effects.push(Effect::Report(err));
        }
        MapEvent::ImageLoaded { url, width, height } => {
            let at_home = state.at_home();
            if state.background.loaded(&url, width, height) {
                state.image_error = None;
                // A view the user has not moved frames the new map.
                if at_home {
                    state.go_home();
                }
                effects.push(Effect::Redraw);
            }
        }
        MapEvent::ImageFailed { url, reason } => {
            if state.background.failed(&url) {
                let err = MapError::ImageDecode { url, reason };
                state.image_error = Some(err.clone());
                effects.push(Effect::Report(err));
            }
        }
        MapEvent::CanvasResized { width, height } => {
            if state.surface != (width, height) {
                let at_home = state.at_home();
                state.surface = (width, height);
                // A fitted view stays fitted; a panned or zoomed one is left alone.
                if at_home {
                    state.go_home();
                }
                effects.push(Effect::Redraw);
            }
        }
        MapEvent::PointerDown { x, y } => {
            state.drag = DragState {
                active: true,
                start: (x, y),
                last: (x, y),
            };
        }
        MapEvent::PointerMove { x, y } => {
            if state.drag.active {
                let (lx, ly) = state.drag.last;
                state.drag.last = (x, y);
                state.viewport.pan(x - lx, y - ly);
                effects.push(Effect::Redraw);
            }
        }
        MapEvent::PointerUp { x, y } => {
            let was_dragging = state.drag.active;
            let (sx, sy) = state.drag.start;
            state.drag.active = false;
            let is_click =
                was_dragging && (x - sx).abs() < CLICK_SLOP_PX && (y - sy).abs() < CLICK_SLOP_PX;
            if is_click {
                let hit = state.hit(x, y);
                if state.selection.set(hit.as_deref()) {
                    effects.push(Effect::SelectionChanged(hit));
                    effects.push(Effect::Redraw);
                }
            }
        }
        MapEvent::PointerLeave => state.drag.active = false,
        MapEvent::Wheel { x, y, delta_y } => {
            if let Some(factor) = wheel_factor(delta_y) {
                state.viewport.zoom_at(x, y, factor);
                effects.push(Effect::Redraw);
            }
        }
        MapEvent::Pinch { x, y, factor } => {
            let before = state.viewport;
            state.viewport.zoom_at(x, y, factor);
            if state.viewport != before {
                effects.push(Effect::Redraw);
            }
        }
        MapEvent::ResetView => {
            state.go_home();
            effects.push(Effect::Redraw);
        }
        MapEvent::DismissSelection => {
            if state.selection.clear() {
                effects.push(Effect::SelectionChanged(None));
                effects.push(Effect::Redraw);
            }
        }
    }

    effects
}

/// Owns the state and the injected debug probe. Events the probe queues are
/// applied right after the transition that was dispatched.
pub struct MapController {
    state: MapState,
    probe: Rc<dyn DebugProbe>,
}

impl MapController {
    pub fn new(config: &MapConfig, probe: Rc<dyn DebugProbe>) -> Self {
        Self {
            state: MapState::new(config),
            probe,
        }
    }

    pub fn without_probe(config: &MapConfig) -> Self {
        Self::new(config, Rc::new(NoopProbe))
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn dispatch(&mut self, event: MapEvent) -> Vec<Effect> {
        let mut effects = self.step(event);
        effects.extend(self.pump());
        effects
    }

    /// Apply whatever the probe has queued, without an outside event.
    pub fn pump(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for _ in 0..MAX_INJECTED_ROUNDS {
            let injected = self.probe.drain_injected();
            if injected.is_empty() {
                break;
            }
            for event in injected {
                effects.extend(self.step(event));
            }
        }
        effects
    }

    fn step(&mut self, event: MapEvent) -> Vec<Effect> {
        self.probe.on_event(&event, &self.state);
        let effects = apply(&mut self.state, event);
        self.probe.on_effects(&effects, &self.state);
        effects
    }
}
