use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use warden_shared::{
    DebugProbe, Effect, Entity, MapError, MapEvent, MapSnapshot, MapState, Monument,
    WorldPosition,
};

const DEMO_PLAYERS: usize = 6;
const DEMO_WORLD_SIZE: f64 = 4000.0;

/// Logs each transition to the browser console. Installed only when the
/// page is opened with `?debug=1`.
pub struct ConsoleProbe {
    queue: Rc<RefCell<Vec<MapEvent>>>,
}

/// Feeds synthetic events to the controller through its [`ConsoleProbe`].
#[derive(Clone)]
pub struct DebugHandle {
    queue: Rc<RefCell<Vec<MapEvent>>>,
}

impl DebugHandle {
    pub fn inject(&self, event: MapEvent) {
        self.queue.borrow_mut().push(event);
    }
}

impl ConsoleProbe {
    pub fn new() -> (Self, DebugHandle) {
        let queue = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                queue: queue.clone(),
            },
            DebugHandle { queue },
        )
    }
}

impl DebugProbe for ConsoleProbe {
    fn on_event(&self, event: &MapEvent, _before: &MapState) {
        // Countdown ticks every second and drowns out everything else.
        if matches!(event, MapEvent::CountdownTick | MapEvent::PointerMove { .. }) {
            return;
        }
        web_sys::console::info_1(&format!("[map] event {}", event.name()).into());
    }

    fn on_effects(&self, effects: &[Effect], after: &MapState) {
        if effects.is_empty() {
            return;
        }
        let summary = after.scene().summary();
        web_sys::console::info_1(
            &format!(
                "[map] effects {effects:?} scale={:.2} markers={} icons={} labels={} bg={}",
                after.viewport().scale,
                summary.markers,
                summary.icons,
                summary.labels,
                summary.has_background,
            )
            .into(),
        );
    }

    fn drain_injected(&self) -> Vec<MapEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

/// Debug-mode keys: `D` swaps in a demo snapshot, `E` simulates a failed
/// fetch.
pub fn debug_action(key: &str, current: Option<&MapSnapshot>) -> Option<MapEvent> {
    match key {
        "D" => Some(MapEvent::FetchSucceeded {
            snapshot: Arc::new(demo_snapshot(current)),
            received_at: Utc::now(),
        }),
        "E" => Some(MapEvent::FetchFailed(MapError::Network(
            "injected failure".to_string(),
        ))),
        _ => None,
    }
}

/// The current snapshot plus a ring of fake players around the map center.
pub fn demo_snapshot(current: Option<&MapSnapshot>) -> MapSnapshot {
    let mut snapshot = current.cloned().unwrap_or_else(|| MapSnapshot {
        background_image_ref: String::new(),
        world_size: DEMO_WORLD_SIZE,
        entities: Vec::new(),
        monuments: vec![Monument {
            name: "Launch Site".to_string(),
            world_position: WorldPosition::new(-600.0, 0.0, 900.0),
            category: "monument".to_string(),
        }],
        server_label: String::new(),
        online_count: 0,
    });
    let radius = snapshot.world_size / 4.0;
    snapshot.entities.retain(|e| !e.id.starts_with("demo-"));
    for i in 0..DEMO_PLAYERS {
        let angle = TAU * i as f64 / DEMO_PLAYERS as f64;
        snapshot.entities.push(Entity {
            id: format!("demo-{i}"),
            display_name: format!("Demo {}", i + 1),
            avatar_ref: None,
            world_position: WorldPosition::new(radius * angle.cos(), 0.0, radius * angle.sin()),
            team_id: Some(format!("demo-team-{}", i % 2)),
        });
    }
    snapshot.online_count = snapshot.entities.len() as u32;
    snapshot.server_label = format!("{} (demo)", snapshot.server_label.trim_end_matches(" (demo)"))
        .trim_start()
        .to_string();
    snapshot
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// Warn at most once per guard for the page lifetime.
pub fn warn_once(guard: &AtomicBool, message: &str) {
    if guard
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn(message);
    }
}
