use std::cell::RefCell;

use crate::controller::{Effect, MapEvent, MapState};

/// Observer handed to [`crate::MapController`] at construction. Sees every
/// event before it is applied and the effects after.
pub trait DebugProbe {
    fn on_event(&self, _event: &MapEvent, _before: &MapState) {}
    fn on_effects(&self, _effects: &[Effect], _after: &MapState) {}

    /// Synthetic events to run through the reducer as if the page had sent
    /// them. Drained after every dispatched transition.
    fn drain_injected(&self) -> Vec<MapEvent> {
        Vec::new()
    }
}

pub struct NoopProbe;

impl DebugProbe for NoopProbe {}

/// Keeps a log of everything dispatched, for tests.
#[derive(Default)]
pub struct RecordingProbe {
    events: RefCell<Vec<String>>,
    effects: RefCell<Vec<Effect>>,
    injected: RefCell<Vec<MapEvent>>,
}

impl RecordingProbe {
    /// Queue an event for the controller's next drain.
    pub fn inject(&self, event: MapEvent) {
        self.injected.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.borrow().clone()
    }

    pub fn fetches(&self) -> usize {
        self.effects
            .borrow()
            .iter()
            .filter(|effect| matches!(effect, Effect::FetchSnapshot))
            .count()
    }
}

impl DebugProbe for RecordingProbe {
    fn on_event(&self, event: &MapEvent, _before: &MapState) {
        self.events.borrow_mut().push(event.name().to_string());
    }

    fn on_effects(&self, effects: &[Effect], _after: &MapState) {
        self.effects.borrow_mut().extend_from_slice(effects);
    }

    fn drain_injected(&self) -> Vec<MapEvent> {
        std::mem::take(&mut *self.injected.borrow_mut())
    }
}
