use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use warden_shared::{
    DebugProbe, Effect, MapConfig, MapController, MapEvent, MapView, NoopProbe, Scene,
};

use crate::api;
use crate::background::{ImageOutcome, ImageStore, load_image};
use crate::debug::{self, ConsoleProbe, DebugHandle, debug_action};

/// One mounted map view: the controller plus the browser side of its effects.
///
/// All input funnels through [`MapSession::dispatch`]; the reactive page only
/// ever reads the `view` and `frame` signals.
#[derive(Clone)]
pub struct MapSession {
    inner: Rc<SessionInner>,
}

struct SessionInner {
    config: Arc<MapConfig>,
    controller: RefCell<MapController>,
    images: ImageStore,
    view: RwSignal<MapView>,
    frame: RwSignal<u64>,
    debug: Option<DebugHandle>,
}

impl MapSession {
    pub fn new(config: MapConfig) -> Self {
        let (probe, debug): (Rc<dyn DebugProbe>, _) = if config.debug {
            let (console, handle) = ConsoleProbe::new();
            (Rc::new(console), Some(handle))
        } else {
            (Rc::new(NoopProbe), None)
        };
        let controller = MapController::new(&config, probe);
        let view = RwSignal::new(controller.state().view());
        Self {
            inner: Rc::new(SessionInner {
                config: Arc::new(config),
                controller: RefCell::new(controller),
                images: ImageStore::default(),
                view,
                frame: RwSignal::new(0),
                debug,
            }),
        }
    }

    pub fn config(&self) -> Arc<MapConfig> {
        self.inner.config.clone()
    }

    pub fn view(&self) -> RwSignal<MapView> {
        self.inner.view
    }

    /// Bumped on every redraw request.
    pub fn frame(&self) -> RwSignal<u64> {
        self.inner.frame
    }

    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }

    pub fn scene(&self) -> Scene {
        self.inner.controller.borrow().state().scene()
    }

    /// Drawing surface in CSS pixels.
    pub fn surface_size(&self) -> (f64, f64) {
        self.inner.controller.borrow().state().surface()
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.controller.borrow().state().is_dragging()
    }

    pub fn dispatch(&self, event: MapEvent) {
        self.advance(|controller| controller.dispatch(event));
    }

    /// Handle a debug-mode key by injecting through the console probe.
    /// Returns `false` when debug mode is off or the key means nothing.
    pub fn debug_key(&self, key: &str) -> bool {
        let Some(handle) = &self.inner.debug else {
            return false;
        };
        let event = {
            let controller = self.inner.controller.borrow();
            debug_action(key, controller.state().snapshot())
        };
        let Some(event) = event else {
            return false;
        };
        handle.inject(event);
        self.advance(MapController::pump);
        true
    }

    fn advance(&self, step: impl FnOnce(&mut MapController) -> Vec<Effect>) {
        let (effects, view) = {
            let mut controller = self.inner.controller.borrow_mut();
            let effects = step(&mut *controller);
            (effects, controller.state().view())
        };
        if self.inner.view.with_untracked(|current| *current != view) {
            self.inner.view.set(view);
        }
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&self, effect: Effect) {
        match effect {
            Effect::FetchSnapshot => {
                let session = self.clone();
                spawn_local(async move {
                    let event = match api::fetch_snapshot(&session.inner.config).await {
                        Ok(snapshot) => MapEvent::FetchSucceeded {
                            snapshot: Arc::new(snapshot),
                            received_at: chrono::Utc::now(),
                        },
                        Err(err) => MapEvent::FetchFailed(err),
                    };
                    session.dispatch(event);
                });
            }
            Effect::LoadImage(url) => {
                let session = self.clone();
                let requested = url.clone();
                load_image(self.inner.images.clone(), url, move |outcome| {
                    let event = match outcome {
                        ImageOutcome::Loaded { width, height } => MapEvent::ImageLoaded {
                            url: requested,
                            width,
                            height,
                        },
                        ImageOutcome::Failed(reason) => MapEvent::ImageFailed {
                            url: requested,
                            reason,
                        },
                    };
                    session.dispatch(event);
                });
            }
            Effect::Redraw => {
                let current = self
                    .inner
                    .controller
                    .borrow()
                    .state()
                    .background()
                    .current()
                    .map(|img| img.url.clone());
                if let Some(url) = current {
                    self.inner.images.retain_only(&url);
                }
                self.inner.frame.update(|n| *n = n.wrapping_add(1));
            }
            // The view signal already carries the new selection.
            Effect::SelectionChanged(_) => {}
            Effect::Report(err) => debug::warn(&format!("Map update failed: {err}")),
        }
    }
}
