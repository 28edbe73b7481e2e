use std::cell::RefCell;

use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use warden_shared::MapEvent;
use warden_shared::config::COUNTDOWN_INTERVAL_MS;

use crate::session::MapSession;

/// A DOM listener that detaches itself when dropped.
pub(crate) struct EventBinding {
    target: web_sys::EventTarget,
    event: &'static str,
    handler: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventBinding {
    pub(crate) fn listen(
        target: web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target,
            event,
            handler,
        })
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.handler.as_ref().unchecked_ref());
    }
}

struct LiveBindings {
    _refresh: Interval,
    _countdown: Interval,
    _visibility: Option<EventBinding>,
    _keydown: Option<EventBinding>,
}

thread_local! {
    static LIVE_BINDINGS: RefCell<Option<LiveBindings>> = const { RefCell::new(None) };
}

/// Map a key press to a view command.
pub fn key_event(key: &str) -> Option<MapEvent> {
    match key {
        "Escape" => Some(MapEvent::DismissSelection),
        "r" | "R" | "0" => Some(MapEvent::ResetView),
        _ => None,
    }
}

fn is_text_entry(event: &web_sys::Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
}

fn page_visible(document: Option<&web_sys::Document>) -> bool {
    document.is_none_or(|doc| !doc.hidden())
}

/// Start the refresh and countdown timers and the page listeners, then
/// announce the mount (which triggers the first fetch when visible).
/// Replaces any bindings left from a previous mount.
pub fn start(session: &MapSession) {
    stop();
    let Some(window) = web_sys::window() else {
        return;
    };
    let document = window.document();

    let refresh = {
        let session = session.clone();
        Interval::new(session.config().refresh_interval_ms, move || {
            session.dispatch(MapEvent::RefreshTick);
        })
    };
    let countdown = {
        let session = session.clone();
        Interval::new(COUNTDOWN_INTERVAL_MS, move || {
            session.dispatch(MapEvent::CountdownTick);
        })
    };

    let visibility = document.clone().and_then(|doc| {
        let session = session.clone();
        let watched = doc.clone();
        EventBinding::listen(doc.into(), "visibilitychange", move |_| {
            session.dispatch(MapEvent::VisibilityChanged {
                visible: page_visible(Some(&watched)),
            });
        })
    });

    let keydown = {
        let session = session.clone();
        EventBinding::listen(window.into(), "keydown", move |e| {
            if is_text_entry(&e) {
                return;
            }
            let Some(key) = e.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key()) else {
                return;
            };
            if let Some(event) = key_event(&key) {
                e.prevent_default();
                session.dispatch(event);
            } else if session.debug_key(&key) {
                e.prevent_default();
            }
        })
    };

    LIVE_BINDINGS.with(|slot| {
        *slot.borrow_mut() = Some(LiveBindings {
            _refresh: refresh,
            _countdown: countdown,
            _visibility: visibility,
            _keydown: keydown,
        });
    });

    session.dispatch(MapEvent::Mounted {
        visible: page_visible(document.as_ref()),
    });
}

/// Cancel timers and detach listeners.
pub fn stop() {
    LIVE_BINDINGS.with(|slot| {
        slot.borrow_mut().take();
    });
}

#[cfg(test)]
mod tests {
    use super::key_event;
    use warden_shared::MapEvent;

    #[test]
    fn escape_dismisses_selection() {
        assert!(matches!(key_event("Escape"), Some(MapEvent::DismissSelection)));
    }

    #[test]
    fn reset_keys() {
        for key in ["r", "R", "0"] {
            assert!(matches!(key_event(key), Some(MapEvent::ResetView)), "{key}");
        }
    }

    #[test]
    fn other_keys_ignored() {
        assert!(key_event("a").is_none());
        assert!(key_event("Enter").is_none());
    }
}
