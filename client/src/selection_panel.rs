use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use warden_shared::{CommandSink, Entity, MapConfig, MapEvent, ModerationCommand};

use crate::api;
use crate::debug;
use crate::session::MapSession;

const DEFAULT_REASON: &str = "Moderator action";
const MUTE_MINUTES: u32 = 10;

fn reason_or_default(reason: &str) -> String {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        DEFAULT_REASON.to_string()
    } else {
        trimmed.to_string()
    }
}

fn describe(command: &ModerationCommand) -> String {
    format!("{} sent for {}", command.action(), command.target_id())
}

fn team_label(entity: &Entity) -> String {
    match entity.team_id.as_deref() {
        Some(team) if !team.is_empty() => format!("Team {team}"),
        _ => "Solo".to_string(),
    }
}

/// Sends commands to the moderation endpoint and reports the outcome in `status`.
#[derive(Clone)]
pub struct HttpCommandSink {
    config: Arc<MapConfig>,
    status: RwSignal<Option<String>>,
}

impl HttpCommandSink {
    pub fn new(config: Arc<MapConfig>, status: RwSignal<Option<String>>) -> Self {
        Self { config, status }
    }
}

impl CommandSink for HttpCommandSink {
    fn submit(&self, command: ModerationCommand) {
        let config = self.config.clone();
        let status = self.status;
        status.set(Some(format!("Sending {}...", command.action())));
        spawn_local(async move {
            match api::send_command(&config, &command).await {
                Ok(()) => status.set(Some(describe(&command))),
                Err(err) => {
                    debug::warn(&format!(
                        "{} for {} failed: {err}",
                        command.action(),
                        command.target_id()
                    ));
                    status.set(Some(format!("{} failed: {err}", command.action())));
                }
            }
        });
    }
}

/// Details and actions for the selected player. Hidden while nothing is selected.
#[component]
pub fn SelectionPanel(
    session: MapSession,
    sink: Arc<dyn CommandSink>,
    status: RwSignal<Option<String>>,
) -> impl IntoView {
    let view = session.view();
    let reason = RwSignal::new(String::new());

    let command_button = |label: &'static str, build: fn(&Entity, &str) -> ModerationCommand| {
        let sink = sink.clone();
        view! {
            <button
                class="selection-action"
                on:click=move |_| {
                    let Some(target) = view.with_untracked(|v| v.selected.clone()) else {
                        return;
                    };
                    sink.submit(build(&target, &reason_or_default(&reason.get_untracked())));
                }
            >
                {label}
            </button>
        }
    };

    let teleport = command_button("Teleport", |e, _| ModerationCommand::teleport(e));
    let mute = command_button("Mute", |e, _| ModerationCommand::mute(e, MUTE_MINUTES));
    let kick = command_button("Kick", |e, r| ModerationCommand::kick(e, r));
    let ban = command_button("Ban", |e, r| ModerationCommand::ban(e, r));

    let field = move |read: fn(&Entity) -> String| {
        move || view.with(|v| v.selected.as_ref().map(read).unwrap_or_default())
    };

    view! {
        <aside
            class="selection-panel"
            style:display=move || if view.with(|v| v.selected.is_some()) { "block" } else { "none" }
        >
            <header class="selection-header">
                <img
                    class="selection-avatar"
                    src=move || view.with(|v| v.selected.as_ref().and_then(|e| e.avatar_ref.clone()).unwrap_or_default())
                    style:display=move || {
                        if view.with(|v| v.selected.as_ref().is_some_and(|e| e.avatar_ref.is_some())) {
                            "inline-block"
                        } else {
                            "none"
                        }
                    }
                />
                <strong>{field(|e| e.display_name.clone())}</strong>
                <button
                    class="selection-close"
                    title="Close (Esc)"
                    on:click=move |_| session.dispatch(MapEvent::DismissSelection)
                >
                    "x"
                </button>
            </header>
            <dl class="selection-details">
                <dt>"ID"</dt>
                <dd>{field(|e| e.id.clone())}</dd>
                <dt>"Team"</dt>
                <dd>{field(team_label)}</dd>
                <dt>"Position"</dt>
                <dd>
                    {field(|e| {
                        let p = e.world_position;
                        format!("x {:.0}, z {:.0}", p.x, p.z)
                    })}
                </dd>
            </dl>
            <input
                class="selection-reason"
                type="text"
                placeholder=DEFAULT_REASON
                prop:value=move || reason.get()
                on:input=move |ev| reason.set(event_target_value(&ev))
            />
            <div class="selection-actions">{teleport} {mute} {kick} {ban}</div>
            <p class="selection-status">{move || status.get().unwrap_or_default()}</p>
        </aside>
    }
}
