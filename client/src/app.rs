use std::sync::Arc;

use chrono::Utc;
use leptos::prelude::*;
use warden_shared::{CommandSink, MapConfig, PollPhase};

use crate::canvas::MapCanvas;
use crate::live;
use crate::selection_panel::{HttpCommandSink, SelectionPanel};
use crate::session::MapSession;
use crate::time_format::{format_age, format_clock};

/// Settings from the page query string, e.g. `?server=eu-1&refresh_ms=3000&debug=1`.
fn config_from_location() -> MapConfig {
    let params = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
    match params {
        Some(params) => MapConfig::from_lookup(|key| params.get(key)),
        None => MapConfig::default(),
    }
}

fn countdown_label(phase: PollPhase, countdown: u8) -> String {
    match phase {
        PollPhase::Fetching => "Refreshing...".to_string(),
        PollPhase::Idle => format!("Next refresh in {countdown}s"),
    }
}

fn zoom_label(scale: f64) -> String {
    format!("{:.0}%", scale * 100.0)
}

#[component]
pub fn App() -> impl IntoView {
    let session = MapSession::new(config_from_location());
    let view = session.view();
    let command_status = RwSignal::new(None::<String>);
    let sink: Arc<dyn CommandSink> =
        Arc::new(HttpCommandSink::new(session.config(), command_status));

    // Timers and page listeners live exactly as long as the view.
    Effect::new({
        let session = session.clone();
        move || {
            live::start(&session);
            on_cleanup(live::stop);
        }
    });

    view! {
        <div style="display: flex; flex-direction: column; width: 100%; height: 100%; background: #0c0e17; color: #e6e4dc;">
            <header class="map-header">
                <span class="map-server">
                    {move || view.with(|v| v.server_label.clone().unwrap_or_else(|| "Connecting...".to_string()))}
                </span>
                <span class="map-online">
                    {move || view.with(|v| v.online_count.map(|n| format!("{n} online")).unwrap_or_default())}
                </span>
                <span class="map-countdown">
                    {move || view.with(|v| countdown_label(v.phase, v.countdown))}
                </span>
                // Re-evaluated on every countdown tick, which keeps the age fresh.
                <span class="map-updated">
                    {move || {
                        view.with(|v| {
                            v.last_update
                                .map(|at| format!("Updated {} ({})", format_age(at, Utc::now()), format_clock(at)))
                                .unwrap_or_default()
                        })
                    }}
                </span>
                <span class="map-zoom">{move || view.with(|v| zoom_label(v.scale))}</span>
                <span class="map-loading">
                    {move || view.with(|v| if v.loading_map { "Loading map..." } else { "" })}
                </span>
            </header>
            <div class="map-errors">
                {move || {
                    view.with(|v| {
                        v.errors
                            .iter()
                            .map(|message| view! { <p class="map-error">{message.clone()}</p> })
                            .collect_view()
                    })
                }}
            </div>
            <div style="position: relative; flex: 1; min-height: 0;">
                <MapCanvas session=session.clone() />
                <SelectionPanel session=session sink=sink status=command_status />
            </div>
        </div>
    }
}
