pub mod background;
pub mod colors;
pub mod commands;
pub mod config;
pub mod controller;
pub mod debug;
pub mod error;
pub mod hit_test;
pub mod icons;
pub mod poller;
pub mod projector;
pub mod render;
pub mod selection;
pub mod snapshot;
pub mod viewport;

pub use background::{BackgroundImage, BackgroundState};
pub use colors::{entity_color, team_color};
pub use commands::{CommandSink, ModerationCommand};
pub use config::MapConfig;
pub use controller::{Effect, MapController, MapEvent, MapState, MapView, reduce};
pub use debug::{DebugProbe, NoopProbe};
pub use error::{ErrorKind, MapError};
pub use icons::{MonumentIcon, icon_for};
pub use poller::PollPhase;
pub use projector::Projector;
pub use render::{DrawCommand, LabelRole, Scene, SceneSummary, build_scene};
pub use selection::Selection;
pub use snapshot::{Entity, MapSnapshot, Monument, WorldPosition};
pub use viewport::Viewport;
