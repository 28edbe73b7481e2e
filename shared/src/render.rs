use crate::background::BackgroundImage;
use crate::colors::{entity_color, rgba_css, shift_lightness};
use crate::hit_test::entity_screen_position;
use crate::icons::icon_for;
use crate::projector::Projector;
use crate::snapshot::MapSnapshot;
use crate::viewport::Viewport;

pub const ENTITY_LABEL_MIN_SCALE: f64 = 0.6;
pub const MONUMENT_LABEL_MIN_SCALE: f64 = 1.2;
pub const MARKER_RADIUS_PX: f64 = 6.0;
pub const MARKER_HIGHLIGHT_RADIUS_PX: f64 = 2.0;
pub const SELECTION_RING_RADIUS_PX: f64 = 10.0;
pub const ICON_SIZE_PX: f64 = 18.0;
const ENTITY_LABEL_SIZE_PX: f64 = 12.0;
const MONUMENT_LABEL_SIZE_PX: f64 = 11.0;
const ENTITY_LABEL_GAP_PX: f64 = 10.0;
const MONUMENT_LABEL_GAP_PX: f64 = 14.0;

const ENTITY_LABEL_COLOR: &str = "rgba(255,255,255,0.95)";
const MONUMENT_LABEL_COLOR: &str = "rgba(245,222,160,0.92)";
const SELECTION_RING_COLOR: &str = "rgba(245,197,66,0.95)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Entity,
    Monument,
}

/// One canvas operation, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background {
        url: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Marker {
        entity_id: String,
        x: f64,
        y: f64,
        radius: f64,
        fill: String,
        outline: String,
        highlight: String,
    },
    SelectionRing {
        x: f64,
        y: f64,
        radius: f64,
        color: &'static str,
    },
    Icon {
        glyph: &'static str,
        x: f64,
        y: f64,
        size: f64,
    },
    Label {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        color: &'static str,
        role: LabelRole,
    },
}

/// Everything a frame depends on.
#[derive(Clone, Copy)]
pub struct SceneInput<'a> {
    pub snapshot: Option<&'a MapSnapshot>,
    pub viewport: &'a Viewport,
    /// Pixel space entities are projected into before the viewport applies.
    pub map_space: (f64, f64),
    /// Drawing area in CSS pixels.
    pub surface: (f64, f64),
    pub background: Option<&'a BackgroundImage>,
    pub selected: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub surface: (f64, f64),
    pub commands: Vec<DrawCommand>,
}

/// Lightweight counts for debug output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub markers: usize,
    pub icons: usize,
    pub labels: usize,
    pub has_background: bool,
}

impl Scene {
    pub fn summary(&self) -> SceneSummary {
        let mut summary = SceneSummary::default();
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Background { .. } => summary.has_background = true,
                DrawCommand::Marker { .. } => summary.markers += 1,
                DrawCommand::Icon { .. } => summary.icons += 1,
                DrawCommand::Label { .. } => summary.labels += 1,
                DrawCommand::SelectionRing { .. } => {}
            }
        }
        summary
    }
}

/// Build the draw list for one frame.
///
/// Layering, bottom to top: background, entity markers (each followed by its
/// label), monument icons (each followed by its label). Monuments sit above
/// players so points of interest stay readable in crowded areas.
pub fn build_scene(input: SceneInput<'_>) -> Scene {
    let SceneInput {
        snapshot,
        viewport: vp,
        map_space,
        surface,
        background,
        selected,
    } = input;
    let mut commands = Vec::new();

    if let Some(bg) = background {
        commands.push(DrawCommand::Background {
            url: bg.url.clone(),
            x: vp.offset_x,
            y: vp.offset_y,
            width: bg.width * vp.scale,
            height: bg.height * vp.scale,
        });
    }

    let projector = snapshot.and_then(|s| Projector::new(s.world_size, map_space.0, map_space.1));
    let (Some(snapshot), Some(projector)) = (snapshot, projector) else {
        return Scene { surface, commands };
    };

    let show_entity_labels = vp.scale >= ENTITY_LABEL_MIN_SCALE;
    for entity in &snapshot.entities {
        let Some((x, y)) = entity_screen_position(entity, &projector, vp) else {
            continue;
        };

        if selected == Some(entity.id.as_str()) {
            commands.push(DrawCommand::SelectionRing {
                x,
                y,
                radius: SELECTION_RING_RADIUS_PX,
                color: SELECTION_RING_COLOR,
            });
        }

        let base = entity_color(entity.team_id.as_deref());
        let outline = shift_lightness(base, -0.25);
        let highlight = shift_lightness(base, 0.3);
        commands.push(DrawCommand::Marker {
            entity_id: entity.id.clone(),
            x,
            y,
            radius: MARKER_RADIUS_PX,
            fill: rgba_css(base.0, base.1, base.2, 0.95),
            outline: rgba_css(outline.0, outline.1, outline.2, 1.0),
            highlight: rgba_css(highlight.0, highlight.1, highlight.2, 0.9),
        });

        if show_entity_labels {
            commands.push(DrawCommand::Label {
                text: entity.display_name.clone(),
                x,
                y: y - ENTITY_LABEL_GAP_PX,
                size: ENTITY_LABEL_SIZE_PX,
                color: ENTITY_LABEL_COLOR,
                role: LabelRole::Entity,
            });
        }
    }

    let show_monument_labels = vp.scale >= MONUMENT_LABEL_MIN_SCALE;
    for monument in &snapshot.monuments {
        let pos = monument.world_position;
        let Some((bx, by)) = projector.project(pos.x, pos.z) else {
            continue;
        };
        let (x, y) = vp.to_screen(bx, by);

        commands.push(DrawCommand::Icon {
            glyph: icon_for(&monument.name).glyph(),
            x,
            y,
            size: ICON_SIZE_PX,
        });

        if show_monument_labels {
            commands.push(DrawCommand::Label {
                text: monument.name.clone(),
                x,
                y: y + MONUMENT_LABEL_GAP_PX,
                size: MONUMENT_LABEL_SIZE_PX,
                color: MONUMENT_LABEL_COLOR,
                role: LabelRole::Monument,
            });
        }
    }

    Scene { surface, commands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::MonumentIcon;
    use crate::snapshot::fixtures::{entity, monument, snapshot};

    fn input<'a>(
        snap: Option<&'a MapSnapshot>,
        vp: &'a Viewport,
        bg: Option<&'a BackgroundImage>,
        selected: Option<&'a str>,
    ) -> SceneInput<'a> {
        SceneInput {
            snapshot: snap,
            viewport: vp,
            map_space: (800.0, 800.0),
            surface: (800.0, 800.0),
            background: bg,
            selected,
        }
    }

    fn marker_ids(scene: &Scene) -> Vec<&str> {
        scene
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Marker { entity_id, .. } => Some(entity_id.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_state_draws_nothing() {
        let vp = Viewport::default();
        let scene = build_scene(input(None, &vp, None, None));
        assert!(scene.commands.is_empty());
    }

    #[test]
    fn background_follows_viewport() {
        let bg = BackgroundImage {
            url: "/maps/4000.png".into(),
            width: 2000.0,
            height: 2000.0,
        };
        let vp = Viewport {
            offset_x: 15.0,
            offset_y: -40.0,
            scale: 0.5,
        };
        let scene = build_scene(input(None, &vp, Some(&bg), None));
        assert_eq!(
            scene.commands,
            vec![DrawCommand::Background {
                url: "/maps/4000.png".into(),
                x: 15.0,
                y: -40.0,
                width: 1000.0,
                height: 1000.0,
            }]
        );
    }

    #[test]
    fn markers_keep_screen_size_on_a_large_map() {
        // A 2048 px map fitted onto an 800 px surface.
        let snap = snapshot(vec![entity("a", 1000.0, -500.0)], Vec::new());
        let bg = BackgroundImage {
            url: "/maps/4000.png".into(),
            width: 2048.0,
            height: 2048.0,
        };
        let vp = Viewport::fitted((2048.0, 2048.0), (800.0, 800.0)).unwrap();
        let scene = build_scene(SceneInput {
            map_space: (2048.0, 2048.0),
            ..input(Some(&snap), &vp, Some(&bg), None)
        });
        assert_eq!(scene.surface, (800.0, 800.0));
        let marker = scene.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Marker { x, y, radius, .. } => Some((*x, *y, *radius)),
            _ => None,
        });
        assert_eq!(marker, Some((600.0, 500.0, MARKER_RADIUS_PX)));
    }

    #[test]
    fn sentinel_and_out_of_bounds_entities_are_skipped() {
        let snap = snapshot(
            vec![
                entity("ghost", 0.0, 0.0),
                entity("edge", 0.0, 2500.0),
                entity("live", 1000.0, -500.0),
            ],
            vec![monument("Far Away", 9000.0, 0.0)],
        );
        let vp = Viewport::default();
        let scene = build_scene(input(Some(&snap), &vp, None, None));
        assert_eq!(marker_ids(&scene), ["live"]);
        assert_eq!(scene.summary().icons, 0);
        match &scene.commands[0] {
            DrawCommand::Marker { x, y, .. } => {
                assert_eq!((*x, *y), (600.0, 500.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn entities_are_drawn_below_monuments() {
        let snap = snapshot(
            vec![entity("a", 100.0, 100.0), entity("b", -100.0, 100.0)],
            vec![monument("Large Oil Rig", 105.0, 100.0)],
        );
        let vp = Viewport {
            scale: 1.5,
            ..Viewport::default()
        };
        let scene = build_scene(input(Some(&snap), &vp, None, None));
        let last_marker = scene
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Marker { .. }))
            .unwrap();
        let first_icon = scene
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Icon { .. }))
            .unwrap();
        assert!(last_marker < first_icon);
        assert_eq!(marker_ids(&scene), ["a", "b"]);
    }

    #[test]
    fn label_thresholds_follow_scale() {
        let snap = snapshot(
            vec![entity("a", 100.0, 100.0)],
            vec![monument("Launch Site", -300.0, 200.0)],
        );

        let labels_at = |scale: f64| {
            let vp = Viewport {
                scale,
                ..Viewport::default()
            };
            build_scene(input(Some(&snap), &vp, None, None))
                .commands
                .into_iter()
                .filter_map(|c| match c {
                    DrawCommand::Label { role, .. } => Some(role),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };

        assert!(labels_at(0.59).is_empty());
        assert_eq!(labels_at(0.6), [LabelRole::Entity]);
        assert_eq!(labels_at(1.19), [LabelRole::Entity]);
        assert_eq!(labels_at(1.2), [LabelRole::Entity, LabelRole::Monument]);
    }

    #[test]
    fn monument_icon_uses_lookup() {
        let snap = snapshot(
            Vec::new(),
            vec![
                monument("Small Oil Rig Exterior", 10.0, 10.0),
                monument("Nameless Rock", 20.0, 20.0),
            ],
        );
        let vp = Viewport::default();
        let glyphs: Vec<_> = build_scene(input(Some(&snap), &vp, None, None))
            .commands
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Icon { glyph, .. } => Some(glyph),
                _ => None,
            })
            .collect();
        assert_eq!(
            glyphs,
            [MonumentIcon::OilRig.glyph(), MonumentIcon::Pin.glyph()]
        );
    }

    #[test]
    fn selection_ring_precedes_selected_marker() {
        let snap = snapshot(
            vec![entity("a", 100.0, 100.0), entity("b", 200.0, 100.0)],
            Vec::new(),
        );
        let vp = Viewport::default();
        let scene = build_scene(input(Some(&snap), &vp, None, Some("b")));
        let rings: Vec<_> = scene
            .commands
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, DrawCommand::SelectionRing { .. }))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(rings.len(), 1);
        assert!(matches!(
            &scene.commands[rings[0] + 1],
            DrawCommand::Marker { entity_id, .. } if entity_id == "b"
        ));
    }

    #[test]
    fn rendering_is_idempotent() {
        let snap = snapshot(
            vec![entity("a", 100.0, 100.0), entity("b", -640.0, 1200.0)],
            vec![monument("Airfield", 0.0, 300.0)],
        );
        let bg = BackgroundImage {
            url: "/maps/4000.png".into(),
            width: 800.0,
            height: 800.0,
        };
        let vp = Viewport {
            offset_x: -20.0,
            offset_y: 7.0,
            scale: 1.4,
        };
        let first = build_scene(input(Some(&snap), &vp, Some(&bg), Some("a")));
        let second = build_scene(input(Some(&snap), &vp, Some(&bg), Some("a")));
        assert_eq!(first, second);
        assert_eq!(
            first.summary(),
            SceneSummary {
                markers: 2,
                icons: 1,
                labels: 3,
                has_background: true,
            }
        );
    }
}
