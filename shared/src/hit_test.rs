use crate::projector::Projector;
use crate::snapshot::Entity;
use crate::viewport::Viewport;

/// Screen position of an entity, or `None` for unknown or out-of-world positions.
pub fn entity_screen_position(
    entity: &Entity,
    projector: &Projector,
    viewport: &Viewport,
) -> Option<(f64, f64)> {
    if !entity.has_known_position() {
        return None;
    }
    let pos = entity.world_position;
    let (bx, by) = projector.project(pos.x, pos.z)?;
    Some(viewport.to_screen(bx, by))
}

/// Nearest entity strictly within `radius_px` of the pointer.
/// Exact distance ties resolve to the earlier entity.
pub fn find_nearest<'a>(
    pointer: (f64, f64),
    entities: &'a [Entity],
    viewport: &Viewport,
    world_size: f64,
    canvas_size: (f64, f64),
    radius_px: f64,
) -> Option<&'a Entity> {
    let projector = Projector::new(world_size, canvas_size.0, canvas_size.1)?;

    let mut best: Option<(&Entity, f64)> = None;
    for entity in entities {
        let Some((sx, sy)) = entity_screen_position(entity, &projector, viewport) else {
            continue;
        };
        let dist = (sx - pointer.0).hypot(sy - pointer.1);
        if dist >= radius_px {
            continue;
        }
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((entity, dist));
        }
    }
    best.map(|(entity, _)| entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::entity;

    const CANVAS: (f64, f64) = (800.0, 800.0);

    #[test]
    fn finds_entity_at_its_pixel() {
        let entities = vec![entity("a", 1000.0, -500.0)];
        let vp = Viewport::default();
        let hit = find_nearest((600.0, 500.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("a"));
        let miss = find_nearest((0.0, 0.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(miss.is_none());
    }

    #[test]
    fn radius_boundary() {
        // 1 world unit == 0.2px on this canvas; entity sits at (600, 500).
        let entities = vec![entity("a", 1000.0, -500.0)];
        let vp = Viewport::default();
        let inside = find_nearest((619.9, 500.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(inside.is_some());
        let outside = find_nearest((620.1, 500.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(outside.is_none());
    }

    #[test]
    fn sentinel_is_never_hit() {
        // (0, 0) projects to the canvas center.
        let entities = vec![entity("ghost", 0.0, 0.0)];
        let vp = Viewport::default();
        let hit = find_nearest((400.0, 400.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(hit.is_none());
    }

    #[test]
    fn out_of_bounds_is_never_hit() {
        let entities = vec![entity("edge", 2100.0, 0.0)];
        let vp = Viewport::default();
        // Where it would land if it were projected.
        let hit = find_nearest((820.0, 400.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(hit.is_none());
    }

    #[test]
    fn picks_closest_and_first_on_tie() {
        // Pixels: far (600, 625), left (500, 500), right (700, 500).
        let entities = vec![
            entity("far", 1000.0, -1125.0),
            entity("left", 500.0, -500.0),
            entity("right", 1500.0, -500.0),
        ];
        let vp = Viewport::default();
        let hit = find_nearest((600.0, 500.0), &entities, &vp, 4000.0, CANVAS, 150.0);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("left"));
        let hit = find_nearest((600.0, 600.0), &entities, &vp, 4000.0, CANVAS, 150.0);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("far"));
    }

    #[test]
    fn follows_viewport_transform() {
        let entities = vec![entity("a", 1000.0, -500.0)];
        let mut vp = Viewport::default();
        vp.zoom_at(0.0, 0.0, 2.0);
        vp.pan(-100.0, 30.0);
        let hit = find_nearest((1100.0, 1030.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(hit.is_some());
        let stale = find_nearest((600.0, 500.0), &entities, &vp, 4000.0, CANVAS, 20.0);
        assert!(stale.is_none());
    }

    #[test]
    fn degenerate_world_size_hits_nothing() {
        let entities = vec![entity("a", 1.0, 1.0)];
        let vp = Viewport::default();
        assert!(find_nearest((400.0, 400.0), &entities, &vp, 0.0, CANVAS, 20.0).is_none());
    }
}
