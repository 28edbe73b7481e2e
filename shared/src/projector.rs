/// Map world `(x, z)` to canvas pixels. World origin is the center of the
/// square; world Z grows toward the top of the screen.
pub fn world_to_canvas(
    world_x: f64,
    world_z: f64,
    world_size: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> (f64, f64) {
    let half = world_size / 2.0;
    (
        (half + world_x) / world_size * canvas_w,
        (half - world_z) / world_size * canvas_h,
    )
}

/// Inverse of [`world_to_canvas`].
pub fn canvas_to_world(
    px: f64,
    py: f64,
    world_size: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> (f64, f64) {
    let half = world_size / 2.0;
    (
        px / canvas_w * world_size - half,
        half - py / canvas_h * world_size,
    )
}

/// Projection for one `(world_size, canvas size)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    world_size: f64,
    canvas_w: f64,
    canvas_h: f64,
}

impl Projector {
    /// `None` when the world size or canvas is degenerate.
    pub fn new(world_size: f64, canvas_w: f64, canvas_h: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(world_size) || !valid(canvas_w) || !valid(canvas_h) {
            return None;
        }
        Some(Self {
            world_size,
            canvas_w,
            canvas_h,
        })
    }

    pub fn contains(&self, world_x: f64, world_z: f64) -> bool {
        let half = self.world_size / 2.0;
        world_x.abs() <= half && world_z.abs() <= half
    }

    /// Canvas pixel for a world point, or `None` if it lies outside the world.
    pub fn project(&self, world_x: f64, world_z: f64) -> Option<(f64, f64)> {
        if !self.contains(world_x, world_z) {
            return None;
        }
        Some(world_to_canvas(
            world_x,
            world_z,
            self.world_size,
            self.canvas_w,
            self.canvas_h,
        ))
    }

    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        canvas_to_world(px, py, self.world_size, self.canvas_w, self.canvas_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn projects_known_point() {
        let (px, py) = world_to_canvas(1000.0, -500.0, 4000.0, 800.0, 800.0);
        assert_close(px, 600.0);
        assert_close(py, 500.0);
    }

    #[test]
    fn corners_map_to_canvas_corners() {
        let p = Projector::new(3000.0, 1024.0, 768.0).unwrap();
        let (x0, y0) = p.project(-1500.0, 1500.0).unwrap();
        assert_close(x0, 0.0);
        assert_close(y0, 0.0);
        let (x1, y1) = p.project(1500.0, -1500.0).unwrap();
        assert_close(x1, 1024.0);
        assert_close(y1, 768.0);
    }

    #[test]
    fn round_trip_inside_bounds() {
        let p = Projector::new(4250.0, 911.0, 640.0).unwrap();
        let steps = 24;
        for i in 0..=steps {
            for j in 0..=steps {
                let x = -2125.0 + 4250.0 * i as f64 / steps as f64;
                let z = -2125.0 + 4250.0 * j as f64 / steps as f64;
                let (px, py) = p.project(x, z).unwrap();
                let (wx, wz) = p.unproject(px, py);
                assert!((wx - x).abs() < 1e-6, "x {x} -> {wx}");
                assert!((wz - z).abs() < 1e-6, "z {z} -> {wz}");
            }
        }
    }

    #[test]
    fn out_of_bounds_is_not_projected() {
        let p = Projector::new(4000.0, 800.0, 800.0).unwrap();
        assert!(p.project(2000.1, 0.0).is_none());
        assert!(p.project(0.0, -2000.1).is_none());
        assert!(p.project(2000.0, -2000.0).is_some());
    }

    #[test]
    fn degenerate_inputs_rejected() {
        assert!(Projector::new(0.0, 800.0, 800.0).is_none());
        assert!(Projector::new(-10.0, 800.0, 800.0).is_none());
        assert!(Projector::new(f64::NAN, 800.0, 800.0).is_none());
        assert!(Projector::new(4000.0, 0.0, 800.0).is_none());
    }
}
