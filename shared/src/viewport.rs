pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Pan/zoom transform applied on top of the projected canvas.
/// `screen = base * scale + offset`, where `base` is a projector pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Convert base canvas coordinates to screen coordinates.
    pub fn to_screen(&self, bx: f64, by: f64) -> (f64, f64) {
        (
            bx * self.scale + self.offset_x,
            by * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to base canvas coordinates.
    pub fn to_base(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Scale by `factor` around a screen-space anchor.
    pub fn zoom_at(&mut self, anchor_x: f64, anchor_y: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        // Adjust offset so the point under the cursor stays fixed
        self.offset_x = anchor_x - (anchor_x - self.offset_x) * ratio;
        self.offset_y = anchor_y - (anchor_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The view that shows all of `content` centered on `surface`, or `None`
    /// when either size is empty.
    pub fn fitted(content: (f64, f64), surface: (f64, f64)) -> Option<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(content.0) && positive(content.1) && positive(surface.0) && positive(surface.1)) {
            return None;
        }
        let scale = (surface.0 / content.0)
            .min(surface.1 / content.1)
            .clamp(MIN_SCALE, MAX_SCALE);
        Some(Self {
            offset_x: (surface.0 - content.0 * scale) / 2.0,
            offset_y: (surface.1 - content.1 * scale) / 2.0,
            scale,
        })
    }
}

/// Wheel scroll down zooms out, scroll up zooms in.
pub fn wheel_factor(delta_y: f64) -> Option<f64> {
    if delta_y > 0.0 {
        Some(WHEEL_ZOOM_OUT)
    } else if delta_y < 0.0 {
        Some(WHEEL_ZOOM_IN)
    } else {
        None
    }
}
