/// A decoded background image, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub url: String,
    pub width: f64,
    pub height: f64,
}

/// Double-buffered background: the current image stays on screen until the
/// pending one has fully decoded, then they swap in one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundState {
    current: Option<BackgroundImage>,
    pending: Option<String>,
}

impl BackgroundState {
    pub fn current(&self) -> Option<&BackgroundImage> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Note the URL a snapshot wants. Returns `true` when a new load must start.
    pub fn request(&mut self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        if self.current.as_ref().is_some_and(|img| img.url == url) {
            self.pending = None;
            return false;
        }
        if self.pending.as_deref() == Some(url) {
            return false;
        }
        self.pending = Some(url.to_string());
        true
    }

    /// Swap in a decoded image. Returns `false` for decodes nobody is waiting on.
    pub fn loaded(&mut self, url: &str, width: f64, height: f64) -> bool {
        if self.pending.as_deref() != Some(url) {
            return false;
        }
        self.pending = None;
        self.current = Some(BackgroundImage {
            url: url.to_string(),
            width,
            height,
        });
        true
    }

    /// Drop a failed pending load; the current image stays.
    pub fn failed(&mut self, url: &str) -> bool {
        if self.pending.as_deref() != Some(url) {
            return false;
        }
        self.pending = None;
        true
    }
}
