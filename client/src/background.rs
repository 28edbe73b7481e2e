use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use web_sys::HtmlImageElement;

/// Decoded map images by URL. Holds the on-screen image plus any in-flight
/// replacement until the swap completes.
#[derive(Clone, Default)]
pub struct ImageStore {
    images: Rc<RefCell<HashMap<String, HtmlImageElement>>>,
}

impl ImageStore {
    pub fn get(&self, url: &str) -> Option<HtmlImageElement> {
        self.images.borrow().get(url).cloned()
    }

    fn insert(&self, url: String, image: HtmlImageElement) {
        self.images.borrow_mut().insert(url, image);
    }

    /// Drop everything except `url`.
    pub fn retain_only(&self, url: &str) {
        self.images.borrow_mut().retain(|key, _| key == url);
    }
}

pub enum ImageOutcome {
    Loaded { width: f64, height: f64 },
    Failed(String),
}

/// Load and fully decode `url` off-screen, then report the natural size.
/// The image is stored before `done` runs so the next frame can draw it.
pub fn load_image(store: ImageStore, url: String, done: impl FnOnce(ImageOutcome) + 'static) {
    wasm_bindgen_futures::spawn_local(async move {
        let Ok(image) = HtmlImageElement::new() else {
            done(ImageOutcome::Failed("could not create image element".into()));
            return;
        };
        image.set_src(&url);
        match wasm_bindgen_futures::JsFuture::from(image.decode()).await {
            Ok(_) => {
                let width = image.natural_width() as f64;
                let height = image.natural_height() as f64;
                if width <= 0.0 || height <= 0.0 {
                    done(ImageOutcome::Failed("image has no size".into()));
                    return;
                }
                store.insert(url, image);
                done(ImageOutcome::Loaded { width, height });
            }
            Err(err) => done(ImageOutcome::Failed(describe_js_error(&err))),
        }
    });
}

pub(crate) fn describe_js_error(err: &wasm_bindgen::JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &"message".into())
                .ok()
                .and_then(|v| v.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
