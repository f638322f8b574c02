use memento_core::PreferenceStore;
use tracing::warn;
use web_sys::{Storage, Window};

/// `localStorage`, when the browser grants it. Without it preferences last for the page only.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            warn!("could not persist {key}: {e:?}");
        }
    }
}
