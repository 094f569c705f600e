use std::sync::Arc;

use crate::store::ProductStore;
use crate::upload::UploadSettings;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub uploads: UploadSettings,
}
