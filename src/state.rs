use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::database::{DynStore, Store};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: Arc<TokenCodec>,
    pub store: DynStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: DynStore) -> Self {
        let codec = TokenCodec::new(&config.security.jwt_secret, config.security.jwt_expiry_hours);
        Self {
            config: Arc::new(config),
            codec: Arc::new(codec),
            store,
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
