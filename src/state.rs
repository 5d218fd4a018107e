//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El backend de persistencia y el motor de
//! resolución se construyen una sola vez al arranque y se inyectan acá;
//! ningún handler vuelve a decidir contra qué backend habla.

use std::sync::Arc;

use crate::config::environment::Config;
use crate::services::PlateResolver;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub resolver: Arc<PlateResolver>,
    pub config: Config,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, resolver: Arc<PlateResolver>, config: Config) -> Self {
        Self {
            storage,
            resolver,
            config,
        }
    }
}
