pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use catalogo_core::Module;

pub use api::ApiSettings;
use service::CatalogoService;

/// Vehicle catalogue module: car brands and models.
pub struct VehiculosModule {
    service: Arc<CatalogoService>,
    settings: Arc<ApiSettings>,
}

impl VehiculosModule {
    pub fn new(service: CatalogoService, settings: ApiSettings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
        }
    }
}

impl Module for VehiculosModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone(), self.settings.clone(), &self.mount_path())
    }
}
