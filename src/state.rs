//! Shared application state for all routes.

use crate::service::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub service: MovieService,
}
