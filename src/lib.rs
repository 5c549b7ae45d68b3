//! Movie CRUD REST service backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use model::{Movie, MoviePayload};
pub use routes::{common_routes, movie_routes};
pub use service::MovieService;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, MovieStore, PgMovieStore};
