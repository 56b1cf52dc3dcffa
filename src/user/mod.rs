use axum::Router;

use crate::state::AppState;

pub mod dto;
mod error;
pub mod handlers;
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use error::RegisterError;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
