use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::user::{memory::InMemoryUserStore, repo::PgUserStore, repo::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Connects to Postgres, applies migrations and wires the user store.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(config).await?;
        db::migrate(&pool).await?;
        let users = Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>;
        Ok(Self::from_parts(users))
    }

    pub fn from_parts(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub fn in_memory() -> Self {
        Self::from_parts(Arc::new(InMemoryUserStore::new()))
    }
}
