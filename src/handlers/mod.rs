pub mod contracts;

use std::sync::Arc;

use axum::{extract::FromRef, http::HeaderMap};
use tower_cookies::Cookies;

use crate::{
    config::Config,
    database::Database,
    error::ApiError,
    middleware::{get_current_user, CurrentUser},
    repository::PgStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> PgStore {
        PgStore::new(self.db.clone())
    }

    pub async fn authenticate(&self, cookies: &Cookies, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
        get_current_user(cookies, headers, &self.db, &self.config.jwt_secret)
            .await
            .ok_or(ApiError::Unauthorized)
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

pub async fn health(axum::extract::State(db): axum::extract::State<Database>) -> axum::http::StatusCode {
    match sqlx::query("SELECT 1").execute(&db).await {
        Ok(_) => axum::http::StatusCode::OK,
        Err(e) => {
            log::error!("Health check failed: {}", e);
            axum::http::StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
