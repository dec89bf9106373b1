use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    database::Database,
    models::User,
    utils::verify_token,
};

pub const AUTH_COOKIE: &str = "auth_token";

/// The authenticated user a request acts as. `company_id` scopes every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub company_id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            company_id: user.company_id,
            email: user.email,
            name: user.name,
        }
    }
}

pub async fn get_current_user(
    cookies: &Cookies,
    headers: &HeaderMap,
    db: &Database,
    secret: &str,
) -> Option<CurrentUser> {
    // Cookie first, then a bearer token for API clients
    let token = match cookies.get(AUTH_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => bearer_token(headers)?,
    };

    let claims = match verify_token(&token, secret) {
        Ok(claims) => claims,
        Err(e) => {
            log::debug!("Rejected auth token: {}", e);
            return None;
        }
    };

    let user_id = claims.sub.parse::<i64>().ok()?;
    get_user_by_id(db, user_id).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

async fn get_user_by_id(db: &Database, user_id: i64) -> Option<CurrentUser> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = true")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(|e| log::error!("Failed to load user {}: {}", user_id, e))
        .ok()??;

    Some(CurrentUser::from(user))
}
