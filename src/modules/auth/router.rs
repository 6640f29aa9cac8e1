use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_profile, login_user, register_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/me", get(get_profile))
}
