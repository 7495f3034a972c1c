use crate::handler::user_handler;
use crate::state::user_state::UserState;
use axum::{routing::get, Router};

/// Routes behind the strict auth middleware; the layer is applied by the
/// root router so the gate and the routes stay in one place there.
pub fn routes() -> Router<UserState> {
    Router::<UserState>::new().route("/user/me", get(user_handler::me))
}
