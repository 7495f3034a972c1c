use super::{auth, health, user};
use crate::config::database::Database;
use crate::config::tokens::TokenConfig;
use crate::error::api_error::ApiError;
use crate::middleware::auth as auth_middleware;
use crate::service::mail_service::MailService;
use crate::service::token_service::TokenService;
use crate::state::auth_state::AuthState;
use crate::state::token_state::TokenState;
use crate::state::user_state::UserState;
use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Assembles the application router. Fails fast when a token secret is
/// missing or too weak, before the server ever binds.
pub fn routes(db_conn: Arc<Database>) -> Result<Router, ApiError> {
    let token_config = TokenConfig::from_parameters()?;
    let token_service = TokenService::new(token_config);
    let mail_service = MailService::from_parameters()?;

    let auth_state = AuthState::new(&db_conn, token_service.clone(), mail_service);
    let user_state = UserState::new(&db_conn);
    let token_state = TokenState::new(token_service);

    let api_router = auth::routes().with_state(auth_state).merge(
        user::routes()
            .with_state(user_state)
            .layer(ServiceBuilder::new().layer(middleware::from_fn_with_state(
                token_state,
                auth_middleware::require_auth,
            ))),
    );

    let app_router = Router::new()
        .nest("/api", api_router)
        .merge(health::routes().with_state(db_conn))
        .layer(TraceLayer::new_for_http());

    Ok(app_router)
}
