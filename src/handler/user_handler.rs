use crate::dto::user_dto::UserReadDto;
use crate::error::{api_error::ApiError, user_error::UserError};
use crate::middleware::auth::CurrentUser;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::response::app_response::SuccessResponse;
use crate::state::user_state::UserState;
use axum::extract::State;
use axum::Extension;

/// GET /api/user/me
///
/// The middleware only proves the access token; the account row is
/// loaded here so a user deleted after the token was issued gets 404.
pub async fn me(
    State(state): State<UserState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<SuccessResponse<UserReadDto>, ApiError> {
    let user = state
        .user_repo
        .find(current_user.user_id)
        .await?
        .ok_or(UserError::UserNotFound)?;

    if !user.is_verified {
        return Err(UserError::EmailNotVerified)?;
    }

    Ok(SuccessResponse::send(UserReadDto::from(user)))
}
