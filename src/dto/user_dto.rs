use crate::entity::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserDto {
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginUserDto {
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body for forgot-password and resend-verification requests.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct EmailRequestDto {
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordDto {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(Clone, Deserialize)]
pub struct VerifyEmailQueryDto {
    pub token: String,
}

/// Public user fields; never carries the password hash.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserReadDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl UserReadDto {
    pub fn from(model: User) -> UserReadDto {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}

impl std::fmt::Debug for LoginUserDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User").field("email", &self.email).finish()
    }
}

impl std::fmt::Debug for RegisterUserDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish()
    }
}
