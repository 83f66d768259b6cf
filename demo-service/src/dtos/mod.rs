use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{NewUser, User};

/// Wire form of a user, used for create requests and read responses.
///
/// The id never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserDto {
    // Missing and blank names fail the same validation.
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

impl UserDto {
    pub fn into_new_user(self) -> NewUser {
        NewUser::new(self.name)
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self { name: user.name }
    }
}

/// JSON envelope for every greeting endpoint reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOutput {
    pub message: String,
}

impl MessageOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GreetingParams {
    pub name: Option<String>,
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
