// src/api/dto/user_dto.rs
use crate::domain::user_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateUserDto {
    #[validate(
        length(
            min = common::username::MIN_LENGTH,
            max = common::username::MAX_LENGTH,
            message = "Username must be between 1 and 150 characters"
        ),
        custom(function = common::validate_username)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = common::validate_role))]
    pub role: Option<String>,

    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<user_model::Model> for UserDto {
    fn from(model: user_model::Model) -> Self {
        Self {
            role: model.user_role().as_str().to_string(),
            id: model.id,
            username: model.username,
            email: model.email,
            is_superuser: model.is_superuser,
            is_active: model.is_active,
            date_joined: model.date_joined,
        }
    }
}
