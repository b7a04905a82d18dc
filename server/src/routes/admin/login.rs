use actix_web::{web::Json, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

use auth::{create_jwt, verify_admin_credentials, PrivateClaim};
use errors::Error;

use crate::validate::validate;

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = "1", message = "user_name is required"))]
    user_name: String,
    #[validate(length(min = "1", message = "password is required"))]
    password: String,
}

#[derive(Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login(params: Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    validate(&params)?;
    verify_admin_credentials(&params.user_name, &params.password)?;

    let token = create_jwt(PrivateClaim::new(params.user_name.clone()))?;
    info!("Admin {} logged in", params.user_name);

    Ok(Json(LoginResponse { token }))
}
