use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::AppState;
use crate::error::AppError;
use crate::validation;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Body of both `POST /user` and `POST /user/login`.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

pub async fn create_user(
    req: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for username: {}", req.username);
    validation::credentials(&req.username, &req.password)?;

    match state.auth_service.register(&req.username, &req.password).await {
        Ok(reference) => {
            info!("Registration successful for username: {}", req.username);
            Ok(HttpResponse::Created().json(reference))
        }
        Err(e) => {
            warn!("Registration failed for username: {}: {}", req.username, e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for username: {}", req.username);
    validation::credentials(&req.username, &req.password)?;

    match state.auth_service.login(&req.username, &req.password).await {
        Ok((principal, token)) => {
            info!("Login successful for username: {}", req.username);
            Ok(HttpResponse::Ok()
                .insert_header((AUTH_TOKEN_HEADER, format!("Bearer {}", token)))
                .json(principal))
        }
        Err(e) => {
            warn!("Login failed for username: {}: {}", req.username, e);
            Err(e)
        }
    }
}
