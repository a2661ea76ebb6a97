use crate::core::{AppError, Result as AppResult};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error,
};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Bearer-token guard for mutating requests.
///
/// Reads (GET, HEAD, OPTIONS) pass through. Everything else must carry
/// `Authorization: Bearer <token>` matching the configured argon2 hash.
#[derive(Clone)]
pub struct AdminAuth {
    token_hash: Arc<str>,
}

impl AdminAuth {
    /// Fails when `token_hash` is not a PHC-formatted hash
    pub fn new(token_hash: &str) -> AppResult<Self> {
        PasswordHash::new(token_hash)
            .map_err(|e| AppError::Configuration(format!("Invalid ADMIN_TOKEN_HASH: {}", e)))?;

        Ok(Self {
            token_hash: Arc::from(token_hash),
        })
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            token_hash: self.token_hash.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    token_hash: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let token_hash = self.token_hash.clone();

        Box::pin(async move {
            if is_read(req.method()) {
                return svc.call(req).await;
            }

            let token = bearer_token(&req)
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing bearer token")))?;

            // argon2 verification is CPU-bound
            let verified = web::block(move || verify_token(&token, &token_hash))
                .await
                .map_err(|e| AppError::internal(format!("Token check aborted: {}", e)))??;

            if !verified {
                tracing::warn!(method = %req.method(), path = %req.path(), "Rejected admin token");
                return Err(AppError::unauthorized("Invalid bearer token").into());
            }

            svc.call(req).await
        })
    }
}

fn is_read(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Hash a token with Argon2 for `ADMIN_TOKEN_HASH`
pub fn hash_token(token: &str) -> AppResult<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash token: {}", e)))
}

/// Check a token against an Argon2 hash
pub fn verify_token(token: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(token.as_bytes(), &parsed_hash)
        .is_ok())
}
