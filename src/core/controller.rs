//! Generic CRUD handlers.
//!
//! Each resource module mounts these once with its own `Resource` type.
//! This is the only layer that touches raw transport input: query strings
//! and bodies are validated here and handed to the repository as typed values.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::query::ResourceQuery;
use crate::core::traits::{Resource, ResourceRepository};
use crate::core::validation::Payload;

/// Repository handle stored in app data, one per resource
pub type SharedRepository<R> = Arc<dyn ResourceRepository<R>>;

/// GET /{resource}
pub async fn list<R: Resource>(
    repo: web::Data<SharedRepository<R>>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let query = ResourceQuery::from_params(&params, R::parse_filter)?;
    let page = repo.find(&query).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// POST /{resource}
pub async fn create<R: Resource>(
    repo: web::Data<SharedRepository<R>>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let body = Payload::parse_body(&body)?;
    let payload = R::parse_create(&body)?;
    let record = repo.create(payload).await?;

    tracing::info!(resource = R::PATH, "Record created");
    Ok(HttpResponse::Created().json(record))
}

/// PATCH|PUT /{resource}/{id}
pub async fn update<R: Resource>(
    repo: web::Data<SharedRepository<R>>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let body = Payload::parse_body(&body)?;
    let payload = R::parse_update(&body)?;
    let record = repo.update(id, payload).await?;

    tracing::info!(resource = R::PATH, id, "Record updated");
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /{resource}/{id}
pub async fn delete<R: Resource>(
    repo: web::Data<SharedRepository<R>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    repo.delete(id).await?;

    tracing::info!(resource = R::PATH, id, "Record deleted");
    Ok(HttpResponse::NoContent().finish())
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::invalid_field("id", "must be a positive integer id")),
    }
}

/// Register the repository and the CRUD routes for `R`
pub fn mount<R: Resource>(cfg: &mut web::ServiceConfig, repo: SharedRepository<R>) {
    cfg.app_data(web::Data::new(repo)).service(
        web::scope(&format!("/{}", R::PATH))
            .route("", web::get().to(list::<R>))
            .route("", web::post().to(create::<R>))
            .route("/{id}", web::patch().to(update::<R>))
            .route("/{id}", web::put().to(update::<R>))
            .route("/{id}", web::delete().to(delete::<R>)),
    );
}
