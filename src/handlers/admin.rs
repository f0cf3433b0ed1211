// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for cache maintenance
// PURPOSE: Inspect and drop cached category data via REST endpoints

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::config::Config;
use crate::errors::ExploraError;
use crate::models::find_category;
use crate::services::LocationCache;

/// GET /admin/cache/stats
/// Cache entry counts
pub async fn cache_stats(
    config: web::Data<Config>,
    cache: web::Data<Arc<LocationCache>>,
    req: HttpRequest,
) -> Result<impl Responder, ExploraError> {
    verify_admin_token(&req, &config)?;

    Ok(HttpResponse::Ok().json(cache.stats().await))
}

/// DELETE /admin/cache
/// Drop every cached category
pub async fn clear_cache(
    config: web::Data<Config>,
    cache: web::Data<Arc<LocationCache>>,
    req: HttpRequest,
) -> Result<impl Responder, ExploraError> {
    verify_admin_token(&req, &config)?;

    log::info!("Admin cache clear requested");
    cache.clear().await;

    Ok(HttpResponse::Ok().json(json!({ "message": "Cache cleared" })))
}

/// DELETE /admin/cache/{slug}
/// Drop one category and ignore any fetch still running for it
pub async fn invalidate_category(
    config: web::Data<Config>,
    cache: web::Data<Arc<LocationCache>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, ExploraError> {
    verify_admin_token(&req, &config)?;

    let slug = path.into_inner();
    let category = find_category(&slug).ok_or_else(|| ExploraError::CategoryNotFound(slug))?;

    cache.invalidate(category.id).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Category cache invalidated",
        "category": category.id,
    })))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), ExploraError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            ExploraError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(ExploraError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache/stats", web::get().to(cache_stats))
            .route("/cache", web::delete().to(clear_cache))
            .route("/cache/{slug}", web::delete().to(invalidate_category)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationRecord;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    async fn seeded_cache() -> Arc<LocationCache> {
        let cache = Arc::new(LocationCache::in_memory());
        cache.put("praias", &[LocationRecord::empty("itauna")]).await;
        cache.put("trilhas", &[LocationRecord::empty("pedra")]).await;
        cache
    }

    macro_rules! admin_app {
        ($cache:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Config::for_tests("http://localhost")))
                    .app_data(web::Data::new($cache.clone()))
                    .configure(config),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_requires_token() {
        let cache = seeded_cache().await;
        let app = admin_app!(cache);

        let req = test::TestRequest::get().uri("/admin/cache/stats").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/admin/cache/stats")
            .insert_header(("X-Admin-Token", "wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_stats_and_invalidate() {
        let cache = seeded_cache().await;
        let app = admin_app!(cache);

        let req = test::TestRequest::get()
            .uri("/admin/cache/stats")
            .insert_header(("X-Admin-Token", "admin-secret"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_entries"], 2);
        assert_eq!(body["active_entries"], 2);

        let req = test::TestRequest::delete()
            .uri("/admin/cache/praias")
            .insert_header(("X-Admin-Token", "admin-secret"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "praias");
        assert!(cache.get("praias").await.is_none());
        assert!(cache.get("trilhas").await.is_some());
    }

    #[actix_rt::test]
    async fn test_invalidate_unknown_category() {
        let cache = seeded_cache().await;
        let app = admin_app!(cache);

        let req = test::TestRequest::delete()
            .uri("/admin/cache/cassinos")
            .insert_header(("X-Admin-Token", "admin-secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_clear() {
        let cache = seeded_cache().await;
        let app = admin_app!(cache);

        let req = test::TestRequest::delete()
            .uri("/admin/cache")
            .insert_header(("X-Admin-Token", "admin-secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
