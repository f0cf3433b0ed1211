// src/handlers/categories.rs
// DOCUMENTATION: HTTP handlers for category pages
// PURPOSE: Parse requests, call the catalog service, return responses

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::errors::ExploraError;
use crate::models::{
    all_categories, CategoryListResponse, CategoryPageResponse, FocusResponse, NearestQuery,
    NearestResponse, SearchQuery, SearchResponse, DEFAULT_NEAREST_K,
};
use crate::services::geolocation::{ClientPosition, GeolocationError};
use crate::services::location_store::LocationStore;
use crate::services::map_view;
use crate::services::view::CategoryView;
use crate::services::CatalogService;

/// GET /categorias
/// List every category in display order
pub async fn list_categories() -> impl Responder {
    let categories = all_categories();
    HttpResponse::Ok().json(CategoryListResponse {
        data: categories,
        total_count: categories.len(),
    })
}

/// GET /categorias/{slug}
/// Category page: load state, locations and the map viewport
pub async fn get_category<S: LocationStore + 'static>(
    service: web::Data<CatalogService<S>>,
    path: web::Path<String>,
) -> Result<impl Responder, ExploraError> {
    let slug = path.into_inner();
    let view = load_view(&service, &slug).await?;

    let page = CategoryPageResponse::from_view(&view)
        .ok_or_else(|| ExploraError::CategoryNotFound(slug.clone()))?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /categorias/{slug}/search?q=
/// Filter a category's locations by name or description
pub async fn search_locations<S: LocationStore + 'static>(
    service: web::Data<CatalogService<S>>,
    path: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, ExploraError> {
    let mut view = CategoryView::default();
    let category = service.open(&mut view, &path.into_inner()).await?;
    let term = query.into_inner().q;

    let data = view.search(&term);
    Ok(HttpResponse::Ok().json(SearchResponse {
        category: category.id,
        query: term,
        total_count: data.len(),
        data,
    }))
}

/// GET /categorias/{slug}/nearest?lat=&lng=&k=&geo_error=
/// Locations closest to the caller. A missing position is reported inline
/// with an empty list, not as an error status.
pub async fn nearest_locations<S: LocationStore + 'static>(
    service: web::Data<CatalogService<S>>,
    path: web::Path<String>,
    query: web::Query<NearestQuery>,
) -> Result<impl Responder, ExploraError> {
    if let Err(e) = query.validate() {
        return Err(ExploraError::ValidationError(e.to_string()));
    }

    let category = service.category(&path.into_inner())?;
    let query = query.into_inner();

    let reported = match query.geo_error.as_deref() {
        Some(reason) => Some(GeolocationError::from_reason(reason).ok_or_else(|| {
            ExploraError::InvalidInput(format!("Unknown geolocation error: {}", reason))
        })?),
        None => None,
    };
    let position = ClientPosition::new(query.lat, query.lng, reported);

    let outcome = service
        .nearest(category, &position, query.k.unwrap_or(DEFAULT_NEAREST_K))
        .await;

    Ok(HttpResponse::Ok().json(NearestResponse {
        category: category.id,
        data: outcome.locations,
        message: outcome.geolocation_error.map(|e| e.user_message()),
        geolocation_error: outcome.geolocation_error,
    }))
}

/// GET /categorias/{slug}/markers
/// GeoJSON markers for every plottable location
pub async fn location_markers<S: LocationStore + 'static>(
    service: web::Data<CatalogService<S>>,
    path: web::Path<String>,
) -> Result<impl Responder, ExploraError> {
    let category = service.category(&path.into_inner())?;
    let records = service.load(category).await;

    Ok(HttpResponse::Ok().json(map_view::markers(&records)))
}

/// GET /categorias/{slug}/locais/{id}/focus
/// Viewport after selecting one location
pub async fn focus_location<S: LocationStore + 'static>(
    service: web::Data<CatalogService<S>>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, ExploraError> {
    let (slug, id) = path.into_inner();
    let mut view = load_view(&service, &slug).await?;

    let location = view
        .select(&id)
        .cloned()
        .ok_or_else(|| ExploraError::LocationNotFound(id.clone()))?;

    Ok(HttpResponse::Ok().json(FocusResponse {
        location,
        selected: view.selected().map(str::to_string),
        viewport: *view.map(),
    }))
}

/// Navigate a fresh view to `slug` and fill it from the service
async fn load_view<S: LocationStore>(
    service: &CatalogService<S>,
    slug: &str,
) -> Result<CategoryView, ExploraError> {
    let mut view = CategoryView::default();
    service.open(&mut view, slug).await?;
    Ok(view)
}

/// Configuration for category routes
pub fn config<S: LocationStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categorias")
            .route("", web::get().to(list_categories))
            .route("/{slug}", web::get().to(get_category::<S>))
            .route("/{slug}/search", web::get().to(search_locations::<S>))
            .route("/{slug}/nearest", web::get().to(nearest_locations::<S>))
            .route("/{slug}/markers", web::get().to(location_markers::<S>))
            .route(
                "/{slug}/locais/{id}/focus",
                web::get().to(focus_location::<S>),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::LocationCache;
    use crate::services::location_store::testing::StaticStore;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn store() -> StaticStore {
        StaticStore::new()
            .with(
                "Praias e Lagoas",
                "itauna",
                json!({
                    "name": "Praia de Itaúna",
                    "category": "Praias e Lagoas",
                    "coordinates": { "lat": -22.9336, "lng": -42.4839 }
                }),
            )
            .with(
                "Praias e Lagoas",
                "vila",
                json!({ "name": "Praia da Vila", "coordinates": "not json" }),
            )
    }

    fn service(store: StaticStore) -> web::Data<CatalogService<StaticStore>> {
        web::Data::new(CatalogService::new(
            store,
            Arc::new(LocationCache::in_memory()),
            Duration::from_millis(100),
        ))
    }

    async fn get_json(uri: &str, store: StaticStore) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(service(store))
                .configure(config::<StaticStore>),
        )
        .await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn test_list_categories() {
        let (status, body) = get_json("/categorias", StaticStore::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 12);
        assert_eq!(body["data"][0]["id"], "restaurantes");
    }

    #[actix_rt::test]
    async fn test_category_page() {
        let (status, body) = get_json("/categorias/praias", store()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"]["title"], "Praias e Lagoas");
        assert_eq!(body["state"], "loaded");
        assert_eq!(body["total_count"], 2);
        assert!(body["locations"][1].get("coordinates").is_none());
        assert_eq!(body["viewport"]["zoom"], 13);
    }

    #[actix_rt::test]
    async fn test_category_page_empty_when_store_fails() {
        let (status, body) = get_json("/categorias/trilhas", StaticStore::failing()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "empty");
        assert_eq!(body["locations"], json!([]));
    }

    #[actix_rt::test]
    async fn test_unknown_category_is_404() {
        let (status, body) = get_json("/categorias/cassinos", store()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "CATEGORY_NOT_FOUND");

        let (status, _) = get_json("/categorias/Praias", store()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_search() {
        let (status, body) = get_json("/categorias/praias/search?q=ITAUNA", store()).await;
        assert_eq!(status, StatusCode::OK);
        // accents are not folded, only case
        assert_eq!(body["total_count"], 0);

        let (_, body) = get_json("/categorias/praias/search?q=PRAIA", store()).await;
        assert_eq!(body["total_count"], 2);

        let (_, body) = get_json("/categorias/praias/search", store()).await;
        assert_eq!(body["query"], "");
        assert_eq!(body["total_count"], 2);
    }

    #[actix_rt::test]
    async fn test_nearest() {
        let (status, body) =
            get_json("/categorias/praias/nearest?lat=-22.93&lng=-42.49", store()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["id"], "itauna");
        assert!(body["data"][0]["distance"].as_f64().unwrap() < 2.0);
        assert!(body.get("geolocation_error").is_none());
    }

    #[actix_rt::test]
    async fn test_nearest_with_denied_permission() {
        let (status, body) = get_json(
            "/categorias/praias/nearest?geo_error=permission-denied",
            store(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["geolocation_error"], "permission-denied");
        assert!(body["message"].is_string());
    }

    #[actix_rt::test]
    async fn test_nearest_rejects_bad_input() {
        let (status, body) = get_json("/categorias/praias/nearest?lat=120&lng=0", store()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = get_json("/categorias/praias/nearest?k=0", store()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json("/categorias/praias/nearest?geo_error=bogus", store()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[actix_rt::test]
    async fn test_markers() {
        let (status, body) = get_json("/categorias/praias/markers", store()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().map(Vec::len), Some(1));
    }

    #[actix_rt::test]
    async fn test_focus() {
        let (status, body) = get_json("/categorias/praias/locais/itauna/focus", store()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"], "itauna");
        assert_eq!(body["viewport"]["zoom"], 16);

        let (status, body) = get_json("/categorias/praias/locais/vila/focus", store()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"], Value::Null);
        assert_eq!(body["viewport"]["zoom"], 13);

        let (status, body) = get_json("/categorias/praias/locais/nada/focus", store()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "LOCATION_NOT_FOUND");
    }
}
