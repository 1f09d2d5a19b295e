use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::error::ApiError;
use crate::models::{
    Coordinates, HealthResponse, MedicalStoresRequest, MedicalStoresResponse, PharmaciesQuery,
    PharmaciesResponse,
};
use crate::services::{FeatureResolver, GeocodeError, GeocoderClient, Resolution};
use std::sync::Arc;

/// Largest radius a caller may request on the coordinate route
pub const MAX_RADIUS_METERS: u32 = 50_000;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<GeocoderClient>,
    pub resolver: Arc<FeatureResolver>,
}

/// Configure all store lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/api/medical-stores", web::post().to(find_medical_stores))
        .route("/pharmacies", web::get().to(find_pharmacies));
}

/// Liveness endpoint
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("MediQuery backend running")
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find medical stores around a free-text location
///
/// POST /api/medical-stores
///
/// Request body:
/// ```json
/// { "location": "string" }
/// ```
///
/// An empty body or a non-JSON content type reads as a missing location.
/// When every Overpass mirror fails the response is still `200` with an
/// empty `stores` array.
async fn find_medical_stores(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let req = MedicalStoresRequest::from_body(http_req.content_type(), &body).map_err(|e| {
        tracing::info!("JSON payload error on {}: {}", http_req.path(), e);
        ApiError::Validation(format!("Invalid JSON: {}", e))
    })?;

    let location = match (req.validate(), req.location()) {
        (Ok(()), Some(location)) => location,
        _ => return Err(ApiError::Validation("Location is required".to_string())),
    };

    tracing::info!("Finding medical stores near: {}", location);

    let coords = match state.geocoder.resolve(location).await {
        Ok(Some(coords)) => coords,
        Ok(None) => {
            tracing::info!("No geocoding match for: {}", location);
            return Err(ApiError::NotFound("Location not found".to_string()));
        }
        Err(e @ GeocodeError::Timeout(_)) => {
            tracing::error!("Geocoding timed out for {}: {}", location, e);
            return Err(ApiError::Server("Server error occurred".to_string()));
        }
        Err(e) => {
            tracing::error!("Server error: {}", e);
            return Err(ApiError::Server("Server error occurred".to_string()));
        }
    };

    tracing::debug!("Resolved {} to ({}, {})", location, coords.lat, coords.lon);

    let stores = state
        .resolver
        .find_nearby(coords, state.resolver.default_radius_meters())
        .await;

    Ok(HttpResponse::Ok().json(MedicalStoresResponse { stores }))
}

/// Find pharmacies around raw coordinates
///
/// GET /pharmacies?lat={lat}&lng={lng}[&radius={meters}]
async fn find_pharmacies(
    state: web::Data<AppState>,
    query: web::Query<PharmaciesQuery>,
) -> Result<HttpResponse, ApiError> {
    let coords = parse_coordinates(&query)
        .ok_or_else(|| ApiError::Validation("Latitude and longitude are required".to_string()))?;

    let radius = match query.radius.as_deref() {
        None => state.resolver.default_radius_meters(),
        Some(raw) => parse_radius(raw).ok_or_else(|| {
            ApiError::Validation(format!(
                "Radius must be between 1 and {} meters",
                MAX_RADIUS_METERS
            ))
        })?,
    };

    match state.resolver.resolve(coords, radius).await {
        Resolution::Found { stores, .. } => {
            Ok(HttpResponse::Ok().json(PharmaciesResponse { pharmacies: stores }))
        }
        Resolution::Exhausted => {
            tracing::error!("No Overpass endpoint answered for ({}, {})", coords.lat, coords.lon);
            Err(ApiError::UpstreamUnavailable("Failed to fetch pharmacies".to_string()))
        }
    }
}

fn parse_coordinates(query: &PharmaciesQuery) -> Option<Coordinates> {
    let lat = query.lat.as_deref()?.trim().parse::<f64>().ok()?;
    let lon = query.lng.as_deref()?.trim().parse::<f64>().ok()?;

    Some(Coordinates::new(lat, lon)).filter(Coordinates::is_valid)
}

fn parse_radius(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|r| (1..=MAX_RADIUS_METERS).contains(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<&str>, lng: Option<&str>) -> PharmaciesQuery {
        PharmaciesQuery {
            lat: lat.map(str::to_string),
            lng: lng.map(str::to_string),
            radius: None,
        }
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(
            parse_coordinates(&query(Some("12.97"), Some("77.59"))),
            Some(Coordinates::new(12.97, 77.59))
        );
    }

    #[test]
    fn test_missing_or_invalid_coordinates() {
        assert!(parse_coordinates(&query(None, Some("77.59"))).is_none());
        assert!(parse_coordinates(&query(Some("12.97"), None)).is_none());
        assert!(parse_coordinates(&query(Some(""), Some("77.59"))).is_none());
        assert!(parse_coordinates(&query(Some("abc"), Some("77.59"))).is_none());
        assert!(parse_coordinates(&query(Some("95"), Some("77.59"))).is_none());
    }

    #[test]
    fn test_parse_radius_bounds() {
        assert_eq!(parse_radius("2000"), Some(2000));
        assert_eq!(parse_radius("0"), None);
        assert_eq!(parse_radius("50001"), None);
        assert_eq!(parse_radius("-5"), None);
    }
}
