use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use chrono::Duration;
use faceseek_core::{Error, SearchPipeline, Vector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

#[derive(Deserialize)]
struct SearchRequest {
    /// Query embedding from the upstream face detector. Absent or empty
    /// means no face was detected.
    embedding: Option<Vec<f32>>,
}

#[derive(Serialize)]
struct CachedResultsResponse {
    query_id: String,
    face_ids: Vec<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(pipeline: Arc<SearchPipeline>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(pipeline.clone()))
                .route("/api/v1/health", web::get().to(health))
                .route("/api/v1/search", web::post().to(search))
                .route("/api/v1/results/{query_id}", web::get().to(cached_results))
                .route("/api/v1/stats", web::get().to(stats))
                .route("/api/v1/recent-searches", web::get().to(recent_searches))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

async fn search(
    pipeline: web::Data<Arc<SearchPipeline>>,
    req: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    let embedding = match &req.embedding {
        Some(e) if !e.is_empty() => e.clone(),
        _ => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "no_face_detected"
            })));
        }
    };

    match pipeline.search(&Vector::new(embedding)) {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(Error::NoFaceDetected) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "no_face_detected"
        }))),
        Err(Error::InvalidDimension { expected, actual }) => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("invalid_dimension: expected {expected}, got {actual}")
            })))
        }
        Err(e) => {
            warn!(error = %e, "search failed");
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
    }
}

async fn cached_results(
    pipeline: web::Data<Arc<SearchPipeline>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let query_id = path.into_inner();

    match pipeline.lookup_cached_ids(&query_id) {
        Ok(face_ids) => Ok(HttpResponse::Ok().json(CachedResultsResponse {
            query_id,
            face_ids,
        })),
        Err(Error::UnknownQueryId(_)) => {
            Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": "unknown_query_id"
            })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}

async fn stats(pipeline: web::Data<Arc<SearchPipeline>>) -> ActixResult<HttpResponse> {
    let stats = pipeline.activity().stats(Duration::days(30));
    Ok(HttpResponse::Ok().json(stats))
}

async fn recent_searches(pipeline: web::Data<Arc<SearchPipeline>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(pipeline.activity().recent()))
}
