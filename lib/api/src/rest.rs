use crate::metadata::MetadataClient;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use bookrec_core::Error;
use bookrec_similarity::{Recommendation, Recommender, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const NOT_FOUND_MESSAGE: &str = "Book not found. Please enter a valid title.";

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Number of titles returned by `/recommend`
    pub top_n: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> bookrec_core::Result<()> {
        if self.top_n == 0 {
            return Err(Error::InvalidConfig("top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendResponse {
    Titles { titles: Vec<String> },
    Error { error: String },
}

impl From<Recommendation> for RecommendResponse {
    fn from(rec: Recommendation) -> Self {
        match rec {
            Recommendation::NotFound => RecommendResponse::Error {
                error: NOT_FOUND_MESSAGE.to_string(),
            },
            found => RecommendResponse::Titles { titles: found.titles() },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MetadataParams {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub books: usize,
    pub stored_similarities: usize,
}

/// Register every route once on `cfg`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/books", web::get().to(list_books))
        .route("/search", web::get().to(search_books))
        .route("/recommend", web::post().to(recommend))
        .route("/metadata", web::get().to(book_metadata))
        .route("/health", web::get().to(health));
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        recommender: Arc<Recommender>,
        metadata: Arc<MetadataClient>,
        config: ApiConfig,
    ) -> std::io::Result<()> {
        let bind = (config.host.clone(), config.port);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(recommender.clone()))
                .app_data(web::Data::new(metadata.clone()))
                .app_data(web::Data::new(config.clone()))
                .configure(configure)
        })
        .bind(bind)?
        .run()
        .await
    }
}

async fn list_books(
    recommender: web::Data<Arc<Recommender>>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(recommender.catalog().titles()))
}

async fn search_books(
    recommender: web::Data<Arc<Recommender>>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    let query = params.query.as_deref().unwrap_or("");
    let results = recommender.catalog().search(query);
    tracing::debug!(query, hits = results.len(), "search");
    Ok(HttpResponse::Ok().json(results))
}

async fn recommend(
    recommender: web::Data<Arc<Recommender>>,
    config: web::Data<ApiConfig>,
    req: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    match recommender.recommend(&req.title, config.top_n) {
        Ok(rec) => Ok(HttpResponse::Ok().json(RecommendResponse::from(rec))),
        Err(e) => {
            tracing::error!(title = %req.title, error = %e, "recommendation failed");
            Ok(HttpResponse::InternalServerError().json(RecommendResponse::Error {
                error: e.to_string(),
            }))
        }
    }
}

async fn book_metadata(
    metadata: web::Data<Arc<MetadataClient>>,
    params: web::Query<MetadataParams>,
) -> ActixResult<HttpResponse> {
    let links = metadata.lookup(&params.title).await;
    Ok(HttpResponse::Ok().json(links))
}

async fn health(
    recommender: web::Data<Arc<Recommender>>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        books: recommender.catalog().len(),
        stored_similarities: recommender.matrix().nnz(),
    }))
}
