use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use searchcore::{
    BetterRanker, BetterRankerConfig, Corpus, DocId, Document, InMemoryCorpus, InMemoryInvertedIndex, IndexConfig,
    Ranker, SearchOptions, SimpleRanker, SimpleSearchEngine,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// What the server indexes at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub corpus: PathBuf,
    pub index: IndexConfig,
    pub ranker: BetterRankerConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankerKind {
    Simple,
    #[default]
    Better,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default)]
    pub ranker: RankerKind,
}
fn default_k() -> usize { 10 }
fn default_match_threshold() -> f64 { 0.5 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub fields: HashMap<String, serde_json::Value>,
}

pub struct SearchState {
    pub corpus: InMemoryCorpus,
    pub index: InMemoryInvertedIndex,
    pub ranker: BetterRankerConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchState>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let corpus = InMemoryCorpus::from_path(&config.corpus)?;
    let index = InMemoryInvertedIndex::from_config(&corpus, &config.index)?;
    tracing::info!(documents = corpus.size(), terms = index.term_count(), "index ready");
    let app_state = AppState { search: Arc::new(SearchState { corpus, index, ranker: config.ranker }) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let options = SearchOptions::new(params.match_threshold, params.k)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let search = &state.search;
    let engine = SimpleSearchEngine::new(&search.corpus, &search.index);
    let mut ranker: Box<dyn Ranker + '_> = match params.ranker {
        RankerKind::Simple => Box::new(SimpleRanker::new()),
        RankerKind::Better => Box::new(BetterRanker::with_config(&search.corpus, &search.index, search.ranker.clone())),
    };
    let hits = engine
        .evaluate(&params.q, &options, ranker.as_mut())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let results: Vec<SearchHit> = hits
        .into_iter()
        .map(|h| SearchHit { doc_id: h.document.doc_id, score: h.score, fields: h.document.fields.clone() })
        .collect();
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, hits = results.len(), "search served");
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<Document>, (StatusCode, String)> {
    state
        .search
        .corpus
        .get_document(doc_id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("document {doc_id} not found")))
}
