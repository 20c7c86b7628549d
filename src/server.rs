use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path as AxumPath, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::commands::browse_commands::{self, BrowseOutcome};
use crate::commands::favorite_commands::{
    self, AddFavoriteRequest, FavoriteResponse, RemoveFavoriteRequest,
};
use crate::error::AppError;
use crate::models::listing::ListingView;
use crate::state::AppState;
use crate::templates;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/favorite",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route("/favorites", get(favorites_handler))
        .route("/", get(browse_root_handler))
        .route("/{*path}", get(browse_path_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            AppError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            AppError::General(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            other => {
                error!("request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// JSON error body for the `/api` routes: `{"error": message}`.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn bad_request() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid request",
        }
    }

    fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct BrowseQuery {
    q: Option<String>,
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| {
            accept.contains("application/json") && !accept.contains("text/html")
        })
}

fn render_view(state: &AppState, view: &ListingView, json: bool) -> Response {
    if json {
        Json(view).into_response()
    } else {
        Html(templates::render_listing(&state.config.site, view).into_string()).into_response()
    }
}

async fn serve_file(path: &Path, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

async fn browse_root_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
    request: Request,
) -> Response {
    browse_response(state, "/".to_string(), query.q, request).await
}

async fn browse_path_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(path): AxumPath<String>,
    Query(query): Query<BrowseQuery>,
    request: Request,
) -> Response {
    browse_response(state, path, query.q, request).await
}

async fn browse_response(
    state: Arc<AppState>,
    path: String,
    query: Option<String>,
    request: Request,
) -> Response {
    let json = wants_json(request.headers());
    match browse_commands::browse(Arc::clone(&state), path, query).await {
        Ok(BrowseOutcome::File(path)) => serve_file(&path, request).await,
        Ok(BrowseOutcome::Listing(view)) => render_view(&state, &view, json),
        Err(e) => e.into_response(),
    }
}

async fn favorites_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match favorite_commands::favorites_page(Arc::clone(&state)).await {
        Ok(view) => render_view(&state, &view, wants_json(&headers)),
        Err(e) => e.into_response(),
    }
}

async fn add_favorite_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("rejected favorite body: {rejection}");
        ApiError::bad_request()
    })?;

    match favorite_commands::add_favorite(state, request).await {
        Ok(response) => Ok(Json(response)),
        Err(AppError::InvalidRequest(_)) => Err(ApiError::bad_request()),
        Err(e) => {
            error!("adding favorite failed: {e}");
            Err(ApiError::internal("Failed to add favorite"))
        }
    }
}

async fn remove_favorite_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RemoveFavoriteRequest>, JsonRejection>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("rejected favorite body: {rejection}");
        ApiError::bad_request()
    })?;

    match favorite_commands::remove_favorite(state, request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("removing favorite failed: {e}");
            Err(ApiError::internal("Failed to remove favorite"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::migrations;
    use crate::services::search_service::CannedSearcher;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use rusqlite::Connection;
    use std::fs;
    use std::path::PathBuf;

    struct Harness {
        _dir: tempfile::TempDir,
        root: PathBuf,
        app: Router,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_hits(|_| Vec::new())
        }

        fn with_hits(hits: impl FnOnce(&Path) -> Vec<PathBuf>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().join("root");
            fs::create_dir_all(root.join("photos")).unwrap();
            fs::write(root.join("notes.txt"), vec![b'n'; 500]).unwrap();
            fs::write(dir.path().join("secret.txt"), "outside").unwrap();

            let config = Config::from_yaml(&format!(
                "server:\n  port: 0\n  root_path: {}\nsite:\n  title: Test Files\n",
                root.display()
            ))
            .unwrap();
            let conn = Connection::open_in_memory().unwrap();
            migrations::run_migrations(&conn).unwrap();
            let searcher = Arc::new(CannedSearcher::new(hits(&root)));
            let state = Arc::new(AppState::new(config, conn, searcher));

            Self {
                _dir: dir,
                root,
                app: router(state),
            }
        }

        async fn send(&self, request: axum::http::Request<Body>) -> (StatusCode, String) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, String::from_utf8_lossy(&bytes).to_string())
        }

        async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
            let request = axum::http::Request::builder()
                .uri(uri)
                .header(header::ACCEPT, "application/json")
                .body(Body::empty())
                .unwrap();
            let (status, body) = self.send(request).await;
            let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
            (status, value)
        }

        async fn get(&self, uri: &str) -> (StatusCode, String) {
            let request = axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            self.send(request).await
        }

        async fn api(&self, method: &str, body: &str) -> (StatusCode, serde_json::Value) {
            let request = axum::http::Request::builder()
                .method(method)
                .uri("/api/favorite")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            let (status, body) = self.send(request).await;
            (status, serde_json::from_str(&body).unwrap())
        }
    }

    fn file<'a>(listing: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
        listing["files"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == name)
            .unwrap()
    }

    #[tokio::test]
    async fn root_lists_files_and_directories() {
        let harness = Harness::new();
        let (status, listing) = harness.get_json("/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["files"].as_array().unwrap().len(), 2);

        let notes = file(&listing, "notes.txt");
        assert_eq!(notes["is_directory"], false);
        assert_eq!(notes["size"], "500");

        let photos = file(&listing, "photos");
        assert_eq!(photos["is_directory"], true);
        assert_eq!(photos["size"], "-");
        assert_eq!(photos["link"], "/photos/");
    }

    #[tokio::test]
    async fn html_listing_is_the_default() {
        let harness = Harness::new();
        let (status, page) = harness.get("/photos/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("<title>Test Files</title>"));
        assert!(page.contains("Nothing here."));
    }

    #[tokio::test]
    async fn files_are_streamed() {
        let harness = Harness::new();
        let (status, body) = harness.get("/notes.txt").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 500);
        assert!(harness.root.join("notes.txt").exists());
    }

    #[tokio::test]
    async fn escapes_are_forbidden_and_missing_paths_not_found() {
        let harness = Harness::new();

        let (status, body) = harness.get("/../secret.txt").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Forbidden");

        let (status, _) = harness.get("/photos/%2e%2e/%2e%2e/secret.txt").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = harness.get("/missing.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn favorite_round_trip_updates_listing() {
        let harness = Harness::new();

        let (status, body) = harness
            .api("POST", r#"{"path":"/notes.txt","name":"notes"}"#)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "success": true }));

        let (_, listing) = harness.get_json("/").await;
        assert_eq!(file(&listing, "notes.txt")["is_favorite"], true);
        assert_eq!(file(&listing, "photos")["is_favorite"], false);

        let (status, body) = harness.api("DELETE", r#"{"path":"/notes.txt"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "success": true }));

        let (_, listing) = harness.get_json("/").await;
        assert_eq!(file(&listing, "notes.txt")["is_favorite"], false);
    }

    #[tokio::test]
    async fn favorites_page_lists_most_recent_first() {
        let harness = Harness::new();
        harness
            .api("POST", r#"{"path":"/notes.txt","name":"my notes"}"#)
            .await;
        harness
            .api("POST", r#"{"path":"/photos/","name":"my photos"}"#)
            .await;

        let (status, listing) = harness.get_json("/favorites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["is_favorites_page"], true);

        let names: Vec<&str> = listing["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["my photos", "my notes"]);
        assert!(listing["files"]
            .as_array()
            .unwrap()
            .iter()
            .all(|f| f["is_favorite"] == true));
    }

    #[tokio::test]
    async fn malformed_favorite_bodies_are_rejected() {
        let harness = Harness::new();

        let (status, body) = harness.api("POST", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Invalid request" }));

        let (status, _) = harness.api("POST", r#"{"path":"","name":"x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = harness.api("DELETE", r#"{"name":"x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn favorite_without_name_is_stored_with_empty_name() {
        let harness = Harness::new();

        let (status, body) = harness.api("POST", r#"{"path":"/notes.txt"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "success": true }));

        let (_, listing) = harness.get_json("/").await;
        assert_eq!(file(&listing, "notes.txt")["is_favorite"], true);

        let (_, favorites) = harness.get_json("/favorites").await;
        assert_eq!(favorites["files"].as_array().unwrap().len(), 1);
        assert_eq!(favorites["files"][0]["name"], "");
        assert_eq!(favorites["files"][0]["path"], "/notes.txt");
    }

    #[tokio::test]
    async fn search_query_uses_the_searcher() {
        let harness = Harness::with_hits(|root| vec![root.join("notes.txt")]);
        let (status, listing) = harness.get_json("/photos/?q=NOTES").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["query"], "NOTES");
        assert_eq!(listing["files"].as_array().unwrap().len(), 1);
        assert_eq!(listing["files"][0]["link"], "/notes.txt");
        assert_eq!(listing["breadcrumbs"][0]["path"], "/photos");
        assert_eq!(listing["parent"], "/");
    }
}
