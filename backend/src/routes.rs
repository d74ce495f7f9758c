use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, warn, Level};

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::files;

pub fn router(config: Arc<ServerConfig>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/{*path}", get(static_file))
        .layer(middleware::from_fn_with_state(config.clone(), limit_body))
        .layer(middleware::from_fn(security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(config)
}

async fn index(State(config): State<Arc<ServerConfig>>) -> Response {
    index_page(&config, StatusCode::OK).await
}

/// The home page, also used as the body of every 404.
async fn index_page(config: &ServerConfig, status: StatusCode) -> Response {
    match tokio::fs::read_to_string(config.site_root.join("index.html")).await {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!("Error loading index page: {}", e);
            ServeError::Io(e).into_response()
        }
    }
}

async fn static_file(
    State(config): State<Arc<ServerConfig>>,
    Path(requested): Path<String>,
) -> Response {
    match serve_file(&config, &requested).await {
        Ok(response) => response,
        Err(ServeError::NotFound(path)) => {
            warn!("File not found: {}", path);
            index_page(&config, StatusCode::NOT_FOUND).await
        }
        Err(e) => {
            match &e {
                ServeError::Io(_) => error!("Error serving {}: {}", requested, e),
                _ => warn!("Refused {}: {}", requested, e),
            }
            e.into_response()
        }
    }
}

async fn serve_file(config: &ServerConfig, requested: &str) -> Result<Response, ServeError> {
    let relative = files::sanitize_path(requested)
        .ok_or_else(|| ServeError::NotFound(requested.to_string()))?;
    let full = config.site_root.join(&relative);

    match tokio::fs::metadata(&full).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Err(ServeError::NotFound(relative.display().to_string())),
    }
    if !files::is_allowed(&relative) {
        return Err(ServeError::Forbidden(relative.display().to_string()));
    }

    let bytes = tokio::fs::read(&full).await?;
    debug!("Serving {} ({} bytes)", relative.display(), bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, files::mime_for(&relative)),
            (
                header::CACHE_CONTROL,
                files::cache_control_for(&relative).to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Rejects POST bodies whose declared length is over the configured limit.
async fn limit_body(
    State(config): State<Arc<ServerConfig>>,
    request: Request,
    next: Next,
) -> Result<Response, ServeError> {
    if request.method() == Method::POST {
        let declared = request
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        if let Some(length) = declared.filter(|&length| length > config.max_content_length) {
            warn!("Rejected request body of {} bytes", length);
            return Err(ServeError::PayloadTooLarge(length));
        }
    }
    Ok(next.run(request).await)
}

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    response
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    const INDEX: &str = "<html><body>portfolio</body></html>";

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
        std::fs::write(dir.path().join("style.css"), "body { margin: 0 }").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("app.py"), "print('secret')").unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img").join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        dir
    }

    fn app(dir: &TempDir) -> Router {
        router(Arc::new(ServerConfig::for_site(dir.path())))
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_index() {
        let dir = site();
        let response = fetch(app(&dir), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert_eq!(body_text(response).await, INDEX);
    }

    #[tokio::test]
    async fn every_response_has_security_headers() {
        let dir = site();
        for uri in ["/", "/style.css", "/missing.css", "/app.py"] {
            let response = fetch(app(&dir), uri).await;
            let headers = response.headers();
            assert_eq!(headers["x-content-type-options"], "nosniff", "{}", uri);
            assert_eq!(headers["x-frame-options"], "DENY", "{}", uri);
            assert_eq!(headers["x-xss-protection"], "1; mode=block", "{}", uri);
            assert_eq!(
                headers["referrer-policy"],
                "strict-origin-when-cross-origin",
                "{}",
                uri
            );
        }
    }

    #[tokio::test]
    async fn serves_static_files_with_cache_headers() {
        let dir = site();
        let css = fetch(app(&dir), "/style.css").await;
        assert_eq!(css.status(), StatusCode::OK);
        assert_eq!(css.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(css.headers()[header::CACHE_CONTROL], files::LONG_CACHE);
        assert_eq!(body_text(css).await, "body { margin: 0 }");

        let png = fetch(app(&dir), "/img/logo.png").await;
        assert_eq!(png.status(), StatusCode::OK);
        assert_eq!(png.headers()[header::CONTENT_TYPE], "image/png");

        let txt = fetch(app(&dir), "/notes.txt").await;
        assert_eq!(txt.headers()[header::CACHE_CONTROL], files::SHORT_CACHE);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_index() {
        let dir = site();
        let response = fetch(app(&dir), "/projects/unknown.html").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, INDEX);
    }

    #[tokio::test]
    async fn disallowed_extension_is_forbidden() {
        let dir = site();
        let response = fetch(app(&dir), "/app.py").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Access to this file is forbidden");
    }

    #[tokio::test]
    async fn missing_index_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let response = fetch(app(&dir), "/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal server error");
    }

    #[tokio::test]
    async fn oversized_post_is_rejected() {
        let dir = site();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_LENGTH, 17 * 1024 * 1024)
            .body(Body::empty())
            .unwrap();
        let response = app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }
}
