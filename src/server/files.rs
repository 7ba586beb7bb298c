use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Map a request path onto `root`. Returns `None` for paths that would leave
/// the root or do not decode as UTF-8.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let mut path = root.to_path_buf();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            _ => {
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(part)), None) => path.push(part),
                    _ => return None,
                }
            }
        }
    }
    Some(path)
}

/// Serve `path`, or `index.html` inside it when it is a directory.
pub(super) async fn serve_path(mut path: PathBuf) -> Response {
    if let Ok(metadata) = tokio::fs::metadata(&path).await {
        if metadata.is_dir() {
            path.push("index.html");
        }
    }
    serve_file(&path).await
}

pub(super) async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            debug!(path = %path.display(), bytes = contents.len(), "serving file");
            ([(header::CONTENT_TYPE, mime.to_string())], contents).into_response()
        }
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => not_found(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub(super) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
