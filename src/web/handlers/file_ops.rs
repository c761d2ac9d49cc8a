use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Extension, Path};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures_util::stream;
use log::info;

use crate::files::{FsError, StreamSession, StreamStatus};
use crate::server::ServerConfig;
use crate::web::ApiError;

/// Inline streaming; the browser decides how to render the type.
pub async fn view(
    Extension(config): Extension<Arc<ServerConfig>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    info!("view: /{}", path);
    serve_file(&config, &path, &headers, false).await
}

/// Same as [`view`] plus a save-as-attachment hint. Range requests are
/// honored identically.
pub async fn download(
    Extension(config): Extension<Arc<ServerConfig>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    info!("download: /{}", path);
    serve_file(&config, &path, &headers, true).await
}

async fn serve_file(
    config: &ServerConfig,
    path: &str,
    request_headers: &HeaderMap,
    attachment: bool,
) -> Result<Response, ApiError> {
    let resolved = config.resolver.resolve(path).await?;
    let range = request_headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    let (session, meta) = StreamSession::open(&resolved, range, config.chunk_size).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(meta.content_type),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(meta.content_length));
    if let Some(content_range) = &meta.content_range {
        headers.insert(header::CONTENT_RANGE, header_value(content_range)?);
    }
    if attachment {
        let filename = resolved.file_name().unwrap_or("download");
        let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', "_"));
        headers.insert(header::CONTENT_DISPOSITION, header_value(&disposition)?);
    }

    let status = match meta.status {
        StreamStatus::Full => StatusCode::OK,
        StreamStatus::Partial => StatusCode::PARTIAL_CONTENT,
    };

    // The session travels with the body; dropping the response on client
    // disconnect closes the file handle.
    let body = Body::from_stream(stream::try_unfold(session, |mut session| async move {
        Ok::<_, FsError>(session.next_chunk().await?.map(|chunk| (chunk, session)))
    }));

    Ok((status, headers, body).into_response())
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|_| ApiError(FsError::Io(std::io::Error::other("invalid header value"))))
}
