use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use futures_util::TryStreamExt;
use log::info;

use crate::files::{DirectoryEntry, FsError, upload};
use crate::server::ServerConfig;
use crate::web::ApiError;

#[derive(Debug, serde::Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// Streams the raw request body into `{path}/{filename}`; 201 with the
/// committed entry on success.
pub async fn upload(
    Extension(config): Extension<Arc<ServerConfig>>,
    path: Option<Path<String>>,
    Query(query): Query<UploadQuery>,
    body: Body,
) -> Result<(StatusCode, Json<DirectoryEntry>), ApiError> {
    let relative = path.map(|Path(p)| p).unwrap_or_default();
    info!("upload: /{} <- {:?}", relative, query.filename);

    let dest = config.resolver.resolve(&relative).await?;
    let source = body
        .into_data_stream()
        .map_err(|e| FsError::UploadIo(std::io::Error::other(e)));

    let entry = upload::receive(&dest, &query.filename, source, config.max_upload_size).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
