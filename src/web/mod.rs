pub mod handlers;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::error;

use crate::files::FsError;

/// Web-layer wrapper giving each `FsError` its HTTP shape.
pub struct ApiError(pub FsError);

impl From<FsError> for ApiError {
    fn from(err: FsError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 416 carries the total size so clients can re-range.
        if let FsError::RangeNotSatisfiable { file_size } = self.0 {
            let mut response =
                (StatusCode::RANGE_NOT_SATISFIABLE, self.0.to_string()).into_response();
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{file_size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
            return response;
        }

        let status = match &self.0 {
            FsError::PathEscape | FsError::PermissionDenied => StatusCode::FORBIDDEN,
            FsError::NotFound => StatusCode::NOT_FOUND,
            FsError::NotADirectory
            | FsError::NotAFile
            | FsError::InvalidFilename
            | FsError::DestinationNotDirectory => StatusCode::BAD_REQUEST,
            FsError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FsError::DiskFull => StatusCode::INSUFFICIENT_STORAGE,
            // Malformed ranges are recovered inside the core; reaching
            // here would be a bug, so treat it like any internal error.
            FsError::RangeMalformed
            | FsError::RangeNotSatisfiable { .. }
            | FsError::UploadIo(_)
            | FsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}
