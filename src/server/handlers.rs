use super::types::{ErrorResponse, StatusResponse, UploadResponse};
use crate::{Error, storage::ImageStore};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ImageStore>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Accepts any Content-Type containing `image/jpeg`, parameters included.
pub fn validate_content_type(headers: &HeaderMap) -> Result<(), Error> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    match content_type {
        Some(value) if value.contains(JPEG_CONTENT_TYPE) => Ok(()),
        other => Err(Error::InvalidContentType {
            content_type: other.unwrap_or("None").to_string(),
        }),
    }
}

fn error_response(err: &Error) -> HandlerError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let message = match err {
        Error::InvalidContentType { .. } => format!("Content-Type must be {}", JPEG_CONTENT_TYPE),
        Error::EmptyUpload => "No image data received".to_string(),
        other => other.to_string(),
    };
    (status, Json(ErrorResponse { error: message }))
}

pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, HandlerError> {
    info!("Received upload request");

    if let Err(e) = validate_content_type(&headers) {
        warn!("{}", e);
        return Err(error_response(&e));
    }

    if body.is_empty() {
        warn!("No image data received");
        return Err(error_response(&Error::EmptyUpload));
    }

    match state.store.save(&body).await {
        Ok(image) => Ok(Json(UploadResponse {
            success: true,
            message: "Image saved successfully".to_string(),
            filename: image.filename,
            size: image.size,
        })),
        Err(e) => {
            error!("Error saving image: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Server is running".to_string(),
    })
}
