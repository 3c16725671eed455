//! `GET /api/download/resume`.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::ServerState;

pub async fn download(State(state): State<ServerState>) -> Result<Response, ApiError> {
    let Some(path) = state.resume.as_deref() else {
        return Err(ApiError::NotFound);
    };
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ApiError::NotFound),
        Err(e) => return Err(ApiError::Internal(format!("{}: {e}", path.display()))),
    };
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("resume.pdf")
        .replace('"', "");
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}
