//! `POST /api/analyze` filter, handler and rejection recovery

use crate::analyzer::AnalysisInput;
use crate::error::{json_message, ApiError, INTERNAL_MESSAGE};
use crate::state::AppState;
use bytes::{BufMut, Bytes, BytesMut};
use crop_core::api::{IMAGE_FIELD, LANGUAGE_FIELD};
use crop_core::{Language, NewAnalysisRecord};
use futures::TryStreamExt;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::multipart::{FormData, Part};
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

/// The analysis service: `POST /api/analyze` plus JSON error recovery
pub fn routes(
    state: AppState,
    max_upload_bytes: u64,
) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
    warp::path!("api" / "analyze")
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload_bytes))
        .and(with_state(state))
        .and_then(analyze)
        .recover(handle_rejection)
        .unify()
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

#[derive(Debug, Default)]
struct Upload {
    image: Option<ImagePart>,
    language: Option<String>,
}

#[derive(Debug)]
struct ImagePart {
    bytes: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

async fn analyze(form: FormData, state: AppState) -> Result<Response, Rejection> {
    let upload = read_upload(form).await.map_err(warp::reject::custom)?;

    let Some(image) = upload.image else {
        tracing::info!("analyze request without image part");
        return Err(warp::reject::custom(ApiError::field(
            "No image file uploaded",
            IMAGE_FIELD,
        )));
    };

    let language = Language::from_code(upload.language.as_deref().unwrap_or_default());
    tracing::info!(
        %language,
        requested = upload.language.as_deref().unwrap_or("<none>"),
        bytes = image.bytes.len(),
        content_type = image.content_type.as_deref().unwrap_or("<none>"),
        "analyze request"
    );

    let input = AnalysisInput {
        image: image.bytes,
        content_type: image.content_type,
        file_name: image.file_name,
        language,
    };

    let result = state
        .analyzer()
        .analyze(&input)
        .await
        .map_err(|e| warp::reject::custom(ApiError::Internal(e.to_string())))?;

    record_analysis(&state, NewAnalysisRecord::from_result(&result, language, input.file_name));

    Ok(warp::reply::with_status(warp::reply::json(&result), StatusCode::OK).into_response())
}

/// Append to the store without holding up the response.
fn record_analysis(state: &AppState, record: NewAnalysisRecord) {
    let state = state.clone();
    tokio::spawn(async move {
        match state.store().append(record).await {
            Ok(stored) => tracing::info!(id = stored.id, "analysis recorded"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to record analysis");
                state.report_store_error(e);
            }
        }
    });
}

async fn read_upload(form: FormData) -> Result<Upload, ApiError> {
    let mut form = Box::pin(form);
    let mut upload = Upload::default();

    while let Some(part) = form.try_next().await.map_err(malformed)? {
        let name = part.name().to_owned();
        match name.as_str() {
            // Only a file part counts; a plain `image` text field is ignored.
            IMAGE_FIELD if upload.image.is_none() && part.filename().is_some() => {
                let content_type = part.content_type().map(str::to_owned);
                let file_name = part.filename().map(str::to_owned);
                let bytes = collect_part(part).await?;
                upload.image = Some(ImagePart {
                    bytes,
                    content_type,
                    file_name,
                });
            }
            LANGUAGE_FIELD => {
                let bytes = collect_part(part).await?;
                upload.language = Some(String::from_utf8_lossy(&bytes).trim().to_string());
            }
            other => tracing::debug!(field = other, "ignoring multipart field"),
        }
    }

    Ok(upload)
}

async fn collect_part(part: Part) -> Result<Bytes, ApiError> {
    let mut stream = Box::pin(part.stream());
    let mut data = BytesMut::new();
    while let Some(chunk) = stream.try_next().await.map_err(malformed)? {
        data.put(chunk);
    }
    Ok(data.freeze())
}

fn malformed(error: warp::Error) -> ApiError {
    tracing::debug!(error = %error, "malformed multipart body");
    ApiError::validation("Malformed multipart body")
}

/// Turn every rejection into one of the JSON error bodies
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if let Some(api) = err.find::<ApiError>() {
        return Ok(api.to_response());
    }

    let response = if err.is_not_found() {
        json_message("Not found", StatusCode::NOT_FOUND)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        json_message("Method not allowed", StatusCode::METHOD_NOT_ALLOWED)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        ApiError::field("Image exceeds the upload size limit", IMAGE_FIELD).to_response()
    } else if err.find::<warp::reject::MissingHeader>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        ApiError::validation("Expected a multipart/form-data body").to_response()
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        ApiError::validation("Content-Length required").to_response()
    } else {
        tracing::error!(rejection = ?err, "unhandled rejection");
        json_message(INTERNAL_MESSAGE, StatusCode::INTERNAL_SERVER_ERROR)
    };

    Ok(response)
}
