// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ingestion endpoints for DXF uploads.

use crate::error::ApiError;
use crate::services::cache::DiskCache;
use crate::types::{ClassificationSummary, IngestResponse, OutcomeSummary, ProcessingStats};
use crate::AppState;
use archimaestro_core::{ingest, ParseOutcome, SourceDocument};
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::time::Instant;

/// Extract filename and file data from a multipart request.
async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let filename = field.file_name().unwrap_or("upload.dxf").to_string();
            let bytes = field.bytes().await?;
            tracing::debug!(filename = %filename, size = bytes.len(), "Extracted file from multipart");
            return Ok((filename, bytes.to_vec()));
        }
    }

    tracing::warn!("No 'file' field found in multipart request");
    Err(ApiError::MissingFile)
}

/// POST /api/v1/ingest - Upload a DXF, get outcome + description.
pub async fn ingest_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    // Extract file from multipart
    let (filename, data) = extract_file(&mut multipart).await?;

    // Only DXF is accepted; DWG uploads must be exported first.
    if !filename.to_lowercase().ends_with(".dxf") {
        return Err(ApiError::UnsupportedFormat { filename });
    }

    // Check file size
    if data.len() > state.config.max_file_size_mb * 1024 * 1024 {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    // Generate cache key
    let cache_key = DiskCache::generate_key(&data);

    // Check cache first
    if let Some(mut cached) = state.cache.get::<IngestResponse>(&cache_key).await? {
        tracing::info!(cache_key = %cache_key, "Cache HIT");
        cached.stats.from_cache = true;
        return Ok(Json(cached));
    }

    tracing::info!(cache_key = %cache_key, size = data.len(), "Cache MISS - ingesting");

    // Run the pipeline on the blocking thread pool (CPU-bound)
    let pipeline_config = state.config.pipeline();
    let file_size = data.len();
    let start = Instant::now();
    let handler_filename = filename.clone();
    let report = tokio::task::spawn_blocking(move || {
        let doc = SourceDocument::new(&handler_filename, &data);
        ingest(&doc, &pipeline_config)
    })
    .await?;
    let ingest_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        cache_key = %cache_key,
        ingest_time_ms,
        degraded = matches!(report.outcome, ParseOutcome::RawExcerpt { .. }),
        "Ingestion complete"
    );

    let response = IngestResponse {
        cache_key: cache_key.clone(),
        filename,
        outcome: OutcomeSummary::from(&report.outcome),
        classification: report
            .classification
            .as_ref()
            .and_then(ClassificationSummary::from_classification),
        description: report.description.clone(),
        stats: ProcessingStats {
            file_size,
            ingest_time_ms,
            from_cache: false,
        },
    };

    // Cache result and description text (background)
    let cache = state.cache.clone();
    let response_clone = response.clone();
    let description = report.description;
    tokio::spawn(async move {
        if let Err(e) = cache.set(&cache_key, &response_clone).await {
            tracing::error!(error = %e, "Failed to cache result");
        }
        if let Some(text) = description {
            let text_key = format!("{cache_key}.txt");
            if let Err(e) = cache.set_bytes(&text_key, text.as_bytes()).await {
                tracing::error!(error = %e, "Failed to cache description text");
            }
        }
    });

    Ok(Json(response))
}

/// GET /api/v1/description/{key} - Download a generated description.
pub async fn download_description(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let text_key = format!("{key}.txt");
    let data = state
        .cache
        .get_bytes(&text_key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no description for key {key}")))?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"description.txt\"",
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(response)
}
