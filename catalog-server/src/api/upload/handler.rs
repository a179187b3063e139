//! Image Upload Handler
//!
//! 图片先上传、后引用：引擎事务内从不接触二进制内容，只消费
//! 上传返回的 URL。支持 PNG / JPEG / WebP，统一压缩为 JPG 存储，
//! 以内容哈希命名实现去重。

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::PathBuf;
use std::fs;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, ErrorCode};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality (85% keeps product photos appealing at a sane size)
const JPEG_QUALITY: u8 = 85;

/// Upload response — what the engine consumes as an image reference
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub storage_key: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Re-encode as JPEG at fixed quality
fn compress_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {}", e),
            )
        })?;
    }
    Ok(buffer)
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {}MB", MAX_FILE_SIZE / 1024 / 1024),
        ));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    Ok(())
}

/// POST /api/upload - 上传图片
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, AppError> {
    let images_dir = state.config.images_dir();
    fs::create_dir_all(&images_dir).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to create images directory: {}", e),
        )
    })?;

    // Find the file field
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart.next_field().await.map_err(|e| {
        AppError::validation(format!("Invalid multipart request: {}", e))
    })? {
        let name = f.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(
                f.bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            "No 'file' field found. Field name must be 'file'",
        )
    })?;
    let filename = original_filename
        .ok_or_else(|| AppError::with_message(ErrorCode::NoFilename, "No filename provided"))?;

    if data.is_empty() {
        return Err(AppError::with_message(ErrorCode::EmptyFile, "Empty file provided"));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Invalid file extension for: {}", filename),
            )
        })?;

    validate_image(&data, &ext)?;
    let compressed_data = compress_image(&data)?;

    // Content-addressed filename: identical uploads land on the same file
    let file_hash = calculate_hash(&compressed_data);
    let stored_filename = format!("{}.jpg", file_hash);
    let file_path = images_dir.join(&stored_filename);

    if file_path.exists() {
        tracing::info!(
            original_name = %filename,
            hash = %file_hash,
            "Duplicate image detected, returning existing file"
        );
    } else {
        fs::write(&file_path, &compressed_data).map_err(|e| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to save file: {}", e),
            )
        })?;

        tracing::info!(
            original_name = %filename,
            size = compressed_data.len(),
            hash = %file_hash,
            "Image uploaded"
        );
    }

    let url = format!("{}/images/{}", state.config.public_base_url, stored_filename);
    let response = UploadResponse {
        url,
        storage_key: file_hash,
        original_name: filename,
        size: compressed_data.len(),
        format: "jpg".to_string(),
    };

    Ok(Json(ApiResponse::success(response)))
}
