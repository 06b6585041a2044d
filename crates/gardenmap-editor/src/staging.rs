//! Staging pipeline: upload, decode, sample and thumbnail.
//!
//! A [`PendingPiece`] is only returned once every step has finished; callers
//! hand it to the session afterwards.

use crate::pending::PendingPiece;
use crate::piece::{EdgeSignatures, PieceId};
use crate::sampler::sample_edges;
use crate::upload::{UploadResponse, UploadService};
use gardenmap_core::constants::FALLBACK_PIECE_SIZE;
use gardenmap_core::{Result, UploadError};
use gardenmap_settings::EditorSettings;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Uploads `bytes` and prepares a pending piece from them.
///
/// An upload the service rejects is an error and produces no pending piece.
/// An image that cannot be decoded is still staged, with empty signatures
/// and the dimensions from its header (or a square fallback size).
pub async fn stage_upload<U: UploadService + ?Sized>(
    service: &U,
    file_name: &str,
    bytes: Vec<u8>,
    settings: &EditorSettings,
) -> Result<PendingPiece> {
    let response = service.upload(file_name, bytes.clone()).await?;
    let path = match response {
        UploadResponse {
            success: true,
            path: Some(path),
        } => path,
        _ => {
            return Err(UploadError::Rejected {
                file_name: file_name.to_string(),
            }
            .into())
        }
    };

    let name = display_name(file_name);
    let pending = match image::load_from_memory(&bytes) {
        Ok(decoded) => {
            let signatures = sample_edges(&decoded, settings.sample_count);
            let thumbnail =
                thumbnail_or_empty(encode_thumbnail(&decoded, settings.thumbnail_size), file_name);
            PendingPiece {
                id: PieceId::new(),
                name,
                image_path: path,
                width: decoded.width() as f64,
                height: decoded.height() as f64,
                signatures,
                thumbnail,
            }
        }
        Err(err) => {
            tracing::warn!("Could not decode '{}', staging without signatures: {}", file_name, err);
            let (width, height) = header_dimensions(&bytes)
                .unwrap_or((FALLBACK_PIECE_SIZE, FALLBACK_PIECE_SIZE));
            PendingPiece {
                id: PieceId::new(),
                name,
                image_path: path,
                width,
                height,
                signatures: EdgeSignatures::default(),
                thumbnail: Vec::new(),
            }
        }
    };

    tracing::info!(
        "Staged '{}' as pending piece {} ({}x{})",
        pending.name,
        pending.id,
        pending.width,
        pending.height
    );
    Ok(pending)
}

/// File stem used as the piece name.
fn display_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(file_name)
        .to_string()
}

/// Dimensions read from the image header alone.
fn header_dimensions(bytes: &[u8]) -> Option<(f64, f64)> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width as f64, height as f64))
}

/// Thumbnail bytes, or none when encoding failed; the upload is already stored.
fn thumbnail_or_empty(encoded: Result<Vec<u8>>, file_name: &str) -> Vec<u8> {
    match encoded {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!("Could not encode thumbnail for '{}': {}", file_name, err);
            Vec::new()
        }
    }
}

/// PNG preview no larger than `size` on its longest side.
fn encode_thumbnail(image: &DynamicImage, size: u32) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    write_thumbnail(image, size, &mut buffer)?;
    Ok(buffer.into_inner())
}

fn write_thumbnail<W: Write + Seek>(image: &DynamicImage, size: u32, out: &mut W) -> Result<()> {
    let preview = image.thumbnail(size.max(1), size.max(1));
    preview.write_to(out, ImageFormat::Png)?;
    Ok(())
}
