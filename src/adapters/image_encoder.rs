use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::debug;

use crate::domain::config::EncoderConfig;
use crate::domain::{CandidateImage, DomainError, EncodedPayload};
use crate::ports::{HttpClient, ImageEncoder};

/// Re-fetches an image, draws it onto a bounded canvas and emits base64 JPEG.
pub struct JpegImageEncoder {
    http: Arc<dyn HttpClient>,
    max_dimension: u32,
    quality: u8,
}

impl JpegImageEncoder {
    pub fn new(http: Arc<dyn HttpClient>, config: &EncoderConfig) -> Self {
        Self {
            http,
            max_dimension: config.max_dimension.max(1),
            quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// Fetch the raw image bytes. No credentials are sent, which mirrors an
    /// anonymous cross-origin load.
    async fn load(&self, src: &str) -> Result<Vec<u8>, DomainError> {
        if let Some(rest) = src.strip_prefix("data:") {
            return decode_data_url(rest);
        }

        let response = self
            .http
            .get(src, None)
            .await
            .map_err(|e| DomainError::EncodingFailed(format!("Failed to load image: {}", e)))?;

        if !response.is_success() {
            return Err(DomainError::EncodingFailed(format!(
                "Failed to load image: HTTP {}",
                response.status
            )));
        }

        Ok(response.body)
    }
}

/// Decode the part of a `data:` URL after the scheme. Base64 bodies are
/// decoded as such, anything else is percent-decoded.
fn decode_data_url(rest: &str) -> Result<Vec<u8>, DomainError> {
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| DomainError::EncodingFailed("Malformed data URL".to_string()))?;

    if meta.ends_with(";base64") {
        return STANDARD
            .decode(data.trim())
            .map_err(|e| DomainError::EncodingFailed(format!("Invalid data URL: {}", e)));
    }

    Ok(urlencoding::decode_binary(data.as_bytes()).into_owned())
}

/// Sniff SVG markup (plain or gzip-compressed). Raster formats are left to
/// the `image` crate.
fn is_svg(bytes: &[u8]) -> bool {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        return true;
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with('<') && head.contains("<svg")
}

/// Canvas size: each axis is the source size clamped to `max_dimension`.
/// Falls back to the rendered size when the natural size is unknown.
fn canvas_size(
    natural: (u32, u32),
    rendered: (Option<u32>, Option<u32>),
    max_dimension: u32,
) -> (u32, u32) {
    let pick = |n: u32, r: Option<u32>| if n > 0 { n } else { r.unwrap_or(0) };
    (
        pick(natural.0, rendered.0).min(max_dimension),
        pick(natural.1, rendered.1).min(max_dimension),
    )
}

/// Decode `bytes`, stretch onto the bounded canvas and encode as JPEG.
fn render_jpeg(
    bytes: &[u8],
    rendered: (Option<u32>, Option<u32>),
    max_dimension: u32,
    quality: u8,
) -> Result<Vec<u8>, DomainError> {
    let canvas = if is_svg(bytes) {
        rasterize_svg(bytes, rendered, max_dimension)?
    } else {
        draw_raster(bytes, rendered, max_dimension)?
    };

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(&canvas)
        .map_err(|e| DomainError::EncodingFailed(format!("Failed to encode JPEG: {}", e)))?;

    Ok(buffer.into_inner())
}

fn drawable(width: u32, height: u32) -> Result<(), DomainError> {
    if width == 0 || height == 0 {
        return Err(DomainError::EncodingFailed("Image has no drawable area".to_string()));
    }
    Ok(())
}

fn draw_raster(
    bytes: &[u8],
    rendered: (Option<u32>, Option<u32>),
    max_dimension: u32,
) -> Result<RgbImage, DomainError> {
    let source = image::load_from_memory(bytes)
        .map_err(|e| DomainError::EncodingFailed(format!("Failed to decode image: {}", e)))?;

    let (width, height) = canvas_size((source.width(), source.height()), rendered, max_dimension);
    drawable(width, height)?;

    Ok(source.resize_exact(width, height, FilterType::Triangle).to_rgb8())
}

/// Render SVG straight onto the canvas, scaled per axis.
fn rasterize_svg(
    bytes: &[u8],
    rendered: (Option<u32>, Option<u32>),
    max_dimension: u32,
) -> Result<RgbImage, DomainError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| DomainError::EncodingFailed(format!("Failed to parse SVG: {}", e)))?;

    let size = tree.size();
    let natural = size.to_int_size();
    let (width, height) = canvas_size((natural.width(), natural.height()), rendered, max_dimension);
    drawable(width, height)?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| DomainError::EncodingFailed("Failed to allocate SVG canvas".to_string()))?;
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // Premultiplied RGBA: dropping alpha composites onto black, like a
    // canvas JPEG export.
    let rgba = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| DomainError::EncodingFailed("SVG canvas size mismatch".to_string()))?;
    Ok(DynamicImage::ImageRgba8(rgba).to_rgb8())
}

#[async_trait]
impl ImageEncoder for JpegImageEncoder {
    async fn encode(&self, image: &CandidateImage) -> Result<EncodedPayload, DomainError> {
        let bytes = self.load(&image.src).await?;

        let rendered = (image.width, image.height);
        let max_dimension = self.max_dimension;
        let quality = self.quality;

        let jpeg = tokio::task::spawn_blocking(move || {
            render_jpeg(&bytes, rendered, max_dimension, quality)
        })
        .await
        .map_err(|e| DomainError::EncodingFailed(format!("Encoder task failed: {}", e)))??;

        debug!(src = %image.src, jpeg_bytes = jpeg.len(), "Image encoded");
        Ok(EncodedPayload::new(STANDARD.encode(jpeg)))
    }
}
