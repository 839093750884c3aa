// The image compression pipeline.
//
// `Compressor` turns a `SourceAsset` into a `CompressionResult` under the
// caller's `CompressionParameters`: gate on the media type, decode,
// conditionally resize, re-encode, then keep whichever of candidate and
// original is smaller. The operation is total: every failure path degrades
// to returning the original bytes with the cause recorded, and no error
// reaches the caller.
//
// - `batch`: compress many assets with one parameter set

pub mod batch;

pub use batch::compress_all;
#[cfg(feature = "parallel")]
pub use batch::compress_all_parallel;

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;
use image::imageops::FilterType;
use log::{debug, warn};

use crate::asset::{CompressionParameters, SourceAsset};
use crate::codec::{ImageCodec, RasterCodec};

/// Filter used when downscaling.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

// ---------------------------------------------------------------------------
// FallbackCause
// ---------------------------------------------------------------------------

/// Why a compression attempt returned the original bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCause {
    /// The declared media type is not in the `image/` family.
    NotAnImage,
    /// The bytes could not be decoded as the declared image type.
    DecodeFailed,
    /// The resize/re-encode step failed.
    EncodeFailed,
    /// The re-encoded candidate came out larger than the original.
    SizeRegression,
}

impl fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotAnImage => "not an image",
            Self::DecodeFailed => "decode failed",
            Self::EncodeFailed => "encode failed",
            Self::SizeRegression => "size regression",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// CompressionResult
// ---------------------------------------------------------------------------

/// Outcome of one compression call.
///
/// `bytes` holds either the re-encoded candidate or, on fallback, the
/// original input unchanged. `media_type` always mirrors the input's
/// declared type; the pipeline never transcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// Output bytes.
    pub bytes: Vec<u8>,
    /// Declared media type, mirrored from the input.
    pub media_type: String,
    /// Encoded size of the input, in bytes.
    pub original_size: usize,
    /// Set when the original bytes were returned unchanged.
    pub fallback: Option<FallbackCause>,
}

impl CompressionResult {
    /// Whether the original bytes were returned unchanged.
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Output size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Output size over original size, as a percentage.
    ///
    /// An empty input reports 100.0: nothing was saved.
    pub fn compression_rate(&self) -> f64 {
        if self.original_size == 0 {
            return 100.0;
        }
        (self.bytes.len() as f64 / self.original_size as f64) * 100.0
    }

    /// The rate the way the display surface shows it, four decimal places.
    pub fn compression_rate_display(&self) -> String {
        format!("{:.4}", self.compression_rate())
    }

    /// The output as a `data:` URL for inline display.
    pub fn data_url(&self) -> String {
        data_url(&self.media_type, &self.bytes)
    }

    fn passthrough(asset: &SourceAsset, cause: FallbackCause) -> Self {
        Self {
            bytes: asset.bytes.clone(),
            media_type: asset.media_type.clone(),
            original_size: asset.bytes.len(),
            fallback: Some(cause),
        }
    }
}

/// Render bytes as a `data:` URL for inline display.
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    let mut url = format!("data:{media_type};base64,");
    BASE64.encode_string(bytes, &mut url);
    url
}

// ---------------------------------------------------------------------------
// Compressor
// ---------------------------------------------------------------------------

/// The image compression pipeline.
///
/// Holds the codec used to decode and re-encode assets. Cloning is cheap;
/// clones share the codec. No other state is retained between calls.
#[derive(Clone)]
pub struct Compressor {
    codec: Arc<dyn ImageCodec>,
}

impl Compressor {
    /// Pipeline backed by the production `image`-crate codec.
    pub fn new() -> Self {
        Self {
            codec: Arc::new(RasterCodec),
        }
    }

    /// Pipeline with a caller-provided codec.
    pub fn with_codec(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }

    /// Compress an asset without blocking the caller.
    ///
    /// Decoding and re-encoding run on the blocking-task pool, so an async
    /// caller keeps servicing other events while a large image is processed.
    /// Must be awaited inside a Tokio runtime; use
    /// [`compress_blocking`](Self::compress_blocking) elsewhere.
    ///
    /// The returned future never fails. Even a codec that panics degrades to
    /// the original bytes with [`FallbackCause::EncodeFailed`].
    pub async fn compress(
        &self,
        asset: &SourceAsset,
        params: CompressionParameters,
    ) -> CompressionResult {
        let codec = Arc::clone(&self.codec);
        let owned = asset.clone();
        let task =
            tokio::task::spawn_blocking(move || compress_with(codec.as_ref(), &owned, params));
        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!("compression task failed: {e}");
                CompressionResult::passthrough(asset, FallbackCause::EncodeFailed)
            }
        }
    }

    /// Synchronous form of [`compress`](Self::compress), for callers already
    /// on a worker thread.
    pub fn compress_blocking(
        &self,
        asset: &SourceAsset,
        params: CompressionParameters,
    ) -> CompressionResult {
        compress_with(self.codec.as_ref(), asset, params)
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Core pipeline
// ---------------------------------------------------------------------------

fn compress_with(
    codec: &dyn ImageCodec,
    asset: &SourceAsset,
    params: CompressionParameters,
) -> CompressionResult {
    if !asset.is_image() {
        debug!(
            "'{}': {} is not an image, passing through",
            asset.name, asset.media_type
        );
        return CompressionResult::passthrough(asset, FallbackCause::NotAnImage);
    }

    // Output encoding follows the declared type; without a known mapping the
    // asset cannot be processed as what it claims to be.
    let Some(format) = ImageFormat::from_mime_type(asset.media_type.to_ascii_lowercase()) else {
        warn!("'{}': no codec for {}", asset.name, asset.media_type);
        return CompressionResult::passthrough(asset, FallbackCause::DecodeFailed);
    };

    let decoded = match codec.decode(&asset.bytes) {
        Ok(image) => image,
        Err(e) => {
            warn!("'{}': {e}", asset.name);
            return CompressionResult::passthrough(asset, FallbackCause::DecodeFailed);
        }
    };

    let width = decoded.width();
    let target_width = params.max_width.min(width);
    let raster = if target_width < width {
        debug!("'{}': resizing {width}px -> {target_width}px", asset.name);
        // Width bound only; height follows from the aspect ratio.
        decoded.resize(target_width, u32::MAX, RESIZE_FILTER)
    } else {
        decoded
    };

    let candidate = match codec.encode(&raster, format, params.quality) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("'{}': {e}", asset.name);
            return CompressionResult::passthrough(asset, FallbackCause::EncodeFailed);
        }
    };

    // Strictly larger loses; an equal-size candidate is still a valid result.
    if candidate.len() > asset.bytes.len() {
        debug!(
            "'{}': candidate {} bytes > original {} bytes, keeping original",
            asset.name,
            candidate.len(),
            asset.bytes.len()
        );
        return CompressionResult::passthrough(asset, FallbackCause::SizeRegression);
    }

    CompressionResult {
        bytes: candidate,
        media_type: asset.media_type.clone(),
        original_size: asset.bytes.len(),
        fallback: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
