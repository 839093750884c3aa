// Raster codec boundary.
//
// The pipeline talks to image decoding and re-encoding through the
// `ImageCodec` trait, so the compression policy can be exercised without a
// real codec behind it:
//
// - `raster`: RasterCodec, the production implementation over the `image`
//   crate, with per-format encoder dispatch

pub mod raster;

pub use raster::RasterCodec;

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Error type for codec operations.
///
/// These never escape the pipeline; `Compressor` converts them into a
/// fallback result at the boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes could not be decoded as an image.
    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),
    /// The raster could not be re-encoded.
    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),
}

/// Decode/encode capability used by the compression pipeline.
///
/// `decode` sniffs the container format from the bytes themselves, the way
/// browser-side decoders do; the declared media type only gates whether the
/// pipeline attempts processing at all. `encode` must produce bytes in the
/// requested format, which the pipeline derives from the asset's media type
/// so that output always mirrors input.
///
/// # Implementing a test double
///
/// ```no_run
/// use pixpress::codec::{CodecError, ImageCodec};
/// use image::{DynamicImage, ImageFormat};
///
/// struct BlankCodec;
///
/// impl ImageCodec for BlankCodec {
///     fn decode(&self, _bytes: &[u8]) -> Result<DynamicImage, CodecError> {
///         Ok(DynamicImage::new_rgb8(4, 4))
///     }
///     fn encode(
///         &self,
///         _image: &DynamicImage,
///         _format: ImageFormat,
///         _quality: u8,
///     ) -> Result<Vec<u8>, CodecError> {
///         Ok(vec![0; 16])
///     }
/// }
/// ```
pub trait ImageCodec: Send + Sync {
    /// Decode encoded bytes into a raster.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Re-encode a raster in `format` at the given quality (0-100).
    ///
    /// Quality applies to lossy encodings; lossless ones may ignore it.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError>;
}
