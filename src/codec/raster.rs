// Production codec over the `image` crate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageFormat};

use super::{CodecError, ImageCodec};

/// Codec backed by the `image` crate.
///
/// Encoding dispatches on the requested format: JPEG honors `quality`, PNG
/// always uses the strongest compression with adaptive filtering, and every
/// other format uses its default encoder settings. Formats the `image` crate
/// cannot encode yield an `Encode` error, which the pipeline turns into a
/// fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        image::load_from_memory(bytes).map_err(CodecError::Decode)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buf = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => image
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
                .map_err(CodecError::Encode)?,
            ImageFormat::Png => image
                .write_with_encoder(PngEncoder::new_with_quality(
                    &mut buf,
                    CompressionType::Best,
                    PngFilter::Adaptive,
                ))
                .map_err(CodecError::Encode)?,
            other => image
                .write_to(&mut buf, other)
                .map_err(CodecError::Encode)?,
        }
        Ok(buf.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
