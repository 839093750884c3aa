// Input-side value types for the compression pipeline.
//
// A `SourceAsset` is one user-selected file held in memory: the raw encoded
// bytes plus the declared media type and filename. `CompressionParameters`
// carries the per-call resize/quality targets. Both are plain data; the
// pipeline never mutates an asset.

/// Default maximum output width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 1080;

/// Default re-encode quality (0-100, JPEG scale).
pub const DEFAULT_QUALITY: u8 = 80;

// ---------------------------------------------------------------------------
// SourceAsset
// ---------------------------------------------------------------------------

/// A single in-memory file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAsset {
    /// Raw encoded bytes, exactly as read from the originating file.
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    /// Original filename. Display only; never drives processing decisions.
    pub name: String,
}

impl SourceAsset {
    /// Create an asset from raw bytes and a declared media type.
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            name: name.into(),
        }
    }

    /// Whether the declared media type is in the `image/` family.
    ///
    /// Media types are case-insensitive (RFC 2045), so `Image/PNG` counts.
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Whether a media type string is in the `image/` family.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

// ---------------------------------------------------------------------------
// CompressionParameters
// ---------------------------------------------------------------------------

/// Per-call resize and re-encode targets.
///
/// No validation happens here; out-of-range quality values are clamped by
/// the codec itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionParameters {
    /// Maximum output width in pixels. Narrower images are never upscaled.
    pub max_width: u32,
    /// Re-encode quality in `[0, 100]`. Applies to lossy output encodings;
    /// lossless encodings ignore it.
    pub quality: u8,
}

impl CompressionParameters {
    /// Parameters with an explicit width cap and quality.
    pub fn new(max_width: u32, quality: u8) -> Self {
        Self { max_width, quality }
    }
}

impl Default for CompressionParameters {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_family_gate() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("image/jpeg"));
        assert!(is_image_media_type("image/x-unknown"));
        assert!(!is_image_media_type("application/pdf"));
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type("imagery/png"));
        assert!(!is_image_media_type("image"));
        assert!(!is_image_media_type(""));
    }

    #[test]
    fn image_family_gate_is_case_insensitive() {
        assert!(is_image_media_type("Image/PNG"));
        assert!(is_image_media_type("IMAGE/JPEG"));
        assert!(!is_image_media_type("Application/PDF"));
    }

    #[test]
    fn gate_survives_non_ascii_media_types() {
        // Slicing must not panic on multi-byte characters near the prefix.
        assert!(!is_image_media_type("imagé/png"));
        assert!(!is_image_media_type("ütf8/everywhere"));
    }

    #[test]
    fn asset_accessors() {
        let asset = SourceAsset::new(vec![1, 2, 3], "image/gif", "pixel.gif");
        assert!(asset.is_image());
        assert_eq!(asset.size(), 3);
        assert_eq!(asset.name, "pixel.gif");
    }

    #[test]
    fn parameter_defaults() {
        let params = CompressionParameters::default();
        assert_eq!(params.max_width, DEFAULT_MAX_WIDTH);
        assert_eq!(params.quality, DEFAULT_QUALITY);
        assert_eq!(params, CompressionParameters::new(1080, 80));
    }
}
