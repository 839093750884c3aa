// File-level helpers around the pipeline.
//
// `compress_file()` wraps the in-memory pipeline with disk I/O for the CLI
// and tests: read the input, guess its media type from the extension, run
// the pipeline, write the output. Optionally computes SHA-256 digests of
// both sides (feature-gated behind `file-io`).
//
// Pipeline fallbacks are not errors here; the output file is written either
// way and the cause is reported through `CompressStats`.

use std::path::{Path, PathBuf};

#[cfg(feature = "file-io")]
use sha2::Digest;

use image::ImageFormat;
use thiserror::Error;

use crate::asset::{CompressionParameters, SourceAsset};
use crate::pipeline::{Compressor, FallbackCause};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Input file size in bytes.
    pub input_size: u64,
    /// Output file size in bytes.
    pub output_size: u64,
    /// Media type inferred from the input extension.
    pub media_type: String,
    /// Why the original was kept, if it was.
    pub fallback: Option<FallbackCause>,
    /// Output size over input size, as a percentage.
    pub rate: f64,
    /// SHA-256 of the input file (if the `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
    /// SHA-256 of the output file (if the `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// The input file could not be read.
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The output file could not be written.
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Media type guessing
// ---------------------------------------------------------------------------

/// Media type for a path, by extension.
///
/// Unknown extensions map to `application/octet-stream`, which the pipeline
/// passes through untouched.
pub fn media_type_for_path(path: &Path) -> String {
    path.extension()
        .and_then(ImageFormat::from_extension)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

// ---------------------------------------------------------------------------
// compress_file
// ---------------------------------------------------------------------------

/// Compress one file on disk.
///
/// The media type is inferred from the input extension; files that are not
/// images come back unchanged, matching the in-memory pipeline. The output
/// is written even on fallback, so the destination always exists once this
/// returns `Ok`.
pub fn compress_file(
    compressor: &Compressor,
    input: &Path,
    output: &Path,
    params: CompressionParameters,
) -> Result<CompressStats, IoError> {
    let bytes = std::fs::read(input).map_err(|source| IoError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    #[cfg(feature = "file-io")]
    let input_sha256 = Some(sha256(&bytes));
    #[cfg(not(feature = "file-io"))]
    let input_sha256: Option<[u8; 32]> = None;

    let media_type = media_type_for_path(input);
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let asset = SourceAsset::new(bytes, media_type, name);

    let result = compressor.compress_blocking(&asset, params);

    std::fs::write(output, &result.bytes).map_err(|source| IoError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(sha256(&result.bytes));
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = None;

    let rate = result.compression_rate();
    Ok(CompressStats {
        input_size: result.original_size as u64,
        output_size: result.bytes.len() as u64,
        media_type: result.media_type,
        fallback: result.fallback,
        rate,
        input_sha256,
        output_sha256,
    })
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::fs::File;
    use std::io::Write;

    fn write_temp_file(name: &str, data: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join("pixpress_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    fn cleanup_temp_files(paths: &[&Path]) {
        for p in paths {
            let _ = std::fs::remove_file(p);
        }
    }

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn media_type_guessing() {
        assert_eq!(media_type_for_path(Path::new("a.png")), "image/png");
        assert_eq!(media_type_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(media_type_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(
            media_type_for_path(Path::new("a.txt")),
            "application/octet-stream"
        );
        assert_eq!(
            media_type_for_path(Path::new("noext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn compress_file_shrinks_a_large_png() {
        let data = gradient_png(1600, 1200);
        let input = write_temp_file("large.png", &data);
        let output = std::env::temp_dir()
            .join("pixpress_io_test")
            .join("large_out.png");

        let stats = compress_file(
            &Compressor::new(),
            &input,
            &output,
            CompressionParameters::new(400, 80),
        )
        .unwrap();

        assert_eq!(stats.input_size, data.len() as u64);
        assert_eq!(stats.media_type, "image/png");
        assert!(stats.fallback.is_none());
        assert!(stats.output_size <= stats.input_size);
        assert!(stats.rate <= 100.0);

        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len() as u64, stats.output_size);
        assert_eq!(image::load_from_memory(&written).unwrap().width(), 400);

        cleanup_temp_files(&[&input, &output]);
    }

    #[test]
    fn non_image_file_passes_through() {
        let data = b"plain text, nothing to see";
        let input = write_temp_file("notes.txt", data);
        let output = std::env::temp_dir()
            .join("pixpress_io_test")
            .join("notes_out.txt");

        let stats = compress_file(
            &Compressor::new(),
            &input,
            &output,
            CompressionParameters::default(),
        )
        .unwrap();

        assert_eq!(stats.fallback, Some(FallbackCause::NotAnImage));
        assert_eq!(stats.output_size, stats.input_size);
        assert_eq!(std::fs::read(&output).unwrap(), data);

        cleanup_temp_files(&[&input, &output]);
    }

    #[cfg(feature = "file-io")]
    #[test]
    fn sha256_digests_computed() {
        let data = gradient_png(64, 48);
        let input = write_temp_file("digest.png", &data);
        let output = std::env::temp_dir()
            .join("pixpress_io_test")
            .join("digest_out.png");

        let stats = compress_file(
            &Compressor::new(),
            &input,
            &output,
            CompressionParameters::default(),
        )
        .unwrap();

        assert!(stats.input_sha256.is_some());
        assert!(stats.output_sha256.is_some());
        assert_eq!(stats.input_sha256, Some(sha256(&data)));
        assert_eq!(
            stats.output_sha256,
            Some(sha256(&std::fs::read(&output).unwrap()))
        );

        cleanup_temp_files(&[&input, &output]);
    }

    #[test]
    fn missing_input_reports_read_error() {
        let missing = std::env::temp_dir()
            .join("pixpress_io_test")
            .join("does_not_exist.png");
        let output = std::env::temp_dir()
            .join("pixpress_io_test")
            .join("unused_out.png");

        let err = compress_file(
            &Compressor::new(),
            &missing,
            &output,
            CompressionParameters::default(),
        )
        .unwrap_err();

        assert!(matches!(err, IoError::Read { .. }));
        assert!(err.to_string().contains("does_not_exist.png"));
    }
}
