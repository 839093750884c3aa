//! Pixpress: client-side image compression for upload flows.
//!
//! The crate provides:
//! - The compression pipeline (`pipeline`): resize and re-encode an image,
//!   returning the original whenever compression does not pay off
//! - Input value types (`asset`) and the injectable codec boundary (`codec`)
//! - An upload-widget state reducer (`widget`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use pixpress::asset::{CompressionParameters, SourceAsset};
//! use pixpress::pipeline::Compressor;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let asset = SourceAsset::new(bytes, "image/png", "photo.png");
//!
//! let result = Compressor::new().compress_blocking(&asset, CompressionParameters::new(720, 80));
//! assert!(result.bytes.len() <= asset.bytes.len());
//! println!("compressed to {}%", result.compression_rate_display());
//! ```

pub mod asset;
pub mod codec;
pub mod io;
pub mod pipeline;
pub mod widget;

#[cfg(feature = "cli")]
pub mod cli;
