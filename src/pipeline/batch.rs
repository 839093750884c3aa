// Batch helpers: compress many assets with one parameter set.
//
// Each element is independently subject to the fallback contract, so one
// bad asset never affects the others, and results come back in input order.

use crate::asset::{CompressionParameters, SourceAsset};

use super::{CompressionResult, Compressor};

/// Compress a slice of assets sequentially.
pub fn compress_all(
    compressor: &Compressor,
    assets: &[SourceAsset],
    params: CompressionParameters,
) -> Vec<CompressionResult> {
    assets
        .iter()
        .map(|asset| compressor.compress_blocking(asset, params))
        .collect()
}

/// Compress a slice of assets on the rayon thread pool.
///
/// Same ordering guarantee as [`compress_all`].
#[cfg(feature = "parallel")]
pub fn compress_all_parallel(
    compressor: &Compressor,
    assets: &[SourceAsset],
    params: CompressionParameters,
) -> Vec<CompressionResult> {
    use rayon::prelude::*;

    assets
        .par_iter()
        .map(|asset| compressor.compress_blocking(asset, params))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
