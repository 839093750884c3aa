#![no_main]
use libfuzzer_sys::fuzz_target;
use pixpress::asset::{CompressionParameters, SourceAsset};
use pixpress::pipeline::Compressor;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // First bytes pick the declared media type and parameters; the rest is
    // the payload. The pipeline must never panic and never grow the input.
    let media_type = match data[0] % 6 {
        0 => "image/png",
        1 => "image/jpeg",
        2 => "image/gif",
        3 => "image/webp",
        4 => "application/pdf",
        _ => "image/x-unknown",
    };
    let max_width = 1 + (u32::from(data[1]) << 3);
    let quality = data[2] % 101;
    let payload = data[3..].to_vec();

    let asset = SourceAsset::new(payload.clone(), media_type, "fuzz-input");
    let result = Compressor::new()
        .compress_blocking(&asset, CompressionParameters::new(max_width, quality));

    assert!(result.bytes.len() <= payload.len());
    if result.used_fallback() {
        assert_eq!(result.bytes, payload);
    }
});
