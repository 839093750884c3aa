#![no_main]
use libfuzzer_sys::fuzz_target;
use pixpress::asset::is_image_media_type;
use pixpress::codec::{ImageCodec, RasterCodec};

fuzz_target!(|data: &[u8]| {
    // The media-type gate must never panic, multi-byte text included.
    let text = String::from_utf8_lossy(data);
    let _ = is_image_media_type(&text);

    // The decoder must only ever return errors on arbitrary bytes.
    let _ = RasterCodec.decode(data);
});
