use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

use image::{DynamicImage, ImageFormat, RgbImage};

fn bin() -> String {
    env!("CARGO_BIN_EXE_pixpress").to_string()
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf.into_inner()).unwrap();
}

#[test]
fn cli_compress_resizes_a_png() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("photo.out.png");
    write_png(&input, 1200, 900);

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&output)
        .args(["--max-width", "300", "--quality", "80"])
        .status()
        .unwrap();
    assert!(st.success());

    let written = std::fs::read(&output).unwrap();
    assert!(written.len() <= std::fs::metadata(&input).unwrap().len() as usize);
    assert_eq!(image::load_from_memory(&written).unwrap().width(), 300);
}

#[test]
fn cli_compress_defaults_output_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    write_png(&input, 640, 480);

    let st = Command::new(bin())
        .args(["compress", "--max-width", "320"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());
    assert!(dir.path().join("photo.min.png").exists());
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("existing.png");
    write_png(&input, 64, 48);
    std::fs::write(&output, b"already here").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"already here");

    let st = Command::new(bin())
        .arg("--force")
        .arg("compress")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_ne!(std::fs::read(&output).unwrap(), b"already here");
}

#[test]
fn cli_non_image_is_written_unchanged() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.out.txt");
    std::fs::write(&input, b"not an image at all").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"not an image at all");
}

#[test]
fn cli_batch_writes_one_output_per_input() {
    let dir = tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    write_png(&a, 800, 600);
    write_png(&b, 200, 100);

    let st = Command::new(bin())
        .arg("batch")
        .arg(&a)
        .arg(&b)
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--max-width", "400"])
        .status()
        .unwrap();
    assert!(st.success());

    let a_out = std::fs::read(out_dir.join("a.png")).unwrap();
    assert_eq!(image::load_from_memory(&a_out).unwrap().width(), 400);
    // Narrower than the cap: never upscaled.
    let b_out = std::fs::read(out_dir.join("b.png")).unwrap();
    assert_eq!(image::load_from_memory(&b_out).unwrap().width(), 200);
}

#[test]
fn cli_inspect_prints_dimensions() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    write_png(&input, 123, 45);

    let out = Command::new(bin()).arg("inspect").arg(&input).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("123x45"));
    assert!(stdout.contains("image/png"));
}

#[test]
fn cli_json_stats_on_stderr() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("photo.out.png");
    write_png(&input, 400, 300);

    let out = Command::new(bin())
        .args(["--json", "--quiet"])
        .arg("compress")
        .arg(&input)
        .arg(&output)
        .args(["--max-width", "200"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    let json: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(json["command"], "compress");
    let file = &json["files"][0];
    assert_eq!(file["media_type"], "image/png");
    assert!(file["output_size"].as_u64().unwrap() <= file["input_size"].as_u64().unwrap());
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("DEFAULT_MAX_WIDTH=1080"));
    assert!(stderr.contains("DEFAULT_QUALITY=80"));
}
