// Command-line front end for the compression pipeline.
//
// Plays the role of the upload page for files on disk: one `compress`
// invocation is one file selection, `batch` is a multi-select. Pipeline
// fallbacks are reported but are not errors; only I/O failures produce a
// nonzero exit code.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::asset::{CompressionParameters, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use crate::io::{self, CompressStats};
use crate::pipeline::Compressor;
use crate::widget::DEFAULT_ACCEPTED_EXTENSIONS;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Image compression for upload flows.
#[derive(Parser, Debug)]
#[command(
    name = "pixpress",
    version,
    about = "Resize and re-encode images, keeping the original when compression does not pay off",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress a single image file.
    Compress(CompressArgs),
    /// Compress many image files into a directory.
    Batch(BatchArgs),
    /// Decode an image and print its dimensions without re-encoding.
    Inspect(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// Maximum output width in pixels (images are never upscaled).
    #[arg(long = "max-width", short = 'w', default_value_t = DEFAULT_MAX_WIDTH)]
    max_width: u32,

    /// Re-encode quality (0-100).
    #[arg(long, short = 'Q', value_parser = clap::value_parser!(u8).range(0..=100), default_value_t = DEFAULT_QUALITY)]
    quality: u8,
}

impl ParamArgs {
    fn to_params(&self) -> CompressionParameters {
        CompressionParameters::new(self.max_width, self.quality)
    }
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Input image file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file (default: input with a `.min` suffix before the extension).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Input image files.
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    inputs: Vec<PathBuf>,

    /// Directory the outputs are written into, one per input.
    #[arg(long = "out-dir", short = 'o', value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Skip inputs whose extension is not an accepted image type.
    #[arg(long = "images-only")]
    images_only: bool,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Input image file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("pixpress".to_string())
        .chain(args.iter().cloned())
        .collect();
    let _ = Cli::try_parse_from(argv);
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Default output path: `photo.png` becomes `photo.min.png`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{stem}.min.{}", ext.to_string_lossy()),
        None => format!("{stem}.min"),
    };
    input.with_file_name(name)
}

fn check_overwrite(path: &Path, force: bool) -> bool {
    if path.exists() && !force {
        eprintln!(
            "pixpress: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return false;
    }
    true
}

fn report_stats(input: &Path, output: &Path, stats: &CompressStats, quiet: bool) {
    if quiet {
        return;
    }
    match stats.fallback {
        None => eprintln!(
            "pixpress: {}: {} -> {} bytes ({:.4}%) -> {}",
            input.display(),
            stats.input_size,
            stats.output_size,
            stats.rate,
            output.display()
        ),
        Some(cause) => eprintln!(
            "pixpress: {}: kept original, {} bytes ({cause}) -> {}",
            input.display(),
            stats.input_size,
            output.display()
        ),
    }
}

fn stats_json(input: &Path, output: &Path, stats: &CompressStats) -> serde_json::Value {
    serde_json::json!({
        "input": input.display().to_string(),
        "output": output.display().to_string(),
        "media_type": stats.media_type,
        "input_size": stats.input_size,
        "output_size": stats.output_size,
        "rate": format!("{:.4}", stats.rate),
        "fallback": stats.fallback.map(|c| c.to_string()),
        "input_sha256": stats.input_sha256.map(hex),
        "output_sha256": stats.output_sha256.map(hex),
    })
}

fn hex(digest: [u8; 32]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Compress command
// ---------------------------------------------------------------------------

fn cmd_compress(cli: &Cli, args: &CompressArgs) -> i32 {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    if !check_overwrite(&output, cli.force) {
        return 1;
    }

    let compressor = Compressor::new();
    let stats = match io::compress_file(&compressor, &args.input, &output, args.params.to_params())
    {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("pixpress: {e}");
            return 1;
        }
    };

    report_stats(&args.input, &output, &stats, cli.quiet);
    if cli.json_output {
        let json = serde_json::json!({
            "command": "compress",
            "files": [stats_json(&args.input, &output, &stats)],
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    }

    0
}

// ---------------------------------------------------------------------------
// Batch command
// ---------------------------------------------------------------------------

fn cmd_batch(cli: &Cli, args: &BatchArgs) -> i32 {
    if let Err(e) = std::fs::create_dir_all(&args.out_dir) {
        eprintln!("pixpress: out dir: {}: {e}", args.out_dir.display());
        return 1;
    }

    let inputs: Vec<&PathBuf> = if args.images_only {
        args.inputs
            .iter()
            .filter(|path| {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                let keep = name.as_deref().is_some_and(|n| {
                    crate::widget::accepts_extension(n, DEFAULT_ACCEPTED_EXTENSIONS)
                });
                if !keep && !cli.quiet {
                    eprintln!("pixpress: skipping non-image input: {}", path.display());
                }
                keep
            })
            .collect()
    } else {
        args.inputs.iter().collect()
    };

    let params = args.params.to_params();
    let mut exit_code = 0;

    // Resolve and validate every output before touching any file.
    let mut jobs: Vec<(&Path, PathBuf)> = Vec::new();
    for input in inputs {
        let Some(name) = input.file_name() else {
            eprintln!("pixpress: input has no file name: {}", input.display());
            exit_code = 1;
            continue;
        };
        let output = args.out_dir.join(name);
        if !check_overwrite(&output, cli.force) {
            exit_code = 1;
            continue;
        }
        jobs.push((input.as_path(), output));
    }

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = {
        use rayon::prelude::*;
        jobs.par_iter()
            .map(|(input, output)| {
                io::compress_file(&Compressor::new(), input, output, params)
            })
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = jobs
        .iter()
        .map(|(input, output)| io::compress_file(&Compressor::new(), input, output, params))
        .collect();

    let mut reports = Vec::new();
    for ((input, output), outcome) in jobs.iter().zip(outcomes) {
        match outcome {
            Ok(stats) => {
                report_stats(input, output, &stats, cli.quiet);
                reports.push(stats_json(input, output, &stats));
            }
            Err(e) => {
                eprintln!("pixpress: {e}");
                exit_code = 1;
            }
        }
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "batch",
            "files": reports,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    }

    exit_code
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn cmd_inspect(cli: &Cli, args: &InspectArgs) -> i32 {
    let bytes = match std::fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("pixpress: {}: {e}", args.input.display());
            return 1;
        }
    };

    let media_type = io::media_type_for_path(&args.input);
    let decoded = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("pixpress: {}: not a decodable image: {e}", args.input.display());
            return 1;
        }
    };

    if !cli.quiet {
        println!("file:        {}", args.input.display());
        println!("media type:  {media_type}");
        println!("size:        {} bytes", bytes.len());
        println!("dimensions:  {}x{}", decoded.width(), decoded.height());
        println!("color type:  {:?}", decoded.color());
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "inspect",
            "file": args.input.display().to_string(),
            "media_type": media_type,
            "size": bytes.len(),
            "width": decoded.width(),
            "height": decoded.height(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    }

    0
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("pixpress version {version} (Rust), Copyright (C) pixpress contributors");
    eprintln!("Licensed under the MIT license");

    let file_io = cfg!(feature = "file-io") as u8;
    let parallel = cfg!(feature = "parallel") as u8;

    eprintln!("FILE_IO={file_io}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("DEFAULT_MAX_WIDTH={DEFAULT_MAX_WIDTH}");
    eprintln!("DEFAULT_QUALITY={DEFAULT_QUALITY}");
    eprintln!(
        "ACCEPTED_EXTENSIONS={}",
        DEFAULT_ACCEPTED_EXTENSIONS.join(",")
    );

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    let default_filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match &cli.command {
        Cmd::Compress(args) => cmd_compress(&cli, args),
        Cmd::Batch(args) => cmd_batch(&cli, args),
        Cmd::Inspect(args) => cmd_inspect(&cli, args),
        Cmd::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
