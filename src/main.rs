fn main() {
    #[cfg(feature = "cli")]
    pixpress::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("pixpress: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
