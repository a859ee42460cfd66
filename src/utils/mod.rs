use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber, INFO unless `RUST_LOG` says otherwise.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    // ANSI colors render as garbage in the Windows console
    #[cfg(target_os = "windows")]
    let use_ansi = false;

    #[cfg(not(target_os = "windows"))]
    let use_ansi = true;

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with_ansi(use_ansi)
            .with_target(false)
            .with_line_number(true)
            .with_file(true)
            .finish(),
    )?;
    Ok(())
}
