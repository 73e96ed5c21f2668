//! hellocube - native entry point
//!
//! Opens the demo in a desktop window. Files dropped onto the window go
//! through the same loader as the browser drop target.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::Result;
    use clap::Parser;
    use hellocube_core::config::save_default_config;
    use hellocube_core::{load_config, SceneVariant};
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "hellocube")]
    #[command(about = "Spinning cube demo with drag-and-drop glTF and HDR loading")]
    #[command(version)]
    struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "hellocube.toml")]
        config: PathBuf,

        /// Scene variant (hello-cube, render-scene)
        #[arg(short, long)]
        variant: Option<SceneVariant>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// Write the default configuration to the config path and exit
        #[arg(long)]
        write_config: bool,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        // Initialize logging
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("hellocube v{}", env!("CARGO_PKG_VERSION"));

        if args.write_config {
            save_default_config(&args.config)?;
            info!(path = %args.config.display(), "Wrote default configuration");
            return Ok(());
        }

        let mut config = load_config(&args.config)?;

        // Override variant if specified
        if let Some(variant) = args.variant {
            config.variant = variant;
        }

        info!(variant = %config.variant, "Starting demo");

        hellocube_web::run(config);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The browser build starts from the library's wasm_bindgen entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
