//! MLB LED Matrix Scoreboard
//!
//! Drives an RGB LED matrix panel with live MLB scores, standings, and an
//! off-day news/weather ticker.
//!
//! ## Architecture
//! - **Render thread** (std::thread): owns the LED matrix, paints the
//!   selected screen continuously
//! - **Main thread**: runs one of three data-refresh policies, polling the
//!   render thread's liveness as its exit condition
//!
//! The two threads share the data store behind a mutex and one atomic
//! flag (`scrolling_finished`). Render-thread death, whether Ctrl+C or a
//! crash, is the process's shutdown signal.
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/mlb-scoreboard --rows 32 --cols 64 --config config.json
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rpi-led-matrix).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() {
    if let Err(e) = run() {
        // The subscriber may not exist yet when startup fails, so this
        // goes straight to stderr.
        eprintln!("fatal: {e}");
        std::process::exit(1);
    }
}

#[cfg(feature = "hardware")]
fn run() -> Result<(), mlb_scoreboard::Error> {
    use clap::Parser;
    use mlb_scoreboard::config::ScoreboardConfig;
    use mlb_scoreboard::data::Data;
    use mlb_scoreboard::data::source::StatsApi;
    use mlb_scoreboard::render::MainRenderer;
    use mlb_scoreboard::screen::select_screen;
    use mlb_scoreboard::{Error, PanelConfig, refresh, setup_signal_handler};
    use std::path::PathBuf;

    /// MLB scoreboard for RGB LED matrix panels
    #[derive(Parser)]
    #[command(name = "mlb-scoreboard")]
    #[command(about = "MLB scoreboard for an RGB LED matrix")]
    #[command(version)]
    struct Args {
        /// Number of rows on the LED panel
        #[arg(long, default_value = "32")]
        rows: u32,

        /// Number of columns on the LED panel
        #[arg(long, default_value = "64")]
        cols: u32,

        /// Path to the scoreboard config file
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Path to BDF font directory
        #[arg(long, default_value = "fonts/bdf")]
        fonts_dir: PathBuf,

        /// Path to the assets directory (weather icons)
        #[arg(long, default_value = "assets")]
        assets_dir: PathBuf,
    }

    let args = Args::parse();
    let panel = PanelConfig::new(args.rows, args.cols);

    let config = ScoreboardConfig::load(&args.config, panel)?;

    // Log verbosity comes from the config, so the subscriber can only go
    // up after the load; RUST_LOG still wins when set.
    let level = if config.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_ansi(false)
        .compact()
        .init();

    tracing::info!(
        "MLB LED Scoreboard v{} ({}x{})",
        env!("CARGO_PKG_VERSION"),
        panel.cols,
        panel.rows
    );

    // Initial synchronous fetch happens here.
    let source = StatsApi::new(&config.news_url)?;
    let data = Data::new(config.clone(), Box::new(source));

    let running = setup_signal_handler();
    let state = data.state();

    // The matrix wraps raw C handles and cannot cross threads, so the
    // render thread constructs it (and the renderer) itself and reports
    // any setup failure through its return value.
    let render_config = config.clone();
    let render_state = state.clone();
    let scrolling_flag = data.scrolling_flag();
    let render_running = running.clone();
    let render_handle = std::thread::spawn(move || -> Result<(), Error> {
        let renderer = MainRenderer::new(
            render_config,
            render_state,
            scrolling_flag,
            render_running,
            &args.fonts_dir,
            &args.assets_dir,
        )?;
        renderer.run();
        Ok(())
    });

    let screen = {
        let state = state.lock().unwrap();
        select_screen(&config, &state)
    };
    tracing::info!("selected screen: {screen:?}");

    // Blocks until the render thread dies, then surfaces how it died.
    refresh::run(screen, &render_handle, &data);
    render_handle.join().map_err(|_| Error::RenderPanicked)??;

    tracing::info!("render thread exited, shutting down");
    Ok(())
}
