use anyhow::{Context, Result};
use tokio::io::BufReader;

use debug_overlay::host::{console, TerminalSurface};
use debug_overlay::{OverlayConfig, OverlayController};

#[tokio::main]
async fn main() -> Result<()> {
    let debug = std::env::args().any(|a| a == "--debug");
    debug_overlay::logging::init(debug);

    let config = OverlayConfig::from_env().context("reading DEBUG_OVERLAY_* configuration")?;
    let mut overlay = OverlayController::new(&config)?;
    tracing::info!(
        session = %overlay.session_id(),
        capacity = config.capacity,
        "debug overlay ready"
    );

    let mut surface = TerminalSurface::new(std::io::stderr());
    println!("Type messages to capture them, ':toggle' to show the overlay, ':help' for more.");

    let reader = BufReader::new(tokio::io::stdin());
    let stats = console::run(reader, &mut overlay, &mut surface)
        .await
        .context("console input failed")?;

    tracing::info!(
        lines = stats.lines,
        captured = stats.captured,
        rejected = stats.rejected,
        "debug overlay shutting down"
    );
    Ok(())
}
