//! `qrstamp place`: one stamped copy of the source per link.

use std::io::{IsTerminal as _, Read as _};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use qrstamp_business::{
    BlankPageRasterizer, PlacementRect, PlacementSession, QrSettings, StampConfig,
};
use tracing::{info, instrument, warn};

use super::exceeds;
use crate::output::Output;

pub struct PlaceArgs {
    pub source: PathBuf,
    pub rect: PlacementRect,
    pub output_dir: PathBuf,
    pub links_file: Option<PathBuf>,
    pub links: Vec<String>,
}

#[instrument(skip_all, name = "place", fields(source = %args.source.display()))]
pub fn run_place(args: PlaceArgs, qr: QrSettings, output: &Output) -> Result<()> {
    let text = payload_text(args.links_file.as_deref(), &args.links)?;
    let written = place(&args, qr, &text)?;

    for path in &written {
        output.path(path);
    }
    output.success(format!("Generated {} file(s)", written.len()));
    Ok(())
}

/// Stamps `text` (one link per line) onto copies of the source.
pub fn place(args: &PlaceArgs, qr: QrSettings, text: &str) -> Result<Vec<PathBuf>> {
    let config = StampConfig::default()
        .with_qr(qr)
        .with_output_dir(&args.output_dir);
    let mut session = PlacementSession::new(config);

    // The preview is never shown, so PDFs need no real rendering.
    session
        .load_source(&args.source, &BlankPageRasterizer)
        .with_context(|| format!("Failed to load {}", args.source.display()))?;
    if let Some(source) = session.source()
        && exceeds(&args.rect, source.dimensions())
    {
        let (w, h) = source.dimensions();
        warn!(rect = %args.rect, width = w, height = h, "Rectangle extends past the source");
    }
    session.set_placement(args.rect);

    let written = session.generate(text)?;
    info!(count = written.len(), "Placement finished");
    Ok(written)
}

fn payload_text(links_file: Option<&Path>, links: &[String]) -> Result<String> {
    if let Some(path) = links_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read links from {}", path.display()));
    }
    if !links.is_empty() {
        return Ok(links.join("\n"));
    }
    if !std::io::stdin().is_terminal() {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read links from stdin")?;
        return Ok(buffer);
    }
    Ok(String::new())
}
