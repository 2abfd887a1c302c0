//! The placement tool: one output file per payload line.

use std::path::{Path, PathBuf};

use crate::compositor::{StampEntry, per_payload_compositor};
use crate::config::StampConfig;
use crate::error::{Result, StampError};
use crate::preview::Preview;
use crate::qr::generate_qr;
use crate::selection::{PlacementRect, SelectionTracker};
use crate::source::{PageRasterizer, SourceSurface};

/// Splits free text into payloads: one per line, trimmed, blanks dropped.
///
/// Fails when nothing is left or when more than `limit` lines remain.
pub fn split_payloads(text: &str, limit: usize) -> Result<Vec<String>> {
    let payloads: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    match payloads.len() {
        0 => Err(StampError::NoPayloads),
        count if count > limit => Err(StampError::TooManyPayloads { count, limit }),
        _ => Ok(payloads),
    }
}

#[derive(Debug, Default)]
pub struct PlacementSession {
    config: StampConfig,
    source: Option<SourceSurface>,
    preview: Option<Preview>,
    tracker: SelectionTracker,
}

impl PlacementSession {
    pub fn new(config: StampConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StampConfig {
        &mut self.config
    }

    pub fn load_source(&mut self, path: &Path, rasterizer: &dyn PageRasterizer) -> Result<()> {
        let source = SourceSurface::open(path, rasterizer)?;
        self.set_source(source);
        Ok(())
    }

    /// Replaces the source, rebuilding the preview and clearing any selection.
    pub fn set_source(&mut self, source: SourceSurface) {
        let preview = source.preview(self.config.preview_max);
        self.tracker
            .reset(preview.scale, (preview.width(), preview.height()));
        self.source = Some(source);
        self.preview = Some(preview);
    }

    pub fn source(&self) -> Option<&SourceSurface> {
        self.source.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut SelectionTracker {
        &mut self.tracker
    }

    pub fn placement(&self) -> Option<PlacementRect> {
        self.tracker.placement()
    }

    /// Sets the placement directly in source coordinates.
    pub fn set_placement(&mut self, rect: PlacementRect) {
        self.tracker.set_placement(rect);
    }

    /// Stamps every payload line onto its own copy of the source.
    ///
    /// Returns the written paths in payload order. Nothing is written when
    /// the payload text is rejected.
    pub fn generate(&self, payload_text: &str) -> Result<Vec<PathBuf>> {
        let source = self.source.as_ref().ok_or(StampError::NoSource)?;
        let rect = self.placement().ok_or(StampError::NoPlacement)?;
        let payloads = split_payloads(payload_text, self.config.payload_line_limit)?;

        let codes = payloads
            .iter()
            .map(|payload| generate_qr(payload, &self.config.qr))
            .collect::<Result<Vec<_>>>()?;

        std::fs::create_dir_all(&self.config.output_dir)?;
        let mut compositor = per_payload_compositor(source, rect, &self.config.output_dir);
        for (payload, qr) in payloads.iter().zip(&codes) {
            compositor.stamp(&StampEntry::single(payload.as_str()), qr)?;
        }
        let written = compositor.finish()?;
        log::info!("Placement wrote {} file(s)", written.len());
        Ok(written)
    }
}
