//! The batch tool: a roster merged with a PDF template into one document.

use std::path::{Path, PathBuf};

use crate::compositor::{Compositor, PdfAccumulator, StampEntry};
use crate::config::StampConfig;
use crate::error::{Result, StampError};
use crate::preview::Preview;
use crate::qr::generate_qr;
use crate::roster::{Roster, load_roster};
use crate::selection::{PlacementRect, SelectionTracker};
use crate::source::{PageRasterizer, SourceSurface};

/// Where a batch session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    NoTemplate,
    TemplateLoaded,
    RosterLoaded,
    PlacementSet,
    ReadyToGenerate,
    Generated,
}

/// Result of a successful batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutput {
    pub path: PathBuf,
    pub pages: usize,
    /// Placement the document was stamped with.
    pub rect: PlacementRect,
}

#[derive(Debug, Default)]
pub struct BatchSession {
    config: StampConfig,
    template: Option<SourceSurface>,
    preview: Option<Preview>,
    roster: Option<Roster>,
    tracker: SelectionTracker,
    last_output: Option<BatchOutput>,
}

impl BatchSession {
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

    pub fn load_template(&mut self, path: &Path, rasterizer: &dyn PageRasterizer) -> Result<()> {
        let template = SourceSurface::open_pdf(path, rasterizer)?;
        self.set_template(template);
        Ok(())
    }

    /// Replaces the template; the placement is cleared, the roster is kept.
    pub fn set_template(&mut self, template: SourceSurface) {
        let preview = template.preview(self.config.preview_max);
        self.tracker
            .reset(preview.scale, (preview.width(), preview.height()));
        self.template = Some(template);
        self.preview = Some(preview);
        self.last_output = None;
    }

    pub fn load_roster(&mut self, path: &Path) -> Result<&Roster> {
        let roster = load_roster(path)?;
        Ok(self.set_roster(roster))
    }

    pub fn set_roster(&mut self, roster: Roster) -> &Roster {
        self.last_output = None;
        self.roster.insert(roster)
    }

    pub fn template(&self) -> Option<&SourceSurface> {
        self.template.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    /// Drags that move the rectangle also invalidate [`Self::last_output`].
    pub fn tracker_mut(&mut self) -> &mut SelectionTracker {
        &mut self.tracker
    }

    pub fn placement(&self) -> Option<PlacementRect> {
        self.tracker.placement()
    }

    pub fn set_placement(&mut self, rect: PlacementRect) {
        self.last_output = None;
        self.tracker.set_placement(rect);
    }

    /// The last document written, while the placement it used is current.
    pub fn last_output(&self) -> Option<&BatchOutput> {
        let placement = self.placement()?;
        self.last_output
            .as_ref()
            .filter(|output| output.rect == placement)
    }

    pub fn stage(&self) -> BatchStage {
        if self.template.is_none() {
            return BatchStage::NoTemplate;
        }
        match (self.roster.is_some(), self.placement().is_some()) {
            (true, true) if self.last_output().is_some() => BatchStage::Generated,
            (true, true) => BatchStage::ReadyToGenerate,
            (true, false) => BatchStage::RosterLoaded,
            (false, true) => BatchStage::PlacementSet,
            (false, false) => BatchStage::TemplateLoaded,
        }
    }

    /// Checks prerequisites in order: template, roster, placement.
    fn ready(&self) -> Result<(&SourceSurface, &Roster, PlacementRect)> {
        let template = self.template.as_ref().ok_or(StampError::NoTemplate)?;
        let roster = self.roster.as_ref().ok_or(StampError::NoRoster)?;
        let rect = self.placement().ok_or(StampError::NoPlacement)?;
        Ok((template, roster, rect))
    }

    /// Fails with the first missing prerequisite, if any.
    ///
    /// Front-ends call this before asking where to save.
    pub fn check_ready(&self) -> Result<()> {
        self.ready().map(|_| ())
    }

    /// Writes the combined document to `output`.
    ///
    /// Row `i` contributes `amount` consecutive pages, each a copy of the
    /// template's first page with the row's QR code in the placement
    /// rectangle and its name in the bottom-right corner.
    pub fn generate(&mut self, output: &Path) -> Result<&BatchOutput> {
        let (template, roster, rect) = self.ready()?;

        let mut compositor = Box::new(PdfAccumulator::new(
            template.path(),
            rect,
            self.config.label.clone(),
            output,
        )?);
        for row in roster.rows() {
            let qr = generate_qr(&row.link, &self.config.qr)?;
            compositor.stamp(&StampEntry::from(row), &qr)?;
        }
        let pages = compositor.page_count();
        let path = compositor
            .finish()?
            .into_iter()
            .next()
            .unwrap_or_else(|| output.to_path_buf());
        log::info!("Batch wrote {pages} page(s) to {path:?}");

        Ok(self.last_output.insert(BatchOutput { path, pages, rect }))
    }
}
