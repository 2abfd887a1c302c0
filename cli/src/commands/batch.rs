//! `qrstamp batch`: a roster merged with a PDF template.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use qrstamp_business::{
    BatchOutput, BatchSession, BlankPageRasterizer, PlacementRect, QrSettings, StampConfig,
};
use tracing::{debug, instrument, warn};

use super::exceeds;
use crate::output::Output;

pub struct BatchArgs {
    pub template: PathBuf,
    pub roster: PathBuf,
    pub rect: PlacementRect,
    pub output: PathBuf,
}

#[instrument(skip_all, name = "batch", fields(template = %args.template.display()))]
pub fn run_batch(args: BatchArgs, qr: QrSettings, output: &Output) -> Result<()> {
    let result = batch(&args, qr)?;
    if result.pages == 0 {
        output.warning("Every roster row has Amount 0; the PDF has no pages");
    }
    output.path(&result.path);
    output.success(format!("QR PDF Generated: {} page(s)", result.pages));
    Ok(())
}

pub fn batch(args: &BatchArgs, qr: QrSettings) -> Result<BatchOutput> {
    let mut session = BatchSession::new(StampConfig::default().with_qr(qr));

    session
        .load_template(&args.template, &BlankPageRasterizer)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;
    if let Some(template) = session.template()
        && exceeds(&args.rect, template.dimensions())
    {
        warn!(rect = %args.rect, "Rectangle extends past the template page");
    }

    let roster = session
        .load_roster(&args.roster)
        .with_context(|| format!("Failed to load CSV {}", args.roster.display()))?;
    debug!(
        rows = roster.len(),
        pages = roster.total_pages(),
        "Roster loaded"
    );

    session.set_placement(args.rect);
    let result = session
        .generate(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    Ok(result.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrstamp_business::StampError;
    use qrstamp_business::test_utils::write_blank_pdf;

    fn setup(roster: &str) -> (tempfile::TempDir, BatchArgs) {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.pdf");
        write_blank_pdf(&template, &[(612.0, 792.0)]);
        let roster_path = dir.path().join("roster.csv");
        std::fs::write(&roster_path, roster).unwrap();
        let args = BatchArgs {
            template,
            roster: roster_path,
            rect: PlacementRect::from_corners((50, 700), (150, 750)),
            output: dir.path().join("out.pdf"),
        };
        (dir, args)
    }

    #[test]
    fn test_batch_counts_pages() {
        let (_dir, args) =
            setup("Link,Name,Amount\nhttps://a.example,Ann,2\nhttps://b.example,Ben,1\n");
        let result = batch(&args, QrSettings::default()).unwrap();
        assert_eq!(result.pages, 3);
        assert_eq!(result.path, args.output);
    }

    #[test]
    fn test_invalid_amount_is_reported_with_row() {
        let (_dir, args) = setup("Link,Name,Amount\nhttps://a.example,Ann,lots\n");
        let err = batch(&args, QrSettings::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load CSV"));
        assert!(matches!(
            err.downcast_ref::<StampError>(),
            Some(StampError::InvalidAmount { .. })
        ));
        assert!(!args.output.exists());
    }
}
