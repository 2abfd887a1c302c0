//! File choices behind a trait so tests can inject paths instead of opening
//! native dialogs.
//!
//! Native builds use `rfd`; every method returns `None` when the user cancels.

use std::path::PathBuf;

/// Extensions accepted as placement sources besides `pdf`.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff", "tif"];

pub trait FilePicker {
    /// An image or PDF to stamp.
    fn pick_source(&self) -> Option<PathBuf>;

    /// A PDF template for the batch tool.
    fn pick_template(&self) -> Option<PathBuf>;

    /// A CSV roster.
    fn pick_roster(&self) -> Option<PathBuf>;

    /// Where to write the combined batch PDF.
    fn save_pdf(&self) -> Option<PathBuf>;
}

/// File picker backed by the system's native dialogs.
#[derive(Default)]
pub struct SystemFilePicker;

impl FilePicker for SystemFilePicker {
    fn pick_source(&self) -> Option<PathBuf> {
        let mut all = IMAGE_EXTENSIONS.to_vec();
        all.push("pdf");

        let path = rfd::FileDialog::new()
            .add_filter("Image or PDF", all.as_slice())
            .add_filter("Image", IMAGE_EXTENSIONS.as_slice())
            .add_filter("PDF", &["pdf"])
            .set_title("Select an image or PDF")
            .pick_file()?;
        log::info!("User selected source: {:?}", path);
        Some(path)
    }

    fn pick_template(&self) -> Option<PathBuf> {
        let path = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_title("Select a PDF template")
            .pick_file()?;
        log::info!("User selected template: {:?}", path);
        Some(path)
    }

    fn pick_roster(&self) -> Option<PathBuf> {
        let path = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_title("Select a CSV file")
            .pick_file()?;
        log::info!("User selected roster: {:?}", path);
        Some(path)
    }

    fn save_pdf(&self) -> Option<PathBuf> {
        let mut path = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_title("Save combined PDF")
            .set_file_name("output.pdf")
            .save_file()?;
        if path.extension().is_none() {
            path.set_extension("pdf");
        }
        log::info!("User chose output: {:?}", path);
        Some(path)
    }
}

/// Returns fixed paths, for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct PresetFilePicker {
    pub source: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl FilePicker for PresetFilePicker {
    fn pick_source(&self) -> Option<PathBuf> {
        self.source.clone()
    }

    fn pick_template(&self) -> Option<PathBuf> {
        self.template.clone()
    }

    fn pick_roster(&self) -> Option<PathBuf> {
        self.roster.clone()
    }

    fn save_pdf(&self) -> Option<PathBuf> {
        self.output.clone()
    }
}
