use std::path::{Path, PathBuf};

use egui_kittest::Harness;
use qrstamp_business::{BlankPageRasterizer, StampConfig};
use qrstamp_ui::QrStampApp;
use qrstamp_ui::state::State;
use qrstamp_ui::utils::file_picker::PresetFilePicker;

pub struct TestCtx<'a> {
    dir: tempfile::TempDir,
    harness: Harness<'a, QrStampApp>,
}

impl<'a> TestCtx<'a> {
    /// An app whose file dialogs answer with `picker` and whose outputs land
    /// in a scratch directory.
    pub fn new_app(picker: impl FnOnce(&Path) -> PresetFilePicker) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().expect("scratch dir");
        let state = State::new(
            StampConfig::default().with_output_dir(dir.path()),
            Box::new(picker(dir.path())),
            Box::new(BlankPageRasterizer),
        );
        let app = QrStampApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self { dir, harness }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, QrStampApp> {
        &mut self.harness
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Clicks the button labelled `label` and lets the UI settle.
pub fn click(harness: &mut Harness<'_, QrStampApp>, label: &str) {
    use kittest::Queryable as _;

    harness.get_by_label(label).click();
    harness.run();
}
