use egui::TextureHandle;
use qrstamp_business::{
    BatchSession, PageRasterizer, PlacementSession, StampConfig, default_rasterizer,
};

use crate::utils::file_picker::{FilePicker, SystemFilePicker};
use crate::widgets::Notice;

/// The tool shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Placement,
    Batch,
}

#[derive(Default)]
pub struct PlacementPageState {
    pub session: PlacementSession,
    /// Payload lines as typed by the user.
    pub payload_text: String,
    pub texture: Option<TextureHandle>,
}

#[derive(Default)]
pub struct BatchPageState {
    pub session: BatchSession,
    pub texture: Option<TextureHandle>,
}

/// The main application state.
pub struct State {
    pub tool: Tool,
    pub placement: PlacementPageState,
    pub batch: BatchPageState,
    /// Pending modal notice, shown until acknowledged.
    pub notice: Option<Notice>,
    pub picker: Box<dyn FilePicker>,
    pub rasterizer: Box<dyn PageRasterizer>,
}

impl Default for State {
    fn default() -> Self {
        Self::new(
            StampConfig::default(),
            Box::new(SystemFilePicker),
            default_rasterizer(),
        )
    }
}

impl State {
    pub fn new(
        config: StampConfig,
        picker: Box<dyn FilePicker>,
        rasterizer: Box<dyn PageRasterizer>,
    ) -> Self {
        Self {
            tool: Tool::default(),
            placement: PlacementPageState {
                session: PlacementSession::new(config.clone()),
                ..Default::default()
            },
            batch: BatchPageState {
                session: BatchSession::new(config),
                ..Default::default()
            },
            notice: None,
            picker,
            rasterizer,
        }
    }
}
