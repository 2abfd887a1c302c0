//! Shared color constants for the UI.

use egui::Color32;

/// Success notices.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Error notices.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Outline of the placement rectangle on the preview canvas.
pub const SELECTION_STROKE: Color32 = Color32::RED;
