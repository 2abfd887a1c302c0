//! Modal success/error notices with a single OK button.

use egui::{Context, Id, RichText, Window};
use qrstamp_business::StampError;

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
        }
    }
}

impl From<&StampError> for Notice {
    fn from(err: &StampError) -> Self {
        log::warn!("{err}");
        Self::error(err.to_string())
    }
}

/// Shows `notice` until the user dismisses it with OK or the close button.
pub fn notice_modal(ctx: &Context, notice: &mut Option<Notice>) {
    let Some(current) = notice.as_ref() else {
        return;
    };

    let mut open = true;
    let mut acknowledged = false;
    let color = match current.kind {
        NoticeKind::Success => COLOR_GREEN,
        NoticeKind::Error => COLOR_RED,
    };

    Window::new(current.title())
        .id(Id::new("notice_modal"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(RichText::new(&current.message).color(color));
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });

    if !open || acknowledged {
        *notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_kittest::Harness;
    use kittest::Queryable;

    #[test]
    fn test_notice_from_error_uses_display_text() {
        let notice = Notice::from(&StampError::NoPlacement);
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title(), "Error");
        assert_eq!(notice.message, "Please select a position for the QR code.");
    }

    #[test]
    fn test_ok_dismisses_notice() {
        let mut harness = Harness::new_ui_state(
            |ui, notice: &mut Option<Notice>| notice_modal(ui.ctx(), notice),
            Some(Notice::success("QR codes have been generated and saved!")),
        );
        harness.run();
        assert!(
            harness
                .query_by_label_contains("have been generated")
                .is_some()
        );

        harness.get_by_label("OK").click();
        harness.run();
        assert!(harness.state().is_none());
    }
}
