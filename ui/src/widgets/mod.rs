mod notice;
mod roster_table;
mod selection_canvas;

pub use notice::{Notice, NoticeKind, notice_modal};
pub use roster_table::roster_table;
pub use selection_canvas::{empty_canvas, load_preview_texture, selection_canvas};
