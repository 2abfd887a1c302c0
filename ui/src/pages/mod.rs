//! One page per tool:
//! - `placement_page`: one stamped copy of an image or PDF per link
//! - `batch_page`: a roster merged with a PDF template into one document

mod batch_page;
mod placement_page;

pub use batch_page::batch_page;
pub use placement_page::placement_page;
