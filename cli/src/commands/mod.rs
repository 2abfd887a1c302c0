//! Command implementations for the qrstamp CLI.

pub mod batch;
pub mod completions;
pub mod place;

pub use batch::run_batch;
pub use completions::generate_completions;
pub use place::run_place;

use qrstamp_business::PlacementRect;

/// Whether `rect` reaches past a surface of `size`.
pub(crate) fn exceeds(rect: &PlacementRect, size: (u32, u32)) -> bool {
    rect.x2 > size.0 || rect.y2 > size.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds() {
        let rect = PlacementRect::from_corners((50, 700), (150, 750));
        assert!(!exceeds(&rect, (612, 792)));
        assert!(!exceeds(&rect, (150, 750)));
        assert!(exceeds(&rect, (149, 792)));
        assert!(exceeds(&rect, (612, 700)));
    }
}
