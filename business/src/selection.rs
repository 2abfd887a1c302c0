//! Drag-to-select tracking on the preview canvas.
//!
//! The tracker works purely in preview space while the pointer is down and
//! only converts to source space on release, producing a [`PlacementRect`].

use crate::preview::ScaleFactor;

/// Destination region in source-surface coordinates (origin top-left).
///
/// Always normalised so that `x2 >= x1` and `y2 >= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlacementRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl PlacementRect {
    /// Builds a rectangle from two opposite corners given in any order.
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl std::fmt::Display for PlacementRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

impl std::str::FromStr for PlacementRect {
    type Err = String;

    /// Parses `x1,y1,x2,y2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid rectangle {s:?}: {e}"))?;

        match parts.as_slice() {
            [x1, y1, x2, y2] => Ok(Self::from_corners((*x1, *y1), (*x2, *y2))),
            _ => Err(format!(
                "invalid rectangle {s:?}: expected four comma-separated integers"
            )),
        }
    }
}

/// A point on the preview canvas, in preview pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPoint {
    pub x: f32,
    pub y: f32,
}

impl PreviewPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Dragging {
        anchor: PreviewPoint,
        current: PreviewPoint,
    },
    Committed {
        anchor: PreviewPoint,
        release: PreviewPoint,
    },
}

/// Tracks the press/move/release gesture that defines the placement rectangle.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    phase: SelectionPhase,
    placement: Option<PlacementRect>,
    scale: ScaleFactor,
    /// Preview size used to clamp pointer positions.
    bounds: (f32, f32),
}

impl SelectionTracker {
    pub fn new(scale: ScaleFactor, preview_size: (u32, u32)) -> Self {
        Self {
            phase: SelectionPhase::Idle,
            placement: None,
            scale,
            bounds: (preview_size.0 as f32, preview_size.1 as f32),
        }
    }

    /// Drops any selection and adopts a new preview geometry.
    pub fn reset(&mut self, scale: ScaleFactor, preview_size: (u32, u32)) {
        *self = Self::new(scale, preview_size);
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn placement(&self) -> Option<PlacementRect> {
        self.placement
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    fn clamp(&self, p: PreviewPoint) -> PreviewPoint {
        PreviewPoint {
            x: p.x.clamp(0.0, self.bounds.0),
            y: p.y.clamp(0.0, self.bounds.1),
        }
    }

    pub fn press(&mut self, at: PreviewPoint) {
        let at = self.clamp(at);
        if matches!(self.phase, SelectionPhase::Committed { .. }) {
            self.placement = None;
        }
        self.phase = SelectionPhase::Dragging {
            anchor: at,
            current: at,
        };
    }

    pub fn drag_to(&mut self, at: PreviewPoint) {
        let at = self.clamp(at);
        if let SelectionPhase::Dragging { current, .. } = &mut self.phase {
            *current = at;
        }
    }

    /// Commits the gesture and returns the new placement rectangle.
    ///
    /// Releases without a preceding press are ignored.
    pub fn release(&mut self, at: PreviewPoint) -> Option<PlacementRect> {
        let at = self.clamp(at);
        let SelectionPhase::Dragging { anchor, .. } = self.phase else {
            return None;
        };

        let rect = to_source_rect(anchor, at, self.scale);
        log::info!("Scaled QR position: {rect}");

        self.phase = SelectionPhase::Committed {
            anchor,
            release: at,
        };
        self.placement = Some(rect);
        Some(rect)
    }

    /// Commits a rectangle given in source coordinates, bypassing the gesture.
    pub fn set_placement(&mut self, rect: PlacementRect) {
        let to_preview = |x: u32, y: u32| {
            PreviewPoint::new(
                (f64::from(x) / self.scale.x) as f32,
                (f64::from(y) / self.scale.y) as f32,
            )
        };
        self.phase = SelectionPhase::Committed {
            anchor: to_preview(rect.x1, rect.y1),
            release: to_preview(rect.x2, rect.y2),
        };
        self.placement = Some(rect);
    }

    /// The rectangle to draw on the preview, as (min corner, max corner).
    pub fn preview_rect(&self) -> Option<(PreviewPoint, PreviewPoint)> {
        let (a, b) = match self.phase {
            SelectionPhase::Idle => return None,
            SelectionPhase::Dragging { anchor, current } => (anchor, current),
            SelectionPhase::Committed { anchor, release } => (anchor, release),
        };
        Some((
            PreviewPoint::new(a.x.min(b.x), a.y.min(b.y)),
            PreviewPoint::new(a.x.max(b.x), a.y.max(b.y)),
        ))
    }
}

/// Maps a preview-space drag onto source coordinates, truncating towards zero.
pub fn to_source_rect(a: PreviewPoint, b: PreviewPoint, scale: ScaleFactor) -> PlacementRect {
    let sx = |v: f32| (f64::from(v) * scale.x).floor().max(0.0) as u32;
    let sy = |v: f32| (f64::from(v) * scale.y).floor().max(0.0) as u32;
    PlacementRect::from_corners((sx(a.x), sy(a.y)), (sx(b.x), sy(b.y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(scale: f64) -> SelectionTracker {
        SelectionTracker::new(ScaleFactor { x: scale, y: scale }, (600, 400))
    }

    #[test]
    fn test_idle_until_press() {
        let t = tracker(1.0);
        assert_eq!(t.phase(), SelectionPhase::Idle);
        assert!(t.placement().is_none());
        assert!(t.preview_rect().is_none());
    }

    #[test]
    fn test_press_drag_release_scales_with_floor() {
        let mut t = SelectionTracker::new(ScaleFactor { x: 1.5, y: 2.5 }, (600, 400));
        t.press(PreviewPoint::new(11.0, 7.0));
        t.drag_to(PreviewPoint::new(50.0, 20.0));
        assert!(t.placement().is_none(), "moving must not commit");

        let rect = t.release(PreviewPoint::new(101.0, 33.0)).unwrap();
        assert_eq!(
            rect,
            PlacementRect {
                x1: 16,  // 16.5
                y1: 17,  // 17.5
                x2: 151, // 151.5
                y2: 82,  // 82.5
            }
        );
        assert_eq!(t.placement(), Some(rect));
    }

    #[test]
    fn test_reverse_drag_is_normalised() {
        let mut t = tracker(2.0);
        t.press(PreviewPoint::new(100.0, 80.0));
        let rect = t.release(PreviewPoint::new(20.0, 10.0)).unwrap();
        assert_eq!(rect, PlacementRect::from_corners((40, 20), (200, 160)));
        assert!(rect.x2 >= rect.x1 && rect.y2 >= rect.y1);
    }

    #[test]
    fn test_new_press_discards_previous_rectangle() {
        let mut t = tracker(1.0);
        t.press(PreviewPoint::new(0.0, 0.0));
        t.release(PreviewPoint::new(10.0, 10.0));
        assert!(t.placement().is_some());

        t.press(PreviewPoint::new(5.0, 5.0));
        assert!(t.placement().is_none());
        assert!(matches!(t.phase(), SelectionPhase::Dragging { .. }));

        let rect = t.release(PreviewPoint::new(30.0, 40.0)).unwrap();
        assert_eq!(rect, PlacementRect::from_corners((5, 5), (30, 40)));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut t = tracker(1.0);
        assert!(t.release(PreviewPoint::new(10.0, 10.0)).is_none());
        assert_eq!(t.phase(), SelectionPhase::Idle);
    }

    #[test]
    fn test_points_outside_preview_are_clamped() {
        let mut t = tracker(2.0);
        t.press(PreviewPoint::new(-20.0, -5.0));
        let rect = t.release(PreviewPoint::new(900.0, 500.0)).unwrap();
        assert_eq!(rect, PlacementRect::from_corners((0, 0), (1200, 800)));
    }

    #[test]
    fn test_zero_area_selection_is_kept() {
        let mut t = tracker(1.0);
        t.press(PreviewPoint::new(10.0, 10.0));
        let rect = t.release(PreviewPoint::new(10.0, 10.0)).unwrap();
        assert!(rect.is_empty());
    }

    #[test]
    fn test_reset_drops_selection() {
        let mut t = tracker(1.0);
        t.press(PreviewPoint::new(0.0, 0.0));
        t.release(PreviewPoint::new(10.0, 10.0));
        t.reset(ScaleFactor { x: 3.0, y: 3.0 }, (100, 100));
        assert!(t.placement().is_none());
        assert_eq!(t.scale(), ScaleFactor { x: 3.0, y: 3.0 });
    }

    #[test]
    fn test_scaling_matches_floor_formula_over_grid() {
        let scales = [0.5, 1.0, 1.02, 1.98, 2.0, 3.333];
        for &sx in &scales {
            for &sy in &scales {
                let scale = ScaleFactor { x: sx, y: sy };
                for (x1, y1, x2, y2) in [(0.0, 0.0, 1.0, 1.0), (3.0, 7.0, 123.0, 311.0)] {
                    let rect = to_source_rect(
                        PreviewPoint::new(x1, y1),
                        PreviewPoint::new(x2, y2),
                        scale,
                    );
                    let expected = PlacementRect {
                        x1: (f64::from(x1) * sx).floor() as u32,
                        y1: (f64::from(y1) * sy).floor() as u32,
                        x2: (f64::from(x2) * sx).floor() as u32,
                        y2: (f64::from(y2) * sy).floor() as u32,
                    };
                    assert_eq!(rect, expected, "scale ({sx}, {sy})");
                }
            }
        }
    }

    #[test]
    fn test_parse_rect() {
        let rect: PlacementRect = "50, 700,150,750".parse().unwrap();
        assert_eq!(rect, PlacementRect::from_corners((50, 700), (150, 750)));
        assert!("1,2,3".parse::<PlacementRect>().is_err());
        assert!("a,b,c,d".parse::<PlacementRect>().is_err());
    }

    #[test]
    fn test_set_placement_commits_in_preview_space() {
        let mut tracker = SelectionTracker::new(ScaleFactor { x: 2.0, y: 2.0 }, (300, 200));
        tracker.set_placement(PlacementRect::from_corners((100, 40), (200, 140)));

        assert_eq!(
            tracker.placement(),
            Some(PlacementRect::from_corners((100, 40), (200, 140)))
        );
        assert_eq!(
            tracker.preview_rect(),
            Some((PreviewPoint::new(50.0, 20.0), PreviewPoint::new(100.0, 70.0)))
        );
    }
}
