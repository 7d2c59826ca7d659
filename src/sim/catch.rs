//! Catch detection
//!
//! An object is caught when it sits inside the basket's capture band: a
//! fixed-height strip at the top of the basket, as wide as the basket.
//! Long steps can carry an object clean over the band, so the tick tests the
//! whole path covered during the step, not just where it ended up.

use glam::Vec2;

use super::state::Catcher;
use crate::consts::BASKET_HEIGHT;

/// Axis-aligned capture zone (inclusive on all edges)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchZone {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl CatchZone {
    /// Zone for the catcher's current position
    pub fn of(catcher: &Catcher) -> Self {
        Self {
            left: catcher.left(),
            right: catcher.right(),
            top: catcher.y,
            bottom: catcher.y + BASKET_HEIGHT,
        }
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.y >= self.top && pos.y <= self.bottom && pos.x >= self.left && pos.x <= self.right
    }

    /// Whether the straight path `from -> to` passes through the zone
    pub fn crossed(&self, from: Vec2, to: Vec2) -> bool {
        if self.contains(to) {
            return true;
        }
        if from.y.min(to.y) > self.bottom || from.y.max(to.y) < self.top {
            return false;
        }

        // Portion of the path (as a fraction of it) spent inside the band
        let dy = to.y - from.y;
        let (t0, t1) = if dy.abs() <= f32::EPSILON {
            (0.0, 1.0)
        } else {
            let a = (self.top - from.y) / dy;
            let b = (self.bottom - from.y) / dy;
            (a.min(b).max(0.0), a.max(b).min(1.0))
        };
        let xa = from.x + (to.x - from.x) * t0;
        let xb = from.x + (to.x - from.x) * t1;
        xa.min(xb) <= self.right && xa.max(xb) >= self.left
    }
}

/// Check whether an object at `pos` lands in the basket
#[inline]
pub fn is_caught(pos: Vec2, catcher: &Catcher) -> bool {
    CatchZone::of(catcher).contains(pos)
}

/// Check whether an object moving from `from` to `to` this step passed
/// through the basket
#[inline]
pub fn is_caught_along(from: Vec2, to: Vec2, catcher: &Catcher) -> bool {
    CatchZone::of(catcher).crossed(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_inside_band() {
        let catcher = Catcher::default();
        assert!(is_caught(Vec2::new(catcher.x, BASKET_Y + 10.0), &catcher));
    }

    #[test]
    fn test_band_edges_inclusive() {
        let catcher = Catcher::default();
        let zone = CatchZone::of(&catcher);
        assert!(zone.contains(Vec2::new(zone.left, zone.top)));
        assert!(zone.contains(Vec2::new(zone.right, zone.bottom)));
        assert_eq!(zone.right - zone.left, BASKET_WIDTH);
    }

    #[test]
    fn test_outside_band() {
        let catcher = Catcher::default();
        // Above the band
        assert!(!is_caught(Vec2::new(catcher.x, BASKET_Y - 1.0), &catcher));
        // Below the band (body, not basket)
        assert!(!is_caught(Vec2::new(catcher.x, BASKET_Y + BASKET_HEIGHT + 1.0), &catcher));
        // Beside the basket
        assert!(!is_caught(Vec2::new(catcher.right() + 0.5, BASKET_Y + 5.0), &catcher));
    }

    #[test]
    fn test_long_step_through_band() {
        let catcher = Catcher::default();
        // Starts above the band, ends below it
        let from = Vec2::new(catcher.x, BASKET_Y - 4.4);
        let to = Vec2::new(catcher.x, BASKET_Y + BASKET_HEIGHT + 14.8);
        assert!(!is_caught(to, &catcher));
        assert!(is_caught_along(from, to, &catcher));
    }

    #[test]
    fn test_long_step_beside_basket() {
        let catcher = Catcher::default();
        let x = catcher.right() + 20.0;
        let from = Vec2::new(x, BASKET_Y - 30.0);
        let to = Vec2::new(x, BASKET_Y + BASKET_HEIGHT + 30.0);
        assert!(!is_caught_along(from, to, &catcher));
    }

    #[test]
    fn test_diagonal_step_enters_span_inside_band() {
        let catcher = Catcher::default();
        let zone = CatchZone::of(&catcher);
        // Outside the span above the band, inside it by the time it leaves
        let from = Vec2::new(zone.right + 40.0, zone.top - 20.0);
        let to = Vec2::new(zone.right - 40.0, zone.bottom + 20.0);
        assert!(is_caught_along(from, to, &catcher));

        // Still outside the span when it leaves the band
        let from = Vec2::new(zone.right + 200.0, zone.top - 20.0);
        let to = Vec2::new(zone.right + 100.0, zone.bottom + 20.0);
        assert!(!is_caught_along(from, to, &catcher));
    }

    #[test]
    fn test_step_that_stops_short() {
        let catcher = Catcher::default();
        let from = Vec2::new(catcher.x, BASKET_Y - 40.0);
        let to = Vec2::new(catcher.x, BASKET_Y - 1.0);
        assert!(!is_caught_along(from, to, &catcher));
    }
}
