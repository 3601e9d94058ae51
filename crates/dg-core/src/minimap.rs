//! Minimap geometry: a screen-space rectangle standing for a world region.

use crate::geometry::{Bounds, Vec2};

/// Targets farther than this from the world origin are rejected.
pub const MAX_MINIMAP_TARGET: f32 = 1.0e6;

/// Linear mapping between a screen overlay and tracked world bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimap {
    /// Overlay rectangle in screen pixels.
    pub rect: Bounds,
    /// World region the overlay represents.
    pub world: Bounds,
}

impl Minimap {
    pub fn new(rect: Bounds, world: Bounds) -> Self {
        Self { rect, world }
    }

    /// Map an overlay point to the world. Points outside the overlay are
    /// clamped to its edge.
    ///
    /// `None` for degenerate overlay/world bounds or for targets that are
    /// not finite or beyond [`MAX_MINIMAP_TARGET`].
    pub fn screen_to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.rect.is_degenerate() || self.world.is_degenerate() {
            log::trace!("minimap: degenerate bounds {:?} / {:?}", self.rect, self.world);
            return None;
        }
        let tx = ((screen.x - self.rect.x) / self.rect.width).clamp(0.0, 1.0);
        let ty = ((screen.y - self.rect.y) / self.rect.height).clamp(0.0, 1.0);
        let target = Vec2::new(
            self.world.x + tx * self.world.width,
            self.world.y + ty * self.world.height,
        );
        is_sane(target).then_some(target)
    }

    /// Map a world point into overlay pixels (not clamped).
    pub fn world_to_screen(&self, world: Vec2) -> Option<Vec2> {
        if self.world.is_degenerate() {
            return None;
        }
        Some(Vec2::new(
            self.rect.x + (world.x - self.world.x) / self.world.width * self.rect.width,
            self.rect.y + (world.y - self.world.y) / self.world.height * self.rect.height,
        ))
    }

    /// Map a world box into overlay pixels.
    pub fn world_rect_to_screen(&self, world: Bounds) -> Option<Bounds> {
        let min = self.world_to_screen(world.origin())?;
        let max = self.world_to_screen(world.max())?;
        Some(Bounds::from_origin_size(min, max - min))
    }
}

/// Move `current` toward `desired` by `sensitivity` (clamped to `[0, 1]`):
/// 1 jumps, smaller values follow with damping. `None` when the result
/// would be non-finite or out of range.
pub fn follow(current: Vec2, desired: Vec2, sensitivity: f32) -> Option<Vec2> {
    let s = if sensitivity.is_finite() {
        sensitivity.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let next = current + (desired - current) * s;
    is_sane(next).then_some(next)
}

fn is_sane(p: Vec2) -> bool {
    p.is_finite() && p.max_abs() <= MAX_MINIMAP_TARGET
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> Minimap {
        Minimap::new(
            Bounds::new(10.0, 10.0, 200.0, 100.0),
            Bounds::new(-1000.0, 0.0, 2000.0, 500.0),
        )
    }

    #[test]
    fn maps_linearly() {
        let m = map();
        assert_eq!(m.screen_to_world(Vec2::new(10.0, 10.0)), Some(Vec2::new(-1000.0, 0.0)));
        assert_eq!(m.screen_to_world(Vec2::new(110.0, 60.0)), Some(Vec2::new(0.0, 250.0)));
        assert_eq!(m.screen_to_world(Vec2::new(500.0, 500.0)), Some(Vec2::new(1000.0, 500.0)));
    }

    #[test]
    fn degenerate_world_is_rejected() {
        let m = Minimap::new(Bounds::new(0.0, 0.0, 100.0, 100.0), Bounds::new(5.0, 5.0, 0.0, 0.0));
        assert_eq!(m.screen_to_world(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn absurd_targets_are_rejected() {
        let m = Minimap::new(
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            Bounds::new(0.0, 0.0, 1.0e9, 1.0e9),
        );
        assert_eq!(m.screen_to_world(Vec2::new(99.0, 99.0)), None);
        assert_eq!(follow(Vec2::ZERO, Vec2::new(f32::INFINITY, 0.0), 0.5), None);
    }

    #[test]
    fn follow_is_damped() {
        let next = follow(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.25).unwrap();
        assert_eq!(next, Vec2::new(25.0, 0.0));
        let jump = follow(Vec2::ZERO, Vec2::new(100.0, 0.0), 7.0).unwrap();
        assert_eq!(jump, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn world_rect_maps_into_overlay() {
        let m = map();
        let r = m.world_rect_to_screen(Bounds::new(0.0, 0.0, 1000.0, 250.0)).unwrap();
        assert_eq!(r, Bounds::new(110.0, 10.0, 100.0, 50.0));
    }
}
