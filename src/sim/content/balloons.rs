//! Balloon spawning and motion
//!
//! Positions are percentages of the play field so the renderer can scale
//! them to any viewport.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::BALLOON_COUNT;

/// Balloon fill colours (CSS hex)
pub const PALETTE: [&str; 8] = [
    "#FF6B9D", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#FFB347", "#98FB98",
];

/// Bounce box, inclusive (percent)
pub const BOUNDS_MIN: Vec2 = Vec2::new(5.0, 5.0);
pub const BOUNDS_MAX: Vec2 = Vec2::new(90.0, 85.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    pub pos: Vec2,
    /// Displacement per motion step
    pub vel: Vec2,
    /// Diameter in px
    pub size: f32,
    /// Index into [`PALETTE`]
    pub color: usize,
    pub popped: bool,
}

impl Balloon {
    pub fn spawn(id: u32, rng: &mut impl Rng) -> Self {
        Self {
            id,
            pos: Vec2::new(rng.random_range(10.0..90.0), rng.random_range(15.0..85.0)),
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
            size: rng.random_range(40.0..60.0),
            color: rng.random_range(0..PALETTE.len()),
            popped: false,
        }
    }

    pub fn color_hex(&self) -> &'static str {
        PALETTE[self.color % PALETTE.len()]
    }

    /// Move one step, bouncing off the edges of the field.
    /// Popped balloons stay where they burst.
    pub fn step(&mut self) {
        if self.popped {
            return;
        }

        let mut next = self.pos + self.vel;
        if next.x <= BOUNDS_MIN.x || next.x >= BOUNDS_MAX.x {
            self.vel.x = -self.vel.x;
            next.x = next.x.clamp(BOUNDS_MIN.x, BOUNDS_MAX.x);
        }
        if next.y <= BOUNDS_MIN.y || next.y >= BOUNDS_MAX.y {
            self.vel.y = -self.vel.y;
            next.y = next.y.clamp(BOUNDS_MIN.y, BOUNDS_MAX.y);
        }
        self.pos = next;
    }
}

/// A full field of fresh balloons with ids `0..BALLOON_COUNT`
pub fn spawn_balloons(rng: &mut impl Rng) -> Vec<Balloon> {
    (0..BALLOON_COUNT as u32).map(|id| Balloon::spawn(id, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_bounce_reflects_and_clamps() {
        let mut b = Balloon {
            id: 0,
            pos: Vec2::new(89.0, 50.0),
            vel: Vec2::new(1.5, 0.0),
            size: 50.0,
            color: 0,
            popped: false,
        };
        b.step();
        assert_eq!(b.pos.x, 90.0);
        assert_eq!(b.vel.x, -1.5);
        b.step();
        assert_eq!(b.pos.x, 88.5);
    }

    #[test]
    fn test_popped_balloon_stays_put() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut b = Balloon::spawn(0, &mut rng);
        b.popped = true;
        let before = b.pos;
        b.step();
        assert_eq!(b.pos, before);
    }

    proptest! {
        #[test]
        fn prop_spawn_ranges(seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let balloons = spawn_balloons(&mut rng);
            prop_assert_eq!(balloons.len(), BALLOON_COUNT);
            for (i, b) in balloons.iter().enumerate() {
                prop_assert_eq!(b.id, i as u32);
                prop_assert!((10.0..90.0).contains(&b.pos.x));
                prop_assert!((15.0..85.0).contains(&b.pos.y));
                prop_assert!((-2.0..2.0).contains(&b.vel.x));
                prop_assert!((-2.0..2.0).contains(&b.vel.y));
                prop_assert!((40.0..60.0).contains(&b.size));
                prop_assert!(b.color < PALETTE.len());
                prop_assert!(!b.popped);
            }
        }

        #[test]
        fn prop_balloons_stay_in_bounds(seed: u64, steps in 1usize..300) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut balloons = spawn_balloons(&mut rng);
            for _ in 0..steps {
                balloons.iter_mut().for_each(Balloon::step);
            }
            for b in &balloons {
                prop_assert!(b.pos.x >= BOUNDS_MIN.x && b.pos.x <= BOUNDS_MAX.x);
                prop_assert!(b.pos.y >= BOUNDS_MIN.y && b.pos.y <= BOUNDS_MAX.y);
            }
        }
    }
}
