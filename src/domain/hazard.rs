/// Time-evolving hazard geometry: timed bridge gates and rotating gears.
///
/// Both recompute their contribution to the obstacle set every tick;
/// nothing here is cached across ticks.

use std::collections::HashSet;

use super::grid::Coord;

/// A bridge tile that alternates between solid (walkable) and vanished
/// (impassable). Two-phase timer entity:
///
///   1. **Solid** — the tile is floor. Duration: `solid_ticks`.
///   2. **Vanished** — the tile blocks entry. Duration: `vanish_ticks`.
///
/// The toggle happens exactly when `phase_timer` reaches 0, and the
/// timer reloads with the duration of the *new* phase. A vanished tile
/// is not lethal: an actor already standing on it may still step off.
#[derive(Clone, Debug)]
pub struct TimedGate {
    pub pos: Coord,
    pub solid_ticks: u32,
    pub vanish_ticks: u32,
    pub phase_timer: u32,
    pub is_solid: bool,
}

impl TimedGate {
    pub fn new(pos: Coord, solid_ticks: u32, vanish_ticks: u32) -> Self {
        TimedGate {
            pos,
            solid_ticks,
            vanish_ticks,
            phase_timer: solid_ticks,
            is_solid: true,
        }
    }

    /// Construct with the gate already `offset` ticks into its cycle.
    /// Staggered offsets produce "running" bridges where tiles appear
    /// one after another.
    pub fn with_offset(pos: Coord, solid_ticks: u32, vanish_ticks: u32, offset: u32) -> Self {
        let mut gate = TimedGate::new(pos, solid_ticks, vanish_ticks);
        for _ in 0..offset {
            gate.tick();
        }
        gate
    }

    /// Advance one tick. Returns true if the gate toggled this tick.
    pub fn tick(&mut self) -> bool {
        if self.phase_timer > 0 {
            self.phase_timer -= 1;
        }
        if self.phase_timer == 0 {
            self.is_solid = !self.is_solid;
            self.phase_timer = if self.is_solid { self.solid_ticks } else { self.vanish_ticks };
            return true;
        }
        false
    }
}

/// A spinning gear. The axle occupies `center` permanently; four spokes
/// at 90-degree offsets sweep around it. Spoke tiles are lethal.
#[derive(Clone, Debug)]
pub struct RotatingHazard {
    pub center: Coord,
    pub radius: i32,
    /// Degrees per tick, signed (negative = counter-clockwise).
    pub speed: f32,
    /// Current angle in `[0, 360)`.
    pub angle: f32,
}

const SPOKE_OFFSETS: [f32; 4] = [0.0, 90.0, 180.0, 270.0];

impl RotatingHazard {
    pub fn new(center: Coord, radius: i32, speed: f32) -> Self {
        RotatingHazard { center, radius, speed, angle: 0.0 }
    }

    /// Advance the sweep angle one tick, unconditionally.
    pub fn tick(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(360.0);
    }

    /// The tiles the spokes currently occupy, recomputed from scratch.
    /// Each spoke is walked at integer radii from the center (exclusive)
    /// out to `radius` (inclusive); coordinates round half away from
    /// zero (`f32::round`), applied uniformly to both axes. The center
    /// tile is never part of the sweep — see `axle`.
    pub fn sweep(&self) -> HashSet<Coord> {
        let mut tiles = HashSet::new();
        for offset in SPOKE_OFFSETS {
            let theta = (self.angle + offset).to_radians();
            let (sin, cos) = theta.sin_cos();
            for r in 1..=self.radius {
                let x = self.center.0 + (r as f32 * cos).round() as i32;
                let y = self.center.1 + (r as f32 * sin).round() as i32;
                tiles.insert((x, y));
            }
        }
        tiles.remove(&self.center);
        tiles
    }

    /// The always-present center obstacle.
    pub fn axle(&self) -> Coord {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_two_phase_cycle() {
        let mut g = TimedGate::new((4, 4), 3, 2);
        assert!(g.is_solid);

        assert!(!g.tick()); // 3 -> 2
        assert!(!g.tick()); // 2 -> 1
        assert!(g.tick()); // 1 -> 0: vanish, reload 2
        assert!(!g.is_solid);
        assert_eq!(g.phase_timer, 2);

        assert!(!g.tick());
        assert!(g.tick()); // back to solid, reload 3
        assert!(g.is_solid);
        assert_eq!(g.phase_timer, 3);
    }

    #[test]
    fn gate_offset_advances_cycle() {
        let plain = {
            let mut g = TimedGate::new((0, 0), 5, 5);
            for _ in 0..7 {
                g.tick();
            }
            g
        };
        let offset = TimedGate::with_offset((0, 0), 5, 5, 7);
        assert_eq!(plain.is_solid, offset.is_solid);
        assert_eq!(plain.phase_timer, offset.phase_timer);
    }

    #[test]
    fn sweep_at_zero_angle_covers_cross() {
        let gear = RotatingHazard::new((10, 10), 3, 1.0);
        let tiles = gear.sweep();
        // Four axis-aligned spokes, radius 3.
        for r in 1..=3 {
            assert!(tiles.contains(&(10 + r, 10)));
            assert!(tiles.contains(&(10 - r, 10)));
            assert!(tiles.contains(&(10, 10 + r)));
            assert!(tiles.contains(&(10, 10 - r)));
        }
        assert_eq!(tiles.len(), 12);
    }

    #[test]
    fn sweep_never_contains_center() {
        let mut gear = RotatingHazard::new((7, 7), 4, 3.5);
        for _ in 0..200 {
            gear.tick();
            assert!(!gear.sweep().contains(&(7, 7)));
            assert_eq!(gear.axle(), (7, 7));
        }
    }

    #[test]
    fn sweep_is_periodic_over_full_rotation() {
        let mut gear = RotatingHazard::new((10, 10), 3, 1.0);
        let start = gear.sweep();
        for _ in 0..360 {
            gear.tick();
        }
        assert_eq!(gear.angle, 0.0);
        assert_eq!(gear.sweep(), start);
    }

    #[test]
    fn negative_speed_wraps_into_range() {
        let mut gear = RotatingHazard::new((0, 0), 2, -1.5);
        gear.tick();
        assert!((gear.angle - 358.5).abs() < 1e-3);
    }
}
