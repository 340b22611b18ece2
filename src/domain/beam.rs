/// Light-beam tracing: ray-march from a fixed source, reflecting off
/// mirrors, until the beam hits the door, leaves the room's interior,
/// or exhausts the step cap.
///
/// The cap (`width * height` steps) is the termination guarantee: a
/// mirror arrangement that forms a closed reflective cycle would loop
/// forever otherwise. Cap exhaustion is treated as a miss (door stays
/// locked), never as an error.
///
/// The path is reconstructed from scratch on every recompute — there is
/// no incremental update on mirror rotation.

use super::entity::{Door, Mirror};
use super::grid::{Coord, GridMap};

#[derive(Clone, Debug)]
pub struct Beam {
    pub origin: Coord,
    pub dir: (i32, i32),
    pub path: Vec<Coord>,
    pub active: bool,
}

impl Beam {
    pub fn new(origin: Coord, dir: (i32, i32)) -> Self {
        Beam { origin, dir, path: Vec::new(), active: false }
    }

    /// Retrace the full beam path and drive the door's lock state.
    /// While inactive the beam has no path and forces the door locked.
    pub fn recompute(&mut self, grid: &GridMap, mirrors: &[Mirror], door: &mut Door) {
        self.path.clear();
        door.locked = true;
        if !self.active {
            return;
        }

        let (mut x, mut y) = self.origin;
        let (mut dx, mut dy) = self.dir;
        let step_cap = (grid.width * grid.height) as usize;

        for _ in 0..step_cap {
            x += dx;
            y += dy;
            self.path.push((x, y));

            if (x, y) == door.pos {
                door.locked = false;
                return;
            }

            if let Some(mirror) = mirrors.iter().find(|m| m.pos == (x, y)) {
                let reflected = mirror.reflect((dx, dy));
                dx = reflected.0;
                dy = reflected.1;
                continue;
            }

            if !grid.in_interior((x, y)) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MirrorKind;
    use std::collections::HashSet;

    fn open_grid(w: i32, h: i32) -> GridMap {
        GridMap::new(w, h, HashSet::new())
    }

    fn active_beam(origin: Coord, dir: (i32, i32)) -> Beam {
        let mut beam = Beam::new(origin, dir);
        beam.active = true;
        beam
    }

    #[test]
    fn inactive_beam_has_no_path_and_locks_door() {
        let grid = open_grid(10, 10);
        let mut door = Door::new((8, 5), false);
        let mut beam = Beam::new((1, 5), (1, 0));
        beam.recompute(&grid, &[], &mut door);
        assert!(beam.path.is_empty());
        assert!(door.locked);
    }

    #[test]
    fn straight_shot_unlocks_door() {
        let grid = open_grid(10, 10);
        let mut door = Door::new((8, 5), true);
        let mut beam = active_beam((1, 5), (1, 0));
        beam.recompute(&grid, &[], &mut door);
        assert!(!door.locked);
        assert_eq!(beam.path.last(), Some(&(8, 5)));
    }

    #[test]
    fn slash_mirror_bends_beam_upward() {
        let grid = open_grid(12, 12);
        let mut door = Door::new((5, 2), true);
        let mirrors = vec![Mirror::new((5, 5), MirrorKind::Slash)];
        let mut beam = active_beam((3, 5), (1, 0));
        beam.recompute(&grid, &mirrors, &mut door);

        // Approaches the mirror moving right, leaves it moving up.
        assert_eq!(&beam.path[..4], &[(4, 5), (5, 5), (5, 4), (5, 3)]);
        assert!(!door.locked);
    }

    #[test]
    fn beam_stops_at_interior_edge() {
        let grid = open_grid(10, 10);
        let mut door = Door::new((1, 1), true);
        let mut beam = active_beam((5, 5), (1, 0));
        beam.recompute(&grid, &[], &mut door);
        assert_eq!(beam.path.last(), Some(&(9, 5)));
        assert!(door.locked);
    }

    #[test]
    fn mirror_cycle_terminates_and_leaves_door_locked() {
        let grid = open_grid(10, 10);
        let mut door = Door::new((8, 8), true);
        // Four mirrors forming a closed rectangular loop.
        let mirrors = vec![
            Mirror::new((6, 2), MirrorKind::Backslash),
            Mirror::new((6, 5), MirrorKind::Slash),
            Mirror::new((2, 5), MirrorKind::Backslash),
            Mirror::new((2, 2), MirrorKind::Slash),
        ];
        let mut beam = active_beam((3, 2), (1, 0));
        beam.recompute(&grid, &mirrors, &mut door);
        assert!(beam.path.len() <= 100);
        assert!(door.locked);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn dir_strategy() -> impl Strategy<Value = (i32, i32)> {
            (-1i32..=1, -1i32..=1).prop_filter("zero direction", |&(dx, dy)| dx != 0 || dy != 0)
        }

        fn mirror_strategy() -> impl Strategy<Value = Mirror> {
            (1i32..15, 1i32..15, prop::bool::ANY).prop_map(|(x, y, slash)| {
                let kind = if slash { MirrorKind::Slash } else { MirrorKind::Backslash };
                Mirror::new((x, y), kind)
            })
        }

        proptest! {
            #[test]
            fn trace_always_terminates_within_cap(
                mirrors in prop::collection::vec(mirror_strategy(), 0..12),
                dir in dir_strategy(),
                ox in 1i32..15,
                oy in 1i32..15,
            ) {
                let grid = open_grid(16, 16);
                let mut door = Door::new((14, 14), true);
                let mut beam = active_beam((ox, oy), dir);
                beam.recompute(&grid, &mirrors, &mut door);
                prop_assert!(beam.path.len() <= 256);
                // Consecutive path tiles stay king-move adjacent.
                for pair in beam.path.windows(2) {
                    prop_assert!((pair[0].0 - pair[1].0).abs() <= 1);
                    prop_assert!((pair[0].1 - pair[1].1).abs() <= 1);
                }
            }
        }
    }
}
