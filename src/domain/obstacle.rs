/// Per-tick obstacle aggregation — single source of truth for
/// "can anything occupy this tile right now".
///
/// Every active hazard contributes its impassable tiles, and the result
/// is queried in O(1) by the movement resolver and the AI. The set is
/// rebuilt from scratch each tick and never mutated by its readers.
///
/// Boulders and mirrors are deliberately NOT part of the generic union:
/// the player's push resolver treats them specially, while non-player
/// actors that should be blocked by them pass their tiles through the
/// `extra` parameter. The player view and the enemy view of the same
/// tick may legitimately differ.

use std::collections::HashSet;

use super::grid::{Coord, GridMap};
use super::hazard::{RotatingHazard, TimedGate};

#[derive(Clone, Debug)]
pub struct ObstacleSet {
    width: i32,
    height: i32,
    tiles: HashSet<Coord>,
}

impl ObstacleSet {
    /// Is this tile impassable? Out-of-bounds counts as blocked.
    pub fn contains(&self, (x, y): Coord) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return true;
        }
        self.tiles.contains(&(x, y))
    }

    pub fn add(&mut self, pos: Coord) {
        self.tiles.insert(pos);
    }

    pub fn add_all<I: IntoIterator<Item = Coord>>(&mut self, tiles: I) {
        self.tiles.extend(tiles);
    }
}

/// Union the static walls with every hazard's current contribution:
/// vanished bridge gates, gear spokes and axles, locked sequence-gate
/// tiles, plus any caller-supplied extras.
pub fn compose<I, E>(
    grid: &GridMap,
    gates: &[TimedGate],
    gears: &[RotatingHazard],
    locked_gate_tiles: I,
    extra: E,
) -> ObstacleSet
where
    I: IntoIterator<Item = Coord>,
    E: IntoIterator<Item = Coord>,
{
    let mut set = ObstacleSet {
        width: grid.width,
        height: grid.height,
        tiles: grid.walls().clone(),
    };

    for gate in gates {
        if !gate.is_solid {
            set.add(gate.pos);
        }
    }
    for gear in gears {
        set.add_all(gear.sweep());
        set.add(gear.axle());
    }
    set.add_all(locked_gate_tiles);
    set.add_all(extra);

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(w: i32, h: i32) -> GridMap {
        GridMap::new(w, h, HashSet::new())
    }

    #[test]
    fn walls_and_bounds_block() {
        let mut walls = HashSet::new();
        walls.insert((2, 2));
        let grid = GridMap::new(5, 5, walls);
        let set = compose(&grid, &[], &[], [], []);
        assert!(set.contains((2, 2)));
        assert!(set.contains((-1, 0)));
        assert!(set.contains((5, 4)));
        assert!(!set.contains((1, 1)));
    }

    #[test]
    fn solid_gate_is_passable_vanished_gate_blocks() {
        let grid = open_grid(10, 10);
        let mut gate = TimedGate::new((3, 3), 2, 2);

        let set = compose(&grid, std::slice::from_ref(&gate), &[], [], []);
        assert!(!set.contains((3, 3)));

        gate.tick();
        gate.tick(); // toggles to vanished
        assert!(!gate.is_solid);
        let set = compose(&grid, std::slice::from_ref(&gate), &[], [], []);
        assert!(set.contains((3, 3)));
    }

    #[test]
    fn gear_contributes_spokes_and_axle() {
        let grid = open_grid(20, 20);
        let gear = RotatingHazard::new((10, 10), 2, 1.0);
        let set = compose(&grid, &[], std::slice::from_ref(&gear), [], []);
        assert!(set.contains((10, 10))); // axle
        assert!(set.contains((12, 10))); // spoke at angle 0
        assert!(set.contains((10, 8)));
        assert!(!set.contains((11, 11)));
    }

    #[test]
    fn locked_gate_tiles_and_extras_block() {
        let grid = open_grid(8, 8);
        let set = compose(&grid, &[], &[], [(4, 4)], [(6, 6)]);
        assert!(set.contains((4, 4)));
        assert!(set.contains((6, 6)));
        assert!(!set.contains((5, 5)));
    }
}
