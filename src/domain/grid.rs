/// Static room geometry: wall set + rectangular bounds.
/// Wall membership is queried via methods, not stored per-entity,
/// so tile semantics are centralized here.

use std::collections::HashSet;

/// A grid cell coordinate. Rooms live in `[0, width) x [0, height)`.
pub type Coord = (i32, i32);

#[derive(Clone, Debug)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    walls: HashSet<Coord>,
}

impl GridMap {
    pub fn new(width: i32, height: i32, walls: HashSet<Coord>) -> Self {
        GridMap { width, height, walls }
    }

    /// Is there a static wall at this cell? Out-of-bounds counts as wall.
    pub fn is_wall(&self, pos: Coord) -> bool {
        !self.in_bounds(pos) || self.walls.contains(&pos)
    }

    pub fn in_bounds(&self, (x, y): Coord) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Strict interior: inside the rectangle excluding the border ring.
    /// The beam tracer uses this as its "still inside the room" test.
    pub fn in_interior(&self, (x, y): Coord) -> bool {
        x > 0 && x < self.width - 1 && y > 0 && y < self.height - 1
    }

    pub fn walls(&self) -> &HashSet<Coord> {
        &self.walls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x3_border() -> GridMap {
        let mut walls = HashSet::new();
        for x in 0..3 {
            for y in 0..3 {
                if x == 0 || x == 2 || y == 0 || y == 2 {
                    walls.insert((x, y));
                }
            }
        }
        GridMap::new(3, 3, walls)
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let g = grid_3x3_border();
        assert!(g.is_wall((-1, 0)));
        assert!(g.is_wall((3, 1)));
        assert!(g.is_wall((1, 99)));
    }

    #[test]
    fn border_is_wall_center_is_not() {
        let g = grid_3x3_border();
        assert!(g.is_wall((0, 0)));
        assert!(g.is_wall((2, 1)));
        assert!(!g.is_wall((1, 1)));
    }

    #[test]
    fn interior_excludes_border() {
        let g = grid_3x3_border();
        assert!(g.in_interior((1, 1)));
        assert!(!g.in_interior((0, 1)));
        assert!(!g.in_interior((2, 2)));
    }
}
