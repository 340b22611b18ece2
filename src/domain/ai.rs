/// Enemy behaviors: waypoint patrol, greedy chase, straight-line drift.
///
/// Every enemy reports a catch whenever its position equals the
/// player's, checked both before and after the attempted step, so a
/// pass-through in the same tick still counts. A catch resets the whole
/// room; there is no incremental rollback.
///
/// All three share the cooldown discipline: the timer counts down every
/// tick and the enemy acts only when it reaches 0, then reloads.

use super::grid::Coord;
use super::obstacle::ObstacleSet;

fn sign(v: i32) -> i32 {
    v.signum()
}

/// Walks an ordered waypoint cycle, one axis-aligned step at a time
/// (x before y), pausing `wait_ticks` at each waypoint. Waypoint paths
/// are declared through open floor; if a hazard sweeps across the path
/// the patroller simply waits for it to clear.
#[derive(Clone, Debug)]
pub struct Patroller {
    pub pos: Coord,
    waypoints: Vec<Coord>,
    waypoint_index: usize,
    step_cooldown: u32,
    cooldown_timer: u32,
    wait_ticks: u32,
    wait_timer: u32,
}

impl Patroller {
    pub fn new(pos: Coord, waypoints: Vec<Coord>, step_cooldown: u32, wait_ticks: u32) -> Self {
        Patroller {
            pos,
            waypoints,
            waypoint_index: 0,
            step_cooldown,
            cooldown_timer: step_cooldown,
            wait_ticks,
            wait_timer: 0,
        }
    }

    /// Advance one tick. Returns true if the player is caught.
    pub fn tick(&mut self, obstacles: &ObstacleSet, player: Coord) -> bool {
        if self.pos == player {
            return true;
        }
        if self.cooldown_timer > 0 {
            self.cooldown_timer -= 1;
        }
        if self.cooldown_timer > 0 {
            return false;
        }
        self.cooldown_timer = self.step_cooldown;

        if self.waypoints.is_empty() {
            return false;
        }
        if self.wait_timer > 0 {
            self.wait_timer -= 1;
            return false;
        }

        let target = self.waypoints[self.waypoint_index];
        if self.pos == target {
            // Arrival consumes the tick: advance the cycle and pause.
            self.waypoint_index = (self.waypoint_index + 1) % self.waypoints.len();
            self.wait_timer = self.wait_ticks;
            return false;
        }

        let dx = target.0 - self.pos.0;
        let dy = target.1 - self.pos.1;
        let step = if dx != 0 { (sign(dx), 0) } else { (0, sign(dy)) };
        let next = (self.pos.0 + step.0, self.pos.1 + step.1);
        if !obstacles.contains(next) {
            self.pos = next;
        }

        self.pos == player
    }
}

/// Pursues the player greedily: the axis with the larger absolute delta
/// is attempted first, the other axis is the fallback, and a fully
/// blocked chaser stands still.
#[derive(Clone, Debug)]
pub struct Chaser {
    pub pos: Coord,
    step_cooldown: u32,
    cooldown_timer: u32,
}

impl Chaser {
    pub fn new(pos: Coord, step_cooldown: u32) -> Self {
        Chaser { pos, step_cooldown, cooldown_timer: step_cooldown }
    }

    /// Advance one tick against the supplied obstacle set (which, for
    /// chasers, includes boulder and mirror tiles). Returns true if the
    /// player is caught.
    pub fn tick(&mut self, obstacles: &ObstacleSet, player: Coord) -> bool {
        if self.pos == player {
            return true;
        }
        if self.cooldown_timer > 0 {
            self.cooldown_timer -= 1;
        }
        if self.cooldown_timer > 0 {
            return false;
        }
        self.cooldown_timer = self.step_cooldown;

        let dx = player.0 - self.pos.0;
        let dy = player.1 - self.pos.1;

        let horizontal = (sign(dx), 0);
        let vertical = (0, sign(dy));
        let (first, second) = if dx.abs() >= dy.abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        for (sx, sy) in [first, second] {
            if sx == 0 && sy == 0 {
                continue;
            }
            let next = (self.pos.0 + sx, self.pos.1 + sy);
            if !obstacles.contains(next) {
                self.pos = next;
                break;
            }
        }

        self.pos == player
    }
}

/// Drifts in a straight line, reflecting each axis off whatever blocks
/// it. Lethal on contact like the others.
#[derive(Clone, Debug)]
pub struct Drifter {
    pub pos: Coord,
    pub dir: (i32, i32),
    step_cooldown: u32,
    cooldown_timer: u32,
}

impl Drifter {
    pub fn new(pos: Coord, dir: (i32, i32), step_cooldown: u32, initial_delay: u32) -> Self {
        Drifter { pos, dir, step_cooldown, cooldown_timer: initial_delay }
    }

    /// Advance one tick. Returns true if the player is caught.
    pub fn tick(&mut self, obstacles: &ObstacleSet, player: Coord) -> bool {
        if self.pos == player {
            return true;
        }
        if self.cooldown_timer > 0 {
            self.cooldown_timer -= 1;
        }
        if self.cooldown_timer > 0 {
            return false;
        }
        self.cooldown_timer = self.step_cooldown;

        let (x, y) = self.pos;
        if obstacles.contains((x + self.dir.0, y)) {
            self.dir.0 = -self.dir.0;
        }
        if obstacles.contains((x, y + self.dir.1)) {
            self.dir.1 = -self.dir.1;
        }
        let next = (x + self.dir.0, y + self.dir.1);
        if !obstacles.contains(next) {
            self.pos = next;
        }

        self.pos == player
    }
}
