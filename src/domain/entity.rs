/// Entities without their own hazard geometry: the player token and the
/// win-gating objects (boulders, plates, keys, switches, mirrors, door).
/// Time-evolving hazards live in `hazard.rs`; enemies in `ai.rs`.

use super::grid::Coord;

/// Movement direction, in the fixed input priority order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

/// Per-tick input snapshot handed to the simulation.
/// `held` drives continuous rooms, `pressed` drives push rooms,
/// `interact` is the edge-triggered mirror-rotate action.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub held: Option<MoveDir>,
    pub pressed: Option<MoveDir>,
    pub interact: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Coord,
    /// Ticks between accepted moves.
    pub move_cooldown: u32,
    /// Countdown; a move is accepted only at 0, then reloads to cooldown.
    pub move_timer: u32,
}

impl Player {
    pub fn new(pos: Coord, move_cooldown: u32) -> Self {
        Player { pos, move_cooldown, move_timer: 0 }
    }
}

/// A pushable body. Identity matters for push resolution: no two may
/// share a cell, and a blocked push moves neither player nor boulder.
#[derive(Clone, Debug)]
pub struct Boulder {
    pub pos: Coord,
}

impl Boulder {
    pub fn new(pos: Coord) -> Self {
        Boulder { pos }
    }
}

/// A floor plate. `active` is derived from boulder occupancy every tick
/// and never mutated directly by anything else.
#[derive(Clone, Debug)]
pub struct PressurePlate {
    pub pos: Coord,
    pub active: bool,
}

impl PressurePlate {
    pub fn new(pos: Coord) -> Self {
        PressurePlate { pos, active: false }
    }
}

#[derive(Clone, Debug)]
pub struct KeyItem {
    pub pos: Coord,
    pub collected: bool,
}

impl KeyItem {
    pub fn new(pos: Coord) -> Self {
        KeyItem { pos, collected: false }
    }
}

/// A floor switch belonging to an ordered sequence group.
#[derive(Clone, Debug)]
pub struct Switch {
    pub pos: Coord,
    pub order_index: usize,
    pub group: char,
    pub activated: bool,
}

impl Switch {
    pub fn new(pos: Coord, order_index: usize, group: char) -> Self {
        Switch { pos, order_index, group, activated: false }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MirrorKind {
    /// `/` — reflects `(dx, dy)` to `(-dy, -dx)`.
    Slash,
    /// `\` — reflects `(dx, dy)` to `(dy, dx)`.
    Backslash,
}

#[derive(Clone, Debug)]
pub struct Mirror {
    pub pos: Coord,
    pub kind: MirrorKind,
}

impl Mirror {
    pub fn new(pos: Coord, kind: MirrorKind) -> Self {
        Mirror { pos, kind }
    }

    pub fn rotate(&mut self) {
        self.kind = match self.kind {
            MirrorKind::Slash => MirrorKind::Backslash,
            MirrorKind::Backslash => MirrorKind::Slash,
        };
    }

    pub fn reflect(&self, (dx, dy): (i32, i32)) -> (i32, i32) {
        match self.kind {
            MirrorKind::Slash => (-dy, -dx),
            MirrorKind::Backslash => (dy, dx),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Door {
    pub pos: Coord,
    pub locked: bool,
}

impl Door {
    pub fn new(pos: Coord, locked: bool) -> Self {
        Door { pos, locked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_mirror_reflects_rightward_beam_up() {
        let m = Mirror::new((5, 5), MirrorKind::Slash);
        assert_eq!(m.reflect((1, 0)), (0, -1));
        assert_eq!(m.reflect((0, 1)), (-1, 0));
    }

    #[test]
    fn backslash_mirror_reflects_rightward_beam_down() {
        let m = Mirror::new((5, 5), MirrorKind::Backslash);
        assert_eq!(m.reflect((1, 0)), (0, 1));
        assert_eq!(m.reflect((0, -1)), (-1, 0));
    }

    #[test]
    fn rotate_toggles_kind() {
        let mut m = Mirror::new((0, 0), MirrorKind::Slash);
        m.rotate();
        assert_eq!(m.kind, MirrorKind::Backslash);
        m.rotate();
        assert_eq!(m.kind, MirrorKind::Slash);
    }

    #[test]
    fn reflection_is_an_involution() {
        for kind in [MirrorKind::Slash, MirrorKind::Backslash] {
            let m = Mirror::new((0, 0), kind);
            for d in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                assert_eq!(m.reflect(m.reflect(d)), d);
            }
        }
    }
}
