/// RoomState: every entity of the active room, owned in one place.
///
/// Built from a `RoomLayout` by a pure factory, both at first load and
/// on every reset — a reset is "discard the state, call the factory
/// again", never an in-place re-entry into a half-updated room.
///
/// The state also assembles the per-tick obstacle views. The player
/// view and the enemy view differ by design: boulders and mirrors are
/// push/step-adjacent targets for the player but hard obstacles for
/// the chaser.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::SpeedConfig;
use crate::domain::ai::{Chaser, Drifter, Patroller};
use crate::domain::beam::Beam;
use crate::domain::entity::{Boulder, Door, KeyItem, Mirror, Player, PressurePlate, Switch};
use crate::domain::grid::{Coord, GridMap};
use crate::domain::hazard::{RotatingHazard, TimedGate};
use crate::domain::obstacle::{self, ObstacleSet};
use crate::domain::puzzle::{MemoryTiles, SequenceLock};
use super::layout::{MovementMode, RoomLayout, WinRule};

pub struct RoomState {
    pub layout: RoomLayout,
    pub grid: GridMap,
    pub player: Player,
    pub boulders: Vec<Boulder>,
    pub plates: Vec<PressurePlate>,
    pub keys: Vec<KeyItem>,
    pub switches: Vec<Switch>,
    pub mirrors: Vec<Mirror>,
    pub gates: Vec<TimedGate>,
    pub gears: Vec<RotatingHazard>,
    pub patrollers: Vec<Patroller>,
    pub chasers: Vec<Chaser>,
    pub drifters: Vec<Drifter>,
    pub lock: SequenceLock,
    pub memory: Option<MemoryTiles>,
    pub beam: Option<Beam>,
    pub door: Door,
    pub complete: bool,
    pub tick: u64,
}

impl RoomState {
    /// The pure layout → state factory.
    pub fn build(layout: &RoomLayout, speed: &SpeedConfig) -> RoomState {
        let grid = GridMap::new(layout.width, layout.height, layout.walls.clone());

        let beam = layout.beam.as_ref().map(|spec| {
            let mut beam = Beam::new(spec.origin, spec.dir);
            beam.active = spec.active_from_start;
            beam
        });

        let memory = layout.memory.as_ref().map(|spec| {
            let mut rng = Pcg32::seed_from_u64(layout.seed);
            MemoryTiles::new(spec.tiles.clone(), spec.length, speed.memory_show_ticks, &mut rng)
        });

        let lock = SequenceLock::new(
            layout
                .sequence_groups
                .iter()
                .map(|g| (g.id, g.order.clone(), g.gate_tiles.clone()))
                .collect(),
        );

        RoomState {
            grid,
            player: Player::new(layout.player_start, speed.player_move_cooldown),
            boulders: layout.boulders.iter().map(|&p| Boulder::new(p)).collect(),
            plates: layout.plates.iter().map(|&p| PressurePlate::new(p)).collect(),
            keys: layout.keys.iter().map(|&p| KeyItem::new(p)).collect(),
            switches: layout
                .switches
                .iter()
                .map(|s| Switch::new(s.pos, s.order_index, s.group))
                .collect(),
            mirrors: layout.mirrors.iter().map(|m| Mirror::new(m.pos, m.kind)).collect(),
            gates: layout
                .gates
                .iter()
                .map(|g| TimedGate::with_offset(g.pos, g.solid_ticks, g.vanish_ticks, g.offset))
                .collect(),
            gears: layout
                .gears
                .iter()
                .map(|g| RotatingHazard::new(g.center, g.radius, g.speed))
                .collect(),
            patrollers: layout
                .patrollers
                .iter()
                .map(|p| {
                    Patroller::new(
                        p.start,
                        p.waypoints.clone(),
                        speed.patrol_step_cooldown,
                        speed.patrol_wait_ticks,
                    )
                })
                .collect(),
            chasers: layout
                .chasers
                .iter()
                .map(|&p| Chaser::new(p, speed.chaser_step_cooldown))
                .collect(),
            drifters: layout
                .drifters
                .iter()
                .map(|d| Drifter::new(d.pos, d.dir, speed.drifter_step_cooldown, d.initial_delay))
                .collect(),
            lock,
            memory,
            beam,
            door: Door::new(layout.door, layout.door_locked),
            complete: false,
            tick: 0,
            layout: layout.clone(),
        }
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.layout.movement
    }

    pub fn win_rule(&self) -> WinRule {
        self.layout.win
    }

    /// The generic obstacle view: what blocks the player this tick.
    pub fn obstacles(&self) -> ObstacleSet {
        obstacle::compose(&self.grid, &self.gates, &self.gears, self.lock.closed_gate_tiles(), [])
    }

    /// The chaser's view: the generic union plus boulder and mirror
    /// tiles, which the chaser cannot push or rotate its way through.
    pub fn enemy_obstacles(&self) -> ObstacleSet {
        let extra: Vec<Coord> = self
            .boulders
            .iter()
            .map(|b| b.pos)
            .chain(self.mirrors.iter().map(|m| m.pos))
            .collect();
        obstacle::compose(&self.grid, &self.gates, &self.gears, self.lock.closed_gate_tiles(), extra)
    }

    /// Is the player standing in a lethal gear tile right now?
    pub fn player_in_gear(&self) -> bool {
        self.gears
            .iter()
            .any(|g| g.axle() == self.player.pos || g.sweep().contains(&self.player.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::layout::{self, MirrorSpec, WinRule};
    use crate::domain::entity::MirrorKind;

    fn speed() -> SpeedConfig {
        GameConfig::default().speed
    }

    fn small_layout() -> RoomLayout {
        let rows = ["WWWWWW", "WS B W", "W  P W", "W   EW", "WWWWWW"];
        let mut layout = layout::parse_glyph_grid(
            "test room",
            &rows,
            layout::MovementMode::DiscretePush,
            WinRule::AllPlates,
        )
        .unwrap();
        layout.mirrors.push(MirrorSpec { pos: (2, 3), kind: MirrorKind::Slash });
        layout
    }

    #[test]
    fn build_places_everything_from_layout() {
        let layout = small_layout();
        let room = RoomState::build(&layout, &speed());
        assert_eq!(room.player.pos, (1, 1));
        assert_eq!(room.boulders[0].pos, (3, 1));
        assert_eq!(room.plates[0].pos, (3, 2));
        assert_eq!(room.door.pos, (4, 3));
        assert!(room.door.locked);
        assert!(!room.complete);
    }

    #[test]
    fn build_is_reproducible() {
        let layout = layout::builtin_rooms(99).remove(3); // memory room
        let a = RoomState::build(&layout, &speed());
        let b = RoomState::build(&layout, &speed());
        assert_eq!(
            a.memory.as_ref().unwrap().sequence(),
            b.memory.as_ref().unwrap().sequence()
        );
    }

    #[test]
    fn enemy_view_blocks_boulders_and_mirrors_player_view_does_not() {
        let layout = small_layout();
        let room = RoomState::build(&layout, &speed());

        let player_view = room.obstacles();
        let enemy_view = room.enemy_obstacles();

        let boulder = room.boulders[0].pos;
        let mirror = room.mirrors[0].pos;
        assert!(!player_view.contains(boulder));
        assert!(!player_view.contains(mirror));
        assert!(enemy_view.contains(boulder));
        assert!(enemy_view.contains(mirror));

        // Walls block both.
        assert!(player_view.contains((0, 0)));
        assert!(enemy_view.contains((0, 0)));
    }

    #[test]
    fn player_in_gear_detects_sweep_contact() {
        let mut layout = small_layout();
        layout.gears.push(layout::GearSpec { center: (3, 3), radius: 2, speed: 1.0 });
        let mut room = RoomState::build(&layout, &speed());
        // At angle 0 the spokes are axis-aligned; (1, 1) is off all of them.
        assert!(!room.player_in_gear());
        room.player.pos = (4, 3);
        assert!(room.player_in_gear()); // spoke
        room.player.pos = (3, 3);
        assert!(room.player_in_gear()); // axle
    }
}
