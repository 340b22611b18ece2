/// Declarative room layouts.
///
/// A `RoomLayout` is pure data: static walls plus entity placements.
/// `RoomState::build` consumes it at first load and again on every
/// reset, so "reset" is just "throw the state away and rebuild".
///
/// ## Sources
///   1. Programmatic builders (carved rectangles, the seeded maze)
///   2. A literal character grid, one glyph per entity
///
/// ## Glyph legend
///   'W' = wall                  'S' = player start
///   'E' = exit door             'C' = chaser
///   'B' = boulder               'P' = pressure plate
///   'M' = mirror ('/')          'L' = beam source (aims up-left)
///   'b' = bridge tile (phase group by `(x+y) % 2`)
///   'g' = gear                  ' ' = floor
///
/// Rows parse left-to-right, top-to-bottom. Any other glyph is a
/// configuration error and fails room construction.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::domain::entity::MirrorKind;
use crate::domain::grid::Coord;

/// Simulation ticks per second at the default tick rate; room
/// definitions express their durations through this.
pub const TICKS_PER_SEC: u32 = 33;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unrecognized glyph '{glyph}' at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: i32, y: i32 },
    #[error("layout '{0}' has no player start ('S')")]
    MissingPlayerStart(String),
    #[error("layout '{0}' has no exit door ('E')")]
    MissingExit(String),
    #[error("layout '{0}' has more than one player start")]
    DuplicatePlayerStart(String),
    #[error("layout '{0}' is empty")]
    EmptyGrid(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MovementMode {
    /// Held-key sampling, no push semantics.
    Continuous,
    /// Edge-triggered presses with single-boulder pushes.
    DiscretePush,
}

/// What unlocks the exit door.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WinRule {
    AllKeys,
    AllPlates,
    SequenceOpen(char),
    MemorySolved,
    /// The beam drives the lock; plates (if any) activate the beam.
    BeamReachesDoor,
    /// Unlocked from the start — the challenge is purely timing.
    OpenFromStart,
}

#[derive(Clone, Debug)]
pub struct GearSpec {
    pub center: Coord,
    pub radius: i32,
    pub speed: f32,
}

#[derive(Clone, Debug)]
pub struct GateSpec {
    pub pos: Coord,
    pub solid_ticks: u32,
    pub vanish_ticks: u32,
    pub offset: u32,
}

#[derive(Clone, Debug)]
pub struct MirrorSpec {
    pub pos: Coord,
    pub kind: MirrorKind,
}

#[derive(Clone, Debug)]
pub struct SwitchSpec {
    pub pos: Coord,
    pub order_index: usize,
    pub group: char,
}

#[derive(Clone, Debug)]
pub struct SequenceGroupSpec {
    pub id: char,
    pub order: Vec<usize>,
    pub gate_tiles: Vec<Coord>,
}

#[derive(Clone, Debug)]
pub struct PatrolSpec {
    pub start: Coord,
    pub waypoints: Vec<Coord>,
}

#[derive(Clone, Debug)]
pub struct DrifterSpec {
    pub pos: Coord,
    pub dir: (i32, i32),
    pub initial_delay: u32,
}

#[derive(Clone, Debug)]
pub struct BeamSpec {
    pub origin: Coord,
    pub dir: (i32, i32),
    pub active_from_start: bool,
}

#[derive(Clone, Debug)]
pub struct MemorySpec {
    pub tiles: Vec<Coord>,
    pub length: usize,
}

#[derive(Clone, Debug)]
pub struct RoomLayout {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub walls: HashSet<Coord>,
    pub player_start: Coord,
    pub door: Coord,
    pub door_locked: bool,
    pub movement: MovementMode,
    pub win: WinRule,
    pub boulders: Vec<Coord>,
    pub plates: Vec<Coord>,
    pub keys: Vec<Coord>,
    pub gears: Vec<GearSpec>,
    pub gates: Vec<GateSpec>,
    pub mirrors: Vec<MirrorSpec>,
    pub switches: Vec<SwitchSpec>,
    pub sequence_groups: Vec<SequenceGroupSpec>,
    pub patrollers: Vec<PatrolSpec>,
    pub chasers: Vec<Coord>,
    pub drifters: Vec<DrifterSpec>,
    pub beam: Option<BeamSpec>,
    pub memory: Option<MemorySpec>,
    /// Seeds anything the room derives at build time (memory sequence),
    /// so a reset reproduces the identical room.
    pub seed: u64,
}

impl RoomLayout {
    fn empty(name: &str, width: i32, height: i32) -> Self {
        RoomLayout {
            name: name.to_string(),
            width,
            height,
            walls: HashSet::new(),
            player_start: (0, 0),
            door: (0, 0),
            door_locked: true,
            movement: MovementMode::Continuous,
            win: WinRule::AllKeys,
            boulders: Vec::new(),
            plates: Vec::new(),
            keys: Vec::new(),
            gears: Vec::new(),
            gates: Vec::new(),
            mirrors: Vec::new(),
            switches: Vec::new(),
            sequence_groups: Vec::new(),
            patrollers: Vec::new(),
            chasers: Vec::new(),
            drifters: Vec::new(),
            beam: None,
            memory: None,
            seed: 0,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Glyph-grid parsing
// ══════════════════════════════════════════════════════════════

pub fn parse_glyph_grid(
    name: &str,
    rows: &[&str],
    movement: MovementMode,
    win: WinRule,
) -> Result<RoomLayout, LayoutError> {
    if rows.is_empty() {
        return Err(LayoutError::EmptyGrid(name.to_string()));
    }

    let height = rows.len() as i32;
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
    let mut layout = RoomLayout::empty(name, width, height);
    layout.movement = movement;
    layout.win = win;

    let mut player: Option<Coord> = None;
    let mut door: Option<Coord> = None;

    for (y, row) in rows.iter().enumerate() {
        for (x, glyph) in row.chars().enumerate() {
            let pos = (x as i32, y as i32);
            match glyph {
                ' ' => {}
                'W' => {
                    layout.walls.insert(pos);
                }
                'S' => {
                    if player.replace(pos).is_some() {
                        return Err(LayoutError::DuplicatePlayerStart(name.to_string()));
                    }
                }
                'E' => {
                    door = Some(pos);
                }
                'C' => layout.chasers.push(pos),
                'B' => layout.boulders.push(pos),
                'P' => layout.plates.push(pos),
                'M' => layout.mirrors.push(MirrorSpec { pos, kind: MirrorKind::Slash }),
                'L' => {
                    layout.beam = Some(BeamSpec {
                        origin: pos,
                        dir: (-1, -1),
                        active_from_start: false,
                    });
                }
                'b' => layout.gates.push(GateSpec {
                    pos,
                    solid_ticks: 2 * TICKS_PER_SEC,
                    vanish_ticks: 2 * TICKS_PER_SEC,
                    offset: ((pos.0 + pos.1) % 2) as u32 * TICKS_PER_SEC,
                }),
                'g' => layout.gears.push(GearSpec {
                    center: pos,
                    radius: 2,
                    speed: ((pos.0 % 2) + 1) as f32,
                }),
                other => {
                    return Err(LayoutError::UnknownGlyph { glyph: other, x: pos.0, y: pos.1 })
                }
            }
        }
    }

    layout.player_start = player.ok_or_else(|| LayoutError::MissingPlayerStart(name.to_string()))?;
    layout.door = door.ok_or_else(|| LayoutError::MissingExit(name.to_string()))?;
    Ok(layout)
}

// ══════════════════════════════════════════════════════════════
// Maze generation (randomized depth-first backtracker)
// ══════════════════════════════════════════════════════════════

/// Carve a maze into a fully walled rectangle. Cells at odd coordinates
/// become corridors; the carve starts at (1, 1) and tunnels in 2-cell
/// strides, knocking out the wall between. Width and height should be
/// odd so the border ring survives intact.
fn carve_maze(width: i32, height: i32, rng: &mut Pcg32) -> HashSet<Coord> {
    let mut walls: HashSet<Coord> = (0..width)
        .flat_map(|x| (0..height).map(move |y| (x, y)))
        .collect();

    let start = (1, 1);
    walls.remove(&start);
    let mut carved = HashSet::from([start]);
    let mut stack = vec![start];
    let mut dirs = [(2, 0), (-2, 0), (0, 2), (0, -2)];

    while let Some(&(x, y)) = stack.last() {
        dirs.shuffle(rng);
        let mut moved = false;
        for (dx, dy) in dirs {
            let next = (x + dx, y + dy);
            if next.0 >= 1
                && next.0 < width - 1
                && next.1 >= 1
                && next.1 < height - 1
                && !carved.contains(&next)
            {
                walls.remove(&(x + dx / 2, y + dy / 2));
                walls.remove(&next);
                carved.insert(next);
                stack.push(next);
                moved = true;
                break;
            }
        }
        if !moved {
            stack.pop();
        }
    }

    walls
}

fn carve_rect(walls: &mut HashSet<Coord>, x1: i32, y1: i32, x2: i32, y2: i32) {
    for x in x1..=x2 {
        for y in y1..=y2 {
            walls.remove(&(x, y));
        }
    }
}

fn full_walls(width: i32, height: i32) -> HashSet<Coord> {
    (0..width).flat_map(|x| (0..height).map(move |y| (x, y))).collect()
}

fn border_walls(width: i32, height: i32) -> HashSet<Coord> {
    let mut walls = HashSet::new();
    for x in 0..width {
        walls.insert((x, 0));
        walls.insert((x, height - 1));
    }
    for y in 0..height {
        walls.insert((0, y));
        walls.insert((width - 1, y));
    }
    walls
}

// ══════════════════════════════════════════════════════════════
// The built-in rooms
// ══════════════════════════════════════════════════════════════

pub fn builtin_rooms(seed: u64) -> Vec<RoomLayout> {
    vec![
        collapsed_antechamber(seed),
        hall_of_sequences(),
        gallery_of_light(seed.wrapping_add(2)),
        echo_chamber(seed.wrapping_add(3)),
        boulder_vault(),
        span_of_ruin(),
        gear_works(),
        sanctum_of_trials(),
    ]
}

/// Room 1: a seeded maze with three keys scattered through it.
fn collapsed_antechamber(seed: u64) -> RoomLayout {
    let (w, h) = (41, 31);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut layout = RoomLayout::empty("Collapsed Antechamber", w, h);
    layout.seed = seed;
    layout.walls = carve_maze(w, h, &mut rng);
    layout.player_start = (1, 1);
    layout.door = (w - 2, h - 2);
    layout.walls.remove(&layout.door);
    layout.win = WinRule::AllKeys;

    let mut open: Vec<Coord> = (1..w - 1)
        .flat_map(|x| (1..h - 1).map(move |y| (x, y)))
        .filter(|p| !layout.walls.contains(p) && *p != layout.player_start && *p != layout.door)
        .collect();
    open.sort_unstable(); // stable base order before the seeded shuffle
    open.shuffle(&mut rng);
    layout.keys = open.into_iter().take(3).collect();
    layout
}

/// Room 2: three switch pairs, each opening a timed corridor gate;
/// the last gate unlocks the exit.
fn hall_of_sequences() -> RoomLayout {
    let (w, h) = (61, 20);
    let mut layout = RoomLayout::empty("Hall of Sequences", w, h);
    layout.win = WinRule::SequenceOpen('C');

    let mut walls = full_walls(w, h);
    carve_rect(&mut walls, 2, 5, 10, 13);
    carve_rect(&mut walls, 14, 5, 22, 13);
    carve_rect(&mut walls, 26, 5, 34, 13);
    carve_rect(&mut walls, 38, 5, 50, 13);
    carve_rect(&mut walls, 10, 9, 14, 9);
    carve_rect(&mut walls, 22, 9, 26, 9);
    carve_rect(&mut walls, 34, 9, 38, 9);
    layout.walls = walls;

    layout.sequence_groups = vec![
        SequenceGroupSpec { id: 'A', order: vec![0, 1], gate_tiles: vec![(12, 9)] },
        SequenceGroupSpec { id: 'B', order: vec![0, 1], gate_tiles: vec![(24, 9)] },
        SequenceGroupSpec { id: 'C', order: vec![0, 1], gate_tiles: vec![(36, 9)] },
    ];
    layout.switches = vec![
        SwitchSpec { pos: (4, 7), order_index: 0, group: 'A' },
        SwitchSpec { pos: (8, 11), order_index: 1, group: 'A' },
        SwitchSpec { pos: (16, 7), order_index: 0, group: 'B' },
        SwitchSpec { pos: (20, 11), order_index: 1, group: 'B' },
        SwitchSpec { pos: (28, 7), order_index: 0, group: 'C' },
        SwitchSpec { pos: (32, 11), order_index: 1, group: 'C' },
    ];

    layout.door = (48, 9);
    layout.walls.remove(&layout.door);
    layout.player_start = (4, 9);
    layout
}

/// Room 3: an always-on beam, six mirrors, eight drifting hazards.
fn gallery_of_light(seed: u64) -> RoomLayout {
    let (w, h) = (61, 41);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut layout = RoomLayout::empty("Gallery of Light", w, h);
    layout.seed = seed;
    layout.win = WinRule::BeamReachesDoor;

    let mut walls = full_walls(w, h);
    carve_rect(&mut walls, 2, 2, 58, 38);
    layout.walls = walls;

    layout.player_start = (4, 10);
    layout.door = (55, 6);
    layout.walls.remove(&layout.door);

    layout.mirrors = vec![
        MirrorSpec { pos: (12, 10), kind: MirrorKind::Slash },
        MirrorSpec { pos: (12, 6), kind: MirrorKind::Backslash },
        MirrorSpec { pos: (30, 6), kind: MirrorKind::Backslash },
        MirrorSpec { pos: (30, 12), kind: MirrorKind::Slash },
        MirrorSpec { pos: (48, 12), kind: MirrorKind::Backslash },
        MirrorSpec { pos: (48, 6), kind: MirrorKind::Slash },
    ];

    const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    for _ in 0..8 {
        layout.drifters.push(DrifterSpec {
            pos: (rng.random_range(8..=50), rng.random_range(5..=30)),
            dir: DIRS[rng.random_range(0..4)],
            initial_delay: rng.random_range(0..10),
        });
    }

    layout.beam = Some(BeamSpec { origin: (5, 10), dir: (1, 0), active_from_start: true });
    layout
}

/// Room 4: the memory floor, guarded by three patrollers.
fn echo_chamber(seed: u64) -> RoomLayout {
    let (w, h) = (61, 41);
    let mut layout = RoomLayout::empty("Echo Chamber", w, h);
    layout.seed = seed;
    layout.win = WinRule::MemorySolved;

    let mut walls = full_walls(w, h);
    carve_rect(&mut walls, 2, 2, 58, 38);
    layout.walls = walls;

    layout.player_start = (5, 20);
    layout.door = (55, 20);
    layout.walls.remove(&layout.door);

    layout.memory = Some(MemorySpec {
        tiles: vec![
            (20, 15), (22, 15), (24, 15), (26, 15),
            (20, 17), (22, 17), (24, 17), (26, 17),
        ],
        length: 5,
    });

    layout.patrollers = vec![
        PatrolSpec { start: (15, 10), waypoints: vec![(15, 10), (40, 10)] },
        PatrolSpec { start: (40, 30), waypoints: vec![(40, 30), (15, 30)] },
        PatrolSpec { start: (30, 5), waypoints: vec![(30, 5), (30, 35)] },
    ];
    layout
}

/// Room 5: sokoban — three boulders onto three plates.
fn boulder_vault() -> RoomLayout {
    let (w, h) = (25, 20);
    let mut layout = RoomLayout::empty("Boulder Vault", w, h);
    layout.movement = MovementMode::DiscretePush;
    layout.win = WinRule::AllPlates;

    let mut walls = border_walls(w, h);
    for y in 8..12 {
        walls.insert((14, y));
    }
    for y in 0..5 {
        walls.insert((14, y));
    }
    for y in 15..20 {
        walls.insert((14, y));
    }
    layout.walls = walls;

    layout.player_start = (4, 5);
    layout.door = (w - 2, h / 2);
    layout.walls.remove(&layout.door);
    layout.boulders = vec![(7, 5), (10, 8), (7, 11)];
    layout.plates = vec![(18, 4), (20, 9), (18, 14)];
    layout
}

/// Room 6: platforms separated by timed bridges; the exit is open from
/// the start, the bridges are the whole challenge.
fn span_of_ruin() -> RoomLayout {
    let (w, h) = (50, 15);
    let mid = h / 2;
    let mut layout = RoomLayout::empty("Span of Ruin", w, h);
    layout.win = WinRule::OpenFromStart;
    layout.door_locked = false;

    let mut walls = HashSet::new();
    for x in 0..w {
        walls.insert((x, 0));
        walls.insert((x, h - 1));
    }
    for (start, end) in [(1, 8), (14, 20), (26, 32), (38, 48)] {
        for x in start..end {
            for y in 1..h - 1 {
                if y != mid {
                    walls.insert((x, y));
                }
            }
        }
    }
    layout.walls = walls;

    // Gap 1: slow bridge, all tiles in phase.
    for x in 9..14 {
        layout.gates.push(GateSpec {
            pos: (x, mid),
            solid_ticks: 3 * TICKS_PER_SEC,
            vanish_ticks: 2 * TICKS_PER_SEC,
            offset: 0,
        });
    }
    // Gap 2: faster bridge, phase-shifted.
    for x in 21..26 {
        layout.gates.push(GateSpec {
            pos: (x, mid),
            solid_ticks: 2 * TICKS_PER_SEC,
            vanish_ticks: 2 * TICKS_PER_SEC,
            offset: TICKS_PER_SEC,
        });
    }
    // Gap 3: a "running" bridge — tiles appear one after another.
    for (i, x) in (33..38).enumerate() {
        layout.gates.push(GateSpec {
            pos: (x, mid),
            solid_ticks: 2 * TICKS_PER_SEC,
            vanish_ticks: 5 * TICKS_PER_SEC / 2,
            offset: 3 * TICKS_PER_SEC / 2 + i as u32 * TICKS_PER_SEC / 4,
        });
    }

    layout.player_start = (2, mid);
    layout.door = (w - 3, mid);
    layout
}

/// Room 7: three gears of differing radius and speed guarding keys.
fn gear_works() -> RoomLayout {
    let (w, h) = (40, 25);
    let mut layout = RoomLayout::empty("Gear Works", w, h);
    layout.win = WinRule::AllKeys;

    layout.walls = border_walls(w, h);
    layout.player_start = (3, 3);
    layout.door = (w - 4, h - 4);

    layout.gears = vec![
        GearSpec { center: (10, 8), radius: 4, speed: 1.0 },
        GearSpec { center: (20, 15), radius: 5, speed: -1.5 },
        GearSpec { center: (30, 6), radius: 4, speed: 2.0 },
    ];
    layout.keys = vec![(10, 13), (15, 15), (30, 11)];
    layout
}

/// Room 8: everything at once, declared as a glyph grid. The plates
/// activate the beam; the beam, routed through rotatable mirrors,
/// unlocks the door.
const SANCTUM_MAP: [&str; 14] = [
    "WWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWW",
    "WS                  M  EB   P                   W",
    "WWWW  WWWWWWWWWWWWWWWWWW  WWWWWWWWWWWWWW  WWWWWWW",
    "W               W               W               W",
    "W   g   g   g   W   B       P   W       M       W",
    "W               W               W               W",
    "WWWWWWWW  WWWWWWWWWW  WWWWWWWWWWWWWWWWWWWWWW  WWW",
    "W       M         C           P     B           W",
    "W                                               W",
    "WWWW  WWWWWWWWWWWWWWWWWW  WWWWWWWWWWWWWW  WWWWWWW",
    "WbbbbbbbbbbW    W               W               W",
    "WbbbbbbbbbbW    W   g     g     W               W",
    "WbbbbbbbbbbW    W               W L             W",
    "WWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWW",
];

fn sanctum_of_trials() -> RoomLayout {
    // The embedded map is known-good; a parse failure here is a defect
    // in the map itself, caught by the unit test below.
    parse_glyph_grid(
        "Sanctum of Trials",
        &SANCTUM_MAP,
        MovementMode::DiscretePush,
        WinRule::BeamReachesDoor,
    )
    .expect("embedded sanctum map must parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_grid_places_entities() {
        let rows = ["WWWWW", "WS BW", "WP EW", "WWWWW"];
        let layout =
            parse_glyph_grid("t", &rows, MovementMode::DiscretePush, WinRule::AllPlates).unwrap();
        assert_eq!(layout.player_start, (1, 1));
        assert_eq!(layout.boulders, vec![(3, 1)]);
        assert_eq!(layout.plates, vec![(1, 2)]);
        assert_eq!(layout.door, (3, 2));
        assert_eq!(layout.width, 5);
        assert_eq!(layout.height, 4);
        assert!(layout.walls.contains(&(0, 0)));
        assert!(!layout.walls.contains(&(2, 1)));
    }

    #[test]
    fn unknown_glyph_fails_with_position() {
        let rows = ["WWW", "WSW", "WxW"];
        let err =
            parse_glyph_grid("t", &rows, MovementMode::Continuous, WinRule::AllKeys).unwrap_err();
        assert_eq!(err, LayoutError::UnknownGlyph { glyph: 'x', x: 1, y: 2 });
    }

    #[test]
    fn missing_player_start_fails() {
        let rows = ["WWW", "W EW"];
        let err =
            parse_glyph_grid("t", &rows, MovementMode::Continuous, WinRule::AllKeys).unwrap_err();
        assert_eq!(err, LayoutError::MissingPlayerStart("t".to_string()));
    }

    #[test]
    fn missing_exit_fails() {
        let rows = ["WWW", "WSW", "WWW"];
        let err =
            parse_glyph_grid("t", &rows, MovementMode::Continuous, WinRule::AllKeys).unwrap_err();
        assert_eq!(err, LayoutError::MissingExit("t".to_string()));
    }

    #[test]
    fn duplicate_player_start_fails() {
        let rows = ["WSW", "WSW"];
        let err =
            parse_glyph_grid("t", &rows, MovementMode::Continuous, WinRule::AllKeys).unwrap_err();
        assert_eq!(err, LayoutError::DuplicatePlayerStart("t".to_string()));
    }

    #[test]
    fn bridge_glyph_phase_groups_by_parity() {
        let rows = ["WWWW", "WSbW", "WbEW", "WWWW"];
        let layout =
            parse_glyph_grid("t", &rows, MovementMode::Continuous, WinRule::OpenFromStart).unwrap();
        assert_eq!(layout.gates.len(), 2);
        let by_pos = |p: Coord| layout.gates.iter().find(|g| g.pos == p).unwrap();
        assert_eq!(by_pos((2, 1)).offset, TICKS_PER_SEC); // (2+1) odd
        assert_eq!(by_pos((1, 2)).offset, TICKS_PER_SEC);
    }

    #[test]
    fn maze_keeps_border_and_carves_start() {
        let mut rng = Pcg32::seed_from_u64(42);
        let walls = carve_maze(21, 21, &mut rng);
        assert!(!walls.contains(&(1, 1)));
        for x in 0..21 {
            assert!(walls.contains(&(x, 0)));
            assert!(walls.contains(&(x, 20)));
        }
        for y in 0..21 {
            assert!(walls.contains(&(0, y)));
            assert!(walls.contains(&(20, y)));
        }
        // Every odd-odd cell is reachable corridor in a DFS carve.
        for x in (1..21).step_by(2) {
            for y in (1..21).step_by(2) {
                assert!(!walls.contains(&(x, y)));
            }
        }
    }

    #[test]
    fn maze_is_deterministic_per_seed() {
        let a = carve_maze(21, 21, &mut Pcg32::seed_from_u64(9));
        let b = carve_maze(21, 21, &mut Pcg32::seed_from_u64(9));
        let c = carve_maze(21, 21, &mut Pcg32::seed_from_u64(10));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn builtin_rooms_are_well_formed() {
        let rooms = builtin_rooms(1234);
        assert_eq!(rooms.len(), 8);
        for room in &rooms {
            assert!(
                !room.walls.contains(&room.player_start),
                "player start inside a wall in '{}'",
                room.name
            );
            assert!(
                !room.walls.contains(&room.door),
                "door inside a wall in '{}'",
                room.name
            );
        }
    }

    #[test]
    fn antechamber_scatter_is_reproducible() {
        let a = collapsed_antechamber(77);
        let b = collapsed_antechamber(77);
        assert_eq!(a.keys, b.keys);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.keys.len(), 3);
        for key in &a.keys {
            assert!(!a.walls.contains(key));
        }
    }

    #[test]
    fn sanctum_map_parses() {
        let layout = sanctum_of_trials();
        assert_eq!(layout.movement, MovementMode::DiscretePush);
        assert!(layout.beam.is_some());
        assert!(!layout.chasers.is_empty());
        assert!(layout.boulders.len() >= 3);
        assert_eq!(layout.boulders.len(), layout.plates.len());
    }
}
