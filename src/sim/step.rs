/// The step function: advances the active room by one tick.
///
/// Processing order (fixed — later passes must see this tick's state):
///   1. Hazard timers (bridge gates, gears, sequence-gate auto-close)
///   2. Player movement (and mirror rotation)
///   3. Enemy movement against this tick's obstacle views
///   4. Catch check — enemy contact or gear sweep over the player;
///      a catch rebuilds the whole room from its layout and returns
///      immediately, no further logic runs this tick
///   5. Triggers: keys, plates, switches, memory tiles, derived locks
///   6. Beam evaluation (every tick while a beam exists)
///   7. Win check: unlocked door + player on the door tile

use crate::config::SpeedConfig;
use crate::domain::entity::FrameInput;
use crate::domain::grid::Coord;
use crate::domain::movement::{self, MoveOutcome};
use crate::domain::puzzle::{MemoryOutcome, PressOutcome};
use super::event::{CatchCause, RoomEvent};
use super::layout::{MovementMode, WinRule};
use super::room::RoomState;

pub fn step(room: &mut RoomState, input: &FrameInput, speed: &SpeedConfig) -> Vec<RoomEvent> {
    if room.complete {
        return vec![];
    }

    let mut events: Vec<RoomEvent> = Vec::new();
    room.tick += 1;

    tick_hazards(room, &mut events);
    resolve_interact(room, input, &mut events);
    resolve_player_movement(room, input, &mut events);

    if let Some(cause) = resolve_enemies(room) {
        events.push(RoomEvent::PlayerCaught { cause });
        reset_room(room, speed);
        return events;
    }

    resolve_triggers(room, speed, &mut events);
    resolve_beam(room, &mut events);
    resolve_win(room, &mut events);

    events
}

/// Rebuild the room from its declarative layout. The only cancellation
/// primitive: every entity is reconstructed, nothing is rolled back
/// incrementally.
fn reset_room(room: &mut RoomState, speed: &SpeedConfig) {
    let layout = room.layout.clone();
    *room = RoomState::build(&layout, speed);
}

// ══════════════════════════════════════════════════════════════
// 1. Hazard timers
// ══════════════════════════════════════════════════════════════

fn tick_hazards(room: &mut RoomState, events: &mut Vec<RoomEvent>) {
    for gate in &mut room.gates {
        gate.tick();
    }
    for gear in &mut room.gears {
        gear.tick();
    }

    // Auto-close opened sequence gates; their switches become
    // pressable again.
    let closed = room.lock.tick(room.tick);
    for group in closed {
        for switch in room.switches.iter_mut().filter(|s| s.group == group) {
            switch.activated = false;
        }
        events.push(RoomEvent::GateClosed { group });
    }
}

// ══════════════════════════════════════════════════════════════
// 2. Player
// ══════════════════════════════════════════════════════════════

/// Rotate the mirror under the player, or failing that one adjacent to
/// them. In push rooms mirror tiles are impassable, so only the
/// adjacency case can fire there.
fn resolve_interact(room: &mut RoomState, input: &FrameInput, events: &mut Vec<RoomEvent>) {
    if !input.interact {
        return;
    }
    let (px, py) = room.player.pos;
    let target = room
        .mirrors
        .iter_mut()
        .filter(|m| (m.pos.0 - px).abs() <= 1 && (m.pos.1 - py).abs() <= 1)
        .min_by_key(|m| (m.pos.0 - px).abs() + (m.pos.1 - py).abs());
    if let Some(mirror) = target {
        mirror.rotate();
        events.push(RoomEvent::MirrorRotated { x: mirror.pos.0, y: mirror.pos.1 });
    }
}

fn resolve_player_movement(room: &mut RoomState, input: &FrameInput, events: &mut Vec<RoomEvent>) {
    if room.player.move_timer > 0 {
        room.player.move_timer -= 1;
        return;
    }

    let outcome = match room.movement_mode() {
        MovementMode::Continuous => {
            let dir = match input.held {
                Some(d) => d,
                None => return,
            };
            movement::resolve_step(room.player.pos, dir, &room.obstacles())
        }
        MovementMode::DiscretePush => {
            let dir = match input.pressed {
                Some(d) => d,
                None => return,
            };
            movement::resolve_push(
                room.player.pos,
                dir,
                &room.obstacles(),
                &room.boulders,
                &room.mirrors,
            )
        }
    };

    match outcome {
        MoveOutcome::Moved(next) => {
            room.player.pos = next;
            room.player.move_timer = room.player.move_cooldown;
        }
        MoveOutcome::Pushed { player, boulder_to } => {
            let from = player;
            if let Some(boulder) = room.boulders.iter_mut().find(|b| b.pos == from) {
                boulder.pos = boulder_to;
            }
            room.player.pos = player;
            room.player.move_timer = room.player.move_cooldown;
            events.push(RoomEvent::BoulderPushed { from, to: boulder_to });
        }
        MoveOutcome::Blocked => {}
    }
}

// ══════════════════════════════════════════════════════════════
// 3+4. Enemies and the catch check
// ══════════════════════════════════════════════════════════════

fn resolve_enemies(room: &mut RoomState) -> Option<CatchCause> {
    let player = room.player.pos;

    // All enemies act against this tick's views: the generic view for
    // patrollers and drifters, the boulder/mirror-augmented view for
    // chasers.
    let view = room.obstacles();
    let enemy_view = room.enemy_obstacles();

    let mut caught: Option<CatchCause> = None;

    for p in &mut room.patrollers {
        if p.tick(&view, player) {
            caught = caught.or(Some(CatchCause::Patroller));
        }
    }
    for c in &mut room.chasers {
        if c.tick(&enemy_view, player) {
            caught = caught.or(Some(CatchCause::Chaser));
        }
    }
    for d in &mut room.drifters {
        if d.tick(&view, player) {
            caught = caught.or(Some(CatchCause::Drifter));
        }
    }

    // The gears moved in pass 1; a spoke may have swept onto the player.
    if caught.is_none() && room.player_in_gear() {
        caught = Some(CatchCause::Gear);
    }

    caught
}

// ══════════════════════════════════════════════════════════════
// 5. Triggers and derived lock state
// ══════════════════════════════════════════════════════════════

fn resolve_triggers(room: &mut RoomState, speed: &SpeedConfig, events: &mut Vec<RoomEvent>) {
    let player = room.player.pos;

    // Keys.
    let mut picked_up = false;
    for key in &mut room.keys {
        if !key.collected && key.pos == player {
            key.collected = true;
            picked_up = true;
            break;
        }
    }
    if picked_up {
        let remaining = room.keys.iter().filter(|k| !k.collected).count();
        events.push(RoomEvent::KeyCollected { x: player.0, y: player.1, remaining });
    }

    // Plates: derived from boulder occupancy, recomputed every tick.
    let boulder_tiles: Vec<Coord> = room.boulders.iter().map(|b| b.pos).collect();
    let mut all_active = !room.plates.is_empty();
    for plate in &mut room.plates {
        let now_active = boulder_tiles.contains(&plate.pos);
        if now_active && !plate.active {
            events.push(RoomEvent::PlateActivated { x: plate.pos.0, y: plate.pos.1 });
        }
        plate.active = now_active;
        if !now_active {
            all_active = false;
        }
    }
    // Announce the all-active transition only on the tick that
    // completed it.
    if all_active && events.iter().any(|e| matches!(e, RoomEvent::PlateActivated { .. })) {
        events.push(RoomEvent::AllPlatesActive);
    }

    // Switches: stepping on an inactive switch appends its order index
    // to its group's progress.
    for i in 0..room.switches.len() {
        let (pos, activated) = (room.switches[i].pos, room.switches[i].activated);
        if pos != player || activated {
            continue;
        }
        room.switches[i].activated = true;
        let group = room.switches[i].group;
        let order_index = room.switches[i].order_index;
        match room.lock.press(group, order_index, room.tick, speed.sequence_open_ticks) {
            PressOutcome::Opened => events.push(RoomEvent::SequenceOpened { group }),
            PressOutcome::Advanced => {
                events.push(RoomEvent::SwitchPressed { group, order_index })
            }
            PressOutcome::Rejected => {
                // The whole group resets so it can be re-attempted.
                for switch in room.switches.iter_mut().filter(|s| s.group == group) {
                    switch.activated = false;
                }
                events.push(RoomEvent::SequenceFailed { group });
            }
        }
    }

    // Memory tiles.
    if let Some(memory) = room.memory.as_mut() {
        match memory.tick(player) {
            MemoryOutcome::Wrong => events.push(RoomEvent::MemoryFailed),
            MemoryOutcome::Solved => events.push(RoomEvent::MemorySolved),
            MemoryOutcome::Idle => {}
        }
    }

    // Derived door state. Unlocks are one-way: a gate re-closing or a
    // plate releasing never re-locks an already opened exit. Beam rooms
    // are the exception — there the beam alone drives the lock.
    let unlock = match room.win_rule() {
        WinRule::AllKeys => !room.keys.is_empty() && room.keys.iter().all(|k| k.collected),
        WinRule::AllPlates => all_active,
        WinRule::SequenceOpen(group) => room.lock.is_open(group),
        WinRule::MemorySolved => room.memory.as_ref().is_some_and(|m| m.is_complete()),
        WinRule::BeamReachesDoor | WinRule::OpenFromStart => false,
    };
    if unlock && room.door.locked {
        room.door.locked = false;
        events.push(RoomEvent::DoorUnlocked);
    }

    // Beam activation latch: plates switch the beam on, once.
    if room.win_rule() == WinRule::BeamReachesDoor && all_active {
        if let Some(beam) = room.beam.as_mut() {
            if !beam.active {
                beam.active = true;
                events.push(RoomEvent::BeamActivated);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// 6. Beam
// ══════════════════════════════════════════════════════════════

fn resolve_beam(room: &mut RoomState, events: &mut Vec<RoomEvent>) {
    if let Some(beam) = room.beam.as_mut() {
        let was_locked = room.door.locked;
        beam.recompute(&room.grid, &room.mirrors, &mut room.door);
        if was_locked && !room.door.locked {
            events.push(RoomEvent::DoorUnlocked);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// 7. Win check
// ══════════════════════════════════════════════════════════════

fn resolve_win(room: &mut RoomState, events: &mut Vec<RoomEvent>) {
    if !room.door.locked && room.player.pos == room.door.pos {
        room.complete = true;
        events.push(RoomEvent::RoomCleared);
    }
}
