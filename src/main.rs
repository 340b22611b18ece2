/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::{FrameInput, MoveDir};
use sim::event::{CatchCause, RoomEvent};
use sim::session::{Phase, Session};
use sim::step;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let mut session = Session::new(config);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for exploring the Temple Ruins!");
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(session.config.speed.tick_rate_ms);

    // Edge-triggered input arrives between simulation ticks; latch it
    // here so a press is never lost to frame/tick phase drift.
    let mut pending_press: Option<MoveDir> = None;
    let mut pending_interact = false;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(session, &kb) {
            break;
        }

        if session.phase == Phase::Playing {
            if let Some(dir) = detect_pressed(&kb) {
                pending_press = Some(dir);
            }
            if kb.any_pressed(KEYS_INTERACT) {
                pending_interact = true;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            match session.phase {
                Phase::Playing => {
                    let input = FrameInput {
                        held: detect_held(&kb),
                        pressed: pending_press.take(),
                        interact: std::mem::take(&mut pending_interact),
                    };
                    let speed = session.config.speed.clone();
                    let events = step::step(&mut session.room, &input, &speed);
                    process_events(session, &events);
                }
                Phase::Transition => {
                    session.transition_timer = session.transition_timer.saturating_sub(1);
                    if session.transition_timer == 0 {
                        session.phase = Phase::Playing;
                    }
                }
                _ => {}
            }

            session.tick_message();
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_INTERACT: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Held-direction snapshot for continuous rooms.
/// Priority: left, right, up, down — one direction per tick.
fn detect_held(kb: &InputState) -> Option<MoveDir> {
    if kb.any_held(KEYS_LEFT) {
        Some(MoveDir::Left)
    } else if kb.any_held(KEYS_RIGHT) {
        Some(MoveDir::Right)
    } else if kb.any_held(KEYS_UP) {
        Some(MoveDir::Up)
    } else if kb.any_held(KEYS_DOWN) {
        Some(MoveDir::Down)
    } else {
        None
    }
}

/// Edge-triggered direction for push rooms, same priority order.
fn detect_pressed(kb: &InputState) -> Option<MoveDir> {
    if kb.any_pressed(KEYS_LEFT) {
        Some(MoveDir::Left)
    } else if kb.any_pressed(KEYS_RIGHT) {
        Some(MoveDir::Right)
    } else if kb.any_pressed(KEYS_UP) {
        Some(MoveDir::Up)
    } else if kb.any_pressed(KEYS_DOWN) {
        Some(MoveDir::Down)
    } else {
        None
    }
}

/// Phase/meta-key handling. Returns true to quit the game.
fn handle_meta(session: &mut Session, kb: &InputState) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.any_pressed(&[KeyCode::Esc]);

    match session.phase {
        Phase::Title => {
            if confirm {
                session.resets = 0;
                let start = session.config.general.start_room.min(session.total_rooms() - 1);
                session.load_room(start);
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return true;
            }
        }

        Phase::Transition => {
            if confirm {
                session.transition_timer = 0;
                session.phase = Phase::Playing;
            } else if esc {
                session.phase = Phase::Title;
            }
        }

        Phase::Playing => {
            if esc {
                session.phase = Phase::Title;
            } else if kb.any_pressed(KEYS_RESTART) {
                session.restart_room();
                session.set_message("Room restarted", 40);
            }
        }

        Phase::GameComplete => {
            if confirm {
                session.phase = Phase::Title;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return true;
            }
        }
    }

    false
}

/// Turn simulation events into status messages and phase changes.
fn process_events(session: &mut Session, events: &[RoomEvent]) {
    for event in events {
        match event {
            RoomEvent::KeyCollected { remaining, .. } => {
                if *remaining == 0 {
                    session.set_message("All keys found!", 60);
                } else {
                    session.set_message(&format!("Picked up a key — {remaining} left"), 50);
                }
            }
            RoomEvent::SwitchPressed { .. } => {}
            RoomEvent::SequenceOpened { group } => {
                session.set_message(&format!("Gate {group} grinds open!"), 50);
            }
            RoomEvent::SequenceFailed { .. } => {
                session.set_message("Wrong order — the switches reset", 50);
            }
            RoomEvent::GateClosed { group } => {
                session.set_message(&format!("Gate {group} slams shut"), 50);
            }
            RoomEvent::AllPlatesActive => {
                session.set_message("Every plate is pressed", 50);
            }
            RoomEvent::BeamActivated => {
                session.set_message("The light source flares to life!", 60);
            }
            RoomEvent::DoorUnlocked => {
                session.set_message("The exit is open!", 60);
            }
            RoomEvent::MemoryFailed => {
                session.set_message("Wrong tile — start the pattern over", 50);
            }
            RoomEvent::MemorySolved => {
                session.set_message("The floor hums — pattern matched", 60);
            }
            RoomEvent::PlayerCaught { cause } => {
                session.resets += 1;
                let msg = match cause {
                    CatchCause::Gear => "Clipped by a gear! The room resets",
                    CatchCause::Chaser => "Run down by the guardian! The room resets",
                    CatchCause::Patroller => "Spotted by a sentry! The room resets",
                    CatchCause::Drifter => "Struck by debris! The room resets",
                };
                session.set_message(msg, 70);
                session.camera.center_on(
                    session.room.player.pos,
                    session.room.grid.width,
                    session.room.grid.height,
                );
            }
            RoomEvent::RoomCleared => {
                session.advance_room();
            }
            RoomEvent::PlateActivated { .. }
            | RoomEvent::BoulderPushed { .. }
            | RoomEvent::MirrorRotated { .. } => {}
        }
    }
}
