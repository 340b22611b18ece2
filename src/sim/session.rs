/// Session: the running game around the active room.
///
/// Owns the room sequence, the phase machine, the scrolling camera and
/// the transient status message. The simulation core never sees any of
/// this — it works on `RoomState` alone.

use crate::config::GameConfig;
use crate::domain::grid::Coord;
use super::layout::{self, RoomLayout};
use super::room::RoomState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    /// The between-rooms card ("Room 3 — Gallery of Light").
    Transition,
    Playing,
    GameComplete,
}

/// Camera: a viewport into the room.
///
/// `(x, y)` is the world coordinate of the top-left visible cell; the
/// viewport dimensions are set by the renderer from the terminal size.
/// Uses a dead-zone follow: the camera only scrolls when the player
/// nears the edge of the view. Rooms smaller than the viewport are
/// centered.
#[derive(Clone, Debug)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: i32,
    pub view_h: i32,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0, y: 0, view_w: 0, view_h: 0 }
    }

    pub fn follow(&mut self, (tx, ty): Coord, world_w: i32, world_h: i32) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }

        if world_w <= self.view_w {
            self.x = -((self.view_w - world_w) / 2);
        } else {
            let margin = self.view_w / 5;
            if tx < self.x + margin {
                self.x = tx - margin;
            } else if tx > self.x + self.view_w - margin - 1 {
                self.x = tx - self.view_w + margin + 1;
            }
            self.x = self.x.clamp(0, (world_w - self.view_w).max(0));
        }

        if world_h <= self.view_h {
            self.y = -((self.view_h - world_h) / 2);
        } else {
            let margin = self.view_h / 5;
            if ty < self.y + margin {
                self.y = ty - margin;
            } else if ty > self.y + self.view_h - margin - 1 {
                self.y = ty - self.view_h + margin + 1;
            }
            self.y = self.y.clamp(0, (world_h - self.view_h).max(0));
        }
    }

    /// Snap directly onto a position (no dead zone). Used on room load.
    pub fn center_on(&mut self, (tx, ty): Coord, world_w: i32, world_h: i32) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }
        self.x = if world_w <= self.view_w {
            -((self.view_w - world_w) / 2)
        } else {
            (tx - self.view_w / 2).clamp(0, (world_w - self.view_w).max(0))
        };
        self.y = if world_h <= self.view_h {
            -((self.view_h - world_h) / 2)
        } else {
            (ty - self.view_h / 2).clamp(0, (world_h - self.view_h).max(0))
        };
    }

    /// Convert a world coordinate to a viewport coordinate, if visible.
    pub fn world_to_view(&self, (wx, wy): Coord) -> Option<(i32, i32)> {
        let vx = wx - self.x;
        let vy = wy - self.y;
        if vx >= 0 && vx < self.view_w && vy >= 0 && vy < self.view_h {
            Some((vx, vy))
        } else {
            None
        }
    }
}

/// How long the between-rooms card stays up.
pub const TRANSITION_TICKS: u32 = 2 * layout::TICKS_PER_SEC;

pub struct Session {
    pub config: GameConfig,
    pub layouts: Vec<RoomLayout>,
    pub room_index: usize,
    pub room: RoomState,
    pub phase: Phase,
    pub transition_timer: u32,
    pub message: String,
    pub message_timer: u32,
    pub camera: Camera,
    /// Times the current run has been reset by a catch, for the HUD.
    pub resets: u32,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let layouts = layout::builtin_rooms(config.general.world_seed);
        let start = config.general.start_room.min(layouts.len() - 1);
        let room = RoomState::build(&layouts[start], &config.speed);
        Session {
            layouts,
            room_index: start,
            room,
            phase: Phase::Title,
            transition_timer: 0,
            message: String::new(),
            message_timer: 0,
            camera: Camera::new(),
            resets: 0,
            config,
        }
    }

    pub fn total_rooms(&self) -> usize {
        self.layouts.len()
    }

    pub fn room_name(&self) -> &str {
        &self.layouts[self.room_index].name
    }

    /// Enter the transition card for the given room and rebuild it.
    pub fn load_room(&mut self, index: usize) {
        self.room_index = index;
        self.room = RoomState::build(&self.layouts[index], &self.config.speed);
        self.phase = Phase::Transition;
        self.transition_timer = TRANSITION_TICKS;
        self.camera.center_on(
            self.room.player.pos,
            self.room.grid.width,
            self.room.grid.height,
        );
    }

    /// Move to the next room, or finish the game after the last one.
    pub fn advance_room(&mut self) {
        if self.room_index + 1 < self.layouts.len() {
            self.load_room(self.room_index + 1);
        } else {
            self.phase = Phase::GameComplete;
        }
    }

    /// Restart the current room from its layout (player-initiated).
    pub fn restart_room(&mut self) {
        self.room = RoomState::build(&self.layouts[self.room_index], &self.config.speed);
        self.camera.center_on(
            self.room.player.pos,
            self.room.grid.width,
            self.room.grid.height,
        );
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_centers_small_world() {
        let mut cam = Camera::new();
        cam.view_w = 20;
        cam.view_h = 10;
        cam.center_on((2, 2), 10, 6);
        assert_eq!(cam.x, -5);
        assert_eq!(cam.y, -2);
    }

    #[test]
    fn camera_clamps_to_world_edges() {
        let mut cam = Camera::new();
        cam.view_w = 10;
        cam.view_h = 10;
        cam.center_on((0, 0), 40, 40);
        assert_eq!((cam.x, cam.y), (0, 0));
        cam.center_on((39, 39), 40, 40);
        assert_eq!((cam.x, cam.y), (30, 30));
    }

    #[test]
    fn camera_dead_zone_holds_until_edge() {
        let mut cam = Camera::new();
        cam.view_w = 20;
        cam.view_h = 10;
        cam.center_on((20, 20), 60, 60);
        let (cx, cy) = (cam.x, cam.y);
        // A small move inside the dead zone does not scroll.
        cam.follow((21, 20), 60, 60);
        assert_eq!((cam.x, cam.y), (cx, cy));
        // A move past the margin does.
        cam.follow((cam.x + 19, 20), 60, 60);
        assert!(cam.x > cx);
    }

    #[test]
    fn session_advances_through_rooms_to_completion() {
        let mut session = Session::new(GameConfig::default());
        assert_eq!(session.phase, Phase::Title);
        session.load_room(0);
        assert_eq!(session.phase, Phase::Transition);
        for i in 1..session.total_rooms() {
            session.advance_room();
            assert_eq!(session.room_index, i);
        }
        session.advance_room();
        assert_eq!(session.phase, Phase::GameComplete);
    }
}
