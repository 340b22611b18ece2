/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a grid of Cells)
///   2. Compare each cell against `back` (the previous frame)
///   3. Emit terminal commands only for cells that changed
///   4. Batch everything with `queue!`, flush once at the end
///   5. Swap front/back
///
/// Each game cell spans two terminal columns so rooms look roughly
/// square in a typical terminal font.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::MirrorKind;
use crate::domain::grid::Coord;
use crate::sim::layout::WinRule;
use crate::sim::session::{Phase, Session};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so the
    /// inter-row gap color matches the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 16, b: 12 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel that differs from any real cell, to force a full diff.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── Palette ──

const WALL_BG: Color = Color::Rgb { r: 90, g: 82, b: 66 };
const FLOOR_BG: Color = Cell::BASE_BG;
const PLAYER_FG: Color = Color::Rgb { r: 80, g: 220, b: 100 };
const DOOR_LOCKED: Color = Color::Rgb { r: 140, g: 90, b: 40 };
const DOOR_OPEN: Color = Color::Rgb { r: 80, g: 140, b: 255 };
const KEY_FG: Color = Color::Yellow;
const BOULDER_FG: Color = Color::Rgb { r: 180, g: 170, b: 160 };
const PLATE_FG: Color = Color::Rgb { r: 120, g: 120, b: 130 };
const GEAR_FG: Color = Color::Rgb { r: 200, g: 60, b: 60 };
const ENEMY_FG: Color = Color::Red;
const BEAM_FG: Color = Color::Yellow;
const MIRROR_FG: Color = Color::Rgb { r: 180, g: 210, b: 230 };
const BRIDGE_FG: Color = Color::Rgb { r: 150, g: 120, b: 70 };
const GATE_BG: Color = Color::Rgb { r: 120, g: 80, b: 30 };
const SWITCH_FG: Color = Color::Rgb { r: 200, g: 120, b: 220 };
const MEMORY_DIM: Color = Color::Rgb { r: 70, g: 70, b: 80 };
const MEMORY_LIT: Color = Color::Yellow;
const MEMORY_OK: Color = Color::Green;
const HUD_FG: Color = Color::Rgb { r: 200, g: 190, b: 160 };
const TITLE_FG: Color = Color::Rgb { r: 230, g: 180, b: 80 };

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }
}

// ── Renderer ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Rows reserved above the map (HUD) and below it (message + help).
const MAP_ROW: usize = 2;
const RESERVED_ROWS: usize = MAP_ROW + 3;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &mut Session) -> io::Result<()> {
        // Detect terminal resize.
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Viewport dimensions from terminal size, capped to the room.
        let room_w = session.room.grid.width;
        let room_h = session.room.grid.height;
        session.camera.view_w = ((self.term_w / CELL_W) as i32).min(room_w.max(1));
        let max_view_h = self.term_h.saturating_sub(RESERVED_ROWS).max(1) as i32;
        session.camera.view_h = max_view_h.min(room_h.max(1));

        // Phase change → full repaint for a clean transition.
        if self.last_phase != Some(session.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(session.phase);
        }

        if session.phase == Phase::Playing {
            let target = session.room.player.pos;
            session.camera.follow(target, room_w, room_h);
        }

        self.front.clear();
        match session.phase {
            Phase::Title => self.compose_title(session),
            Phase::Transition => self.compose_transition(session),
            Phase::Playing => self.compose_game(session),
            Phase::GameComplete => self.compose_game_complete(session),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Screens ──

    fn compose_title(&mut self, session: &Session) {
        let mid = self.term_h / 2;
        self.front.put_centered(mid.saturating_sub(4), "T E M P L E   R U I N S", TITLE_FG, FLOOR_BG);
        self.front.put_centered(
            mid.saturating_sub(2),
            &format!("{} rooms stand between you and daylight", session.total_rooms()),
            HUD_FG,
            FLOOR_BG,
        );
        self.front.put_centered(mid + 1, "[Enter] Descend", Color::White, FLOOR_BG);
        self.front.put_centered(mid + 2, "[Q] Leave", Color::DarkGrey, FLOOR_BG);
    }

    fn compose_transition(&mut self, session: &Session) {
        let mid = self.term_h / 2;
        self.front.put_centered(
            mid.saturating_sub(2),
            &format!("Room {} of {}", session.room_index + 1, session.total_rooms()),
            HUD_FG,
            FLOOR_BG,
        );
        self.front.put_centered(mid, session.room_name(), TITLE_FG, FLOOR_BG);
        self.front.put_centered(mid + 2, "Get ready...", Color::DarkGrey, FLOOR_BG);
    }

    fn compose_game_complete(&mut self, session: &Session) {
        let mid = self.term_h / 2;
        self.front.put_centered(mid.saturating_sub(2), "Y O U   E S C A P E D", TITLE_FG, FLOOR_BG);
        self.front.put_centered(
            mid,
            &format!("All {} rooms cleared — {} resets", session.total_rooms(), session.resets),
            HUD_FG,
            FLOOR_BG,
        );
        self.front.put_centered(mid + 2, "[Enter] Back to title   [Q] Quit", Color::DarkGrey, FLOOR_BG);
    }

    // ── Game view ──

    /// Paint one game cell (2 terminal columns) in viewport space.
    fn put_cell(&mut self, view_pos: (i32, i32), left: char, right: char, fg: Color, bg: Color) {
        let (vx, vy) = view_pos;
        let tx = vx as usize * CELL_W;
        let ty = vy as usize + MAP_ROW;
        self.front.set(tx, ty, Cell::new(left, fg, bg));
        self.front.set(tx + 1, ty, Cell::new(right, fg, bg));
    }

    fn put_world(&mut self, session: &Session, pos: Coord, left: char, right: char, fg: Color, bg: Color) {
        if let Some(view) = session.camera.world_to_view(pos) {
            self.put_cell(view, left, right, fg, bg);
        }
    }

    fn compose_game(&mut self, session: &Session) {
        self.compose_hud(session);

        let room = &session.room;
        let cam = &session.camera;

        // Static walls for the visible window.
        for vy in 0..cam.view_h {
            for vx in 0..cam.view_w {
                let world = (cam.x + vx, cam.y + vy);
                if room.grid.in_bounds(world) && room.grid.is_wall(world) {
                    self.put_cell((vx, vy), ' ', ' ', Color::White, WALL_BG);
                }
            }
        }

        // Sequence gates (closed ones only — open gates are floor).
        let closed: Vec<Coord> = room.lock.closed_gate_tiles().collect();
        for pos in closed {
            self.put_world(session, pos, '▒', '▒', Color::Black, GATE_BG);
        }

        // Bridges.
        for gate in &room.gates {
            if gate.is_solid {
                self.put_world(session, gate.pos, '=', '=', BRIDGE_FG, FLOOR_BG);
            } else {
                self.put_world(session, gate.pos, '·', ' ', Color::DarkGrey, FLOOR_BG);
            }
        }

        // Memory tiles under everything that moves.
        if let Some(memory) = &room.memory {
            let flashing = memory.flashing();
            for &tile in memory.tiles() {
                let (fg, bg) = if flashing == Some(tile) {
                    (Color::Black, MEMORY_LIT)
                } else if memory.progress().contains(&tile) {
                    (Color::Black, MEMORY_OK)
                } else {
                    (MEMORY_DIM, FLOOR_BG)
                };
                self.put_world(session, tile, '[', ']', fg, bg);
            }
        }

        // Plates.
        for plate in &room.plates {
            let fg = if plate.active { Color::Green } else { PLATE_FG };
            self.put_world(session, plate.pos, '(', ')', fg, FLOOR_BG);
        }

        // Beam path.
        if let Some(beam) = &room.beam {
            for &pos in &beam.path {
                self.put_world(session, pos, '•', ' ', BEAM_FG, FLOOR_BG);
            }
            if beam.active {
                self.put_world(session, beam.origin, '*', ' ', BEAM_FG, FLOOR_BG);
            }
        }

        // Keys and switches.
        for key in room.keys.iter().filter(|k| !k.collected) {
            self.put_world(session, key.pos, 'k', ' ', KEY_FG, FLOOR_BG);
        }
        for switch in &room.switches {
            let fg = if switch.activated { Color::White } else { SWITCH_FG };
            let digit = char::from_digit(switch.order_index as u32 + 1, 10).unwrap_or('?');
            self.put_world(session, switch.pos, digit, ' ', fg, FLOOR_BG);
        }

        // Mirrors and boulders.
        for mirror in &room.mirrors {
            let ch = match mirror.kind {
                MirrorKind::Slash => '/',
                MirrorKind::Backslash => '\\',
            };
            self.put_world(session, mirror.pos, ch, ' ', MIRROR_FG, FLOOR_BG);
        }
        for boulder in &room.boulders {
            self.put_world(session, boulder.pos, 'O', ' ', BOULDER_FG, FLOOR_BG);
        }

        // Door.
        let door_color = if room.door.locked { DOOR_LOCKED } else { DOOR_OPEN };
        self.put_world(session, room.door.pos, '▐', '▌', Color::Black, door_color);

        // Gear sweeps over everything static.
        for gear in &room.gears {
            for tile in gear.sweep() {
                self.put_world(session, tile, '%', ' ', GEAR_FG, FLOOR_BG);
            }
            self.put_world(session, gear.axle(), '+', ' ', Color::White, Color::Rgb {
                r: 90,
                g: 30,
                b: 30,
            });
        }

        // Enemies, then the player on top.
        for drifter in &room.drifters {
            self.put_world(session, drifter.pos, 'x', ' ', ENEMY_FG, FLOOR_BG);
        }
        for patroller in &room.patrollers {
            self.put_world(session, patroller.pos, '&', ' ', ENEMY_FG, FLOOR_BG);
        }
        for chaser in &room.chasers {
            self.put_world(session, chaser.pos, '@', ' ', ENEMY_FG, FLOOR_BG);
        }
        self.put_world(session, room.player.pos, '▲', ' ', PLAYER_FG, FLOOR_BG);

        // Message + help lines under the map.
        let msg_row = MAP_ROW + cam.view_h as usize;
        if !session.message.is_empty() {
            self.front.put_centered(msg_row, &session.message, Color::White, FLOOR_BG);
        }
        self.front.put_str(
            0,
            msg_row + 1,
            "[Arrows] Move  [Space] Rotate mirror  [R] Restart room  [Esc] Quit",
            Color::DarkGrey,
            FLOOR_BG,
        );
    }

    fn compose_hud(&mut self, session: &Session) {
        let room = &session.room;
        let left = format!(
            " Room {}/{}  {}",
            session.room_index + 1,
            session.total_rooms(),
            session.room_name()
        );
        self.front.put_str(0, 0, &left, HUD_FG, FLOOR_BG);

        let status = match room.win_rule() {
            WinRule::AllKeys => {
                let got = room.keys.iter().filter(|k| k.collected).count();
                format!("Keys {}/{}", got, room.keys.len())
            }
            WinRule::AllPlates => {
                let active = room.plates.iter().filter(|p| p.active).count();
                format!("Plates {}/{}", active, room.plates.len())
            }
            WinRule::SequenceOpen(group) => {
                if room.lock.is_open(group) {
                    format!("Gate {group} open!")
                } else {
                    "Trip the switches in order".to_string()
                }
            }
            WinRule::MemorySolved => match &room.memory {
                Some(m) if m.is_showing() => "Watch the floor...".to_string(),
                Some(m) if m.is_complete() => "Sequence matched".to_string(),
                Some(m) => format!("Repeat {}/{}", m.progress().len(), m.sequence().len()),
                None => String::new(),
            },
            WinRule::BeamReachesDoor => {
                match &room.beam {
                    Some(b) if !b.active => "The light source is dormant".to_string(),
                    Some(_) if !room.door.locked => "The beam strikes the door!".to_string(),
                    Some(_) => "Guide the light".to_string(),
                    None => String::new(),
                }
            }
            WinRule::OpenFromStart => "The way is open — mind the gaps".to_string(),
        };
        let right = format!("{}   Resets {} ", status, session.resets);
        let x = self.term_w.saturating_sub(right.chars().count());
        self.front.put_str(x, 0, &right, HUD_FG, FLOOR_BG);
    }

    // ── Diff + flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Color> = None;
        let mut last_bg: Option<Color> = None;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.cells[y * self.front.width + x];
                let prev = self.back.cells[y * self.back.width + x];
                if cell == prev {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
