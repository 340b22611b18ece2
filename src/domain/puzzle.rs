/// Win-gating puzzle state: ordered switch sequences with auto-closing
/// gates, and the watch-then-repeat memory floor.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::grid::Coord;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PressOutcome {
    /// Valid prefix so far; keep going.
    Advanced,
    /// Exact match; the group's gate is now open.
    Opened,
    /// Diverged from every valid prefix; group progress was reset.
    Rejected,
}

/// Ordered-switch lock. Each group requires its switches in a declared
/// order; a wrong entry resets that group (and the caller deactivates
/// its switches so they can be pressed again). An opened gate re-locks
/// after a fixed duration measured from open time, regardless of any
/// further input.
#[derive(Clone, Debug)]
pub struct SequenceLock {
    required: HashMap<char, Vec<usize>>,
    gate_tiles: HashMap<char, Vec<Coord>>,
    progress: HashMap<char, Vec<usize>>,
    open: HashSet<char>,
    open_until: HashMap<char, u64>,
}

impl SequenceLock {
    pub fn new(groups: Vec<(char, Vec<usize>, Vec<Coord>)>) -> Self {
        let mut required = HashMap::new();
        let mut gate_tiles = HashMap::new();
        let mut progress = HashMap::new();
        for (id, order, tiles) in groups {
            progress.insert(id, Vec::new());
            required.insert(id, order);
            gate_tiles.insert(id, tiles);
        }
        SequenceLock {
            required,
            gate_tiles,
            progress,
            open: HashSet::new(),
            open_until: HashMap::new(),
        }
    }

    pub fn is_open(&self, group: char) -> bool {
        self.open.contains(&group)
    }

    /// Tiles of every currently closed gate, for the obstacle union.
    pub fn closed_gate_tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        self.gate_tiles
            .iter()
            .filter(|(id, _)| !self.open.contains(id))
            .flat_map(|(_, tiles)| tiles.iter().copied())
    }

    /// Record a switch press for its group.
    pub fn press(&mut self, group: char, order_index: usize, now: u64, open_ticks: u64) -> PressOutcome {
        let required = match self.required.get(&group) {
            Some(r) => r.clone(),
            None => return PressOutcome::Rejected,
        };
        let progress = self.progress.entry(group).or_default();
        progress.push(order_index);

        if *progress == required {
            progress.clear();
            self.open.insert(group);
            self.open_until.insert(group, now + open_ticks);
            PressOutcome::Opened
        } else if required.starts_with(progress) {
            PressOutcome::Advanced
        } else {
            progress.clear();
            PressOutcome::Rejected
        }
    }

    /// Re-lock any gate whose open window has elapsed. Returns the
    /// groups that closed this tick.
    pub fn tick(&mut self, now: u64) -> Vec<char> {
        let mut closed = Vec::new();
        let open_until = &self.open_until;
        self.open.retain(|&id| {
            let still_open = open_until.get(&id).map_or(true, |&until| now < until);
            if !still_open {
                closed.push(id);
            }
            still_open
        });
        for id in &closed {
            self.open_until.remove(id);
        }
        closed
    }
}

/// The memory floor: a secret sequence over a fixed tile set is flashed
/// once, then the player must walk it back in order. A wrong tile
/// resets the player's progress (never the room).
#[derive(Clone, Debug)]
pub struct MemoryTiles {
    tiles: Vec<Coord>,
    sequence: Vec<Coord>,
    progress: Vec<Coord>,
    show_index: usize,
    show_timer: u32,
    show_ticks: u32,
    showing: bool,
    complete: bool,
    last_player_pos: Option<Coord>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemoryOutcome {
    Idle,
    Wrong,
    Solved,
}

impl MemoryTiles {
    pub fn new<R: Rng>(tiles: Vec<Coord>, length: usize, show_ticks: u32, rng: &mut R) -> Self {
        let sequence = (0..length)
            .map(|_| tiles[rng.random_range(0..tiles.len())])
            .collect();
        MemoryTiles {
            tiles,
            sequence,
            progress: Vec::new(),
            show_index: 0,
            show_timer: show_ticks,
            show_ticks,
            showing: true,
            complete: false,
            last_player_pos: None,
        }
    }

    pub fn tiles(&self) -> &[Coord] {
        &self.tiles
    }

    pub fn sequence(&self) -> &[Coord] {
        &self.sequence
    }

    pub fn progress(&self) -> &[Coord] {
        &self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// The tile currently flashed during the show phase, if any.
    /// Briefly blanks between repeats of the same tile.
    pub fn flashing(&self) -> Option<Coord> {
        if self.showing && self.show_timer > 5 {
            self.sequence.get(self.show_index).copied()
        } else {
            None
        }
    }

    /// Advance one tick with the player's current position.
    pub fn tick(&mut self, player: Coord) -> MemoryOutcome {
        if self.complete {
            return MemoryOutcome::Idle;
        }

        if self.showing {
            self.show_timer = self.show_timer.saturating_sub(1);
            if self.show_timer == 0 {
                self.show_index += 1;
                self.show_timer = self.show_ticks;
                if self.show_index >= self.sequence.len() {
                    self.showing = false;
                }
            }
            return MemoryOutcome::Idle;
        }

        let mut outcome = MemoryOutcome::Idle;
        if self.tiles.contains(&player) && self.last_player_pos != Some(player) {
            self.progress.push(player);
            if self.progress.last() != self.sequence.get(self.progress.len() - 1) {
                self.progress.clear();
                outcome = MemoryOutcome::Wrong;
            } else if self.progress.len() == self.sequence.len() {
                self.complete = true;
                outcome = MemoryOutcome::Solved;
            }
        }
        self.last_player_pos = Some(player);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    // ── SequenceLock ──

    fn lock_ab() -> SequenceLock {
        SequenceLock::new(vec![('A', vec![0, 1], vec![(12, 9)])])
    }

    #[test]
    fn correct_order_opens_gate() {
        let mut lock = lock_ab();
        assert_eq!(lock.press('A', 0, 10, 100), PressOutcome::Advanced);
        assert_eq!(lock.press('A', 1, 11, 100), PressOutcome::Opened);
        assert!(lock.is_open('A'));
        assert_eq!(lock.closed_gate_tiles().count(), 0);
    }

    #[test]
    fn wrong_order_resets_group_progress() {
        let mut lock = lock_ab();
        assert_eq!(lock.press('A', 1, 0, 100), PressOutcome::Rejected);
        assert!(!lock.is_open('A'));
        // Progress was cleared, so the correct order works afterwards.
        assert_eq!(lock.press('A', 0, 1, 100), PressOutcome::Advanced);
        assert_eq!(lock.press('A', 1, 2, 100), PressOutcome::Opened);
    }

    #[test]
    fn divergence_mid_sequence_resets() {
        let mut lock = SequenceLock::new(vec![('B', vec![0, 1, 2], vec![(3, 3)])]);
        assert_eq!(lock.press('B', 0, 0, 100), PressOutcome::Advanced);
        assert_eq!(lock.press('B', 2, 1, 100), PressOutcome::Rejected);
    }

    #[test]
    fn open_gate_relocks_after_duration() {
        let mut lock = lock_ab();
        lock.press('A', 0, 0, 50);
        lock.press('A', 1, 5, 50);
        assert!(lock.is_open('A'));

        assert!(lock.tick(54).is_empty());
        assert!(lock.is_open('A'));

        let closed = lock.tick(55);
        assert_eq!(closed, vec!['A']);
        assert!(!lock.is_open('A'));
        assert_eq!(lock.closed_gate_tiles().count(), 1);
    }

    #[test]
    fn closed_tiles_cover_only_locked_groups() {
        let mut lock = SequenceLock::new(vec![
            ('A', vec![0], vec![(1, 1)]),
            ('B', vec![0], vec![(2, 2), (2, 3)]),
        ]);
        lock.press('A', 0, 0, 100);
        let tiles: Vec<Coord> = lock.closed_gate_tiles().collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.contains(&(2, 2)));
    }

    // ── MemoryTiles ──

    fn memory() -> MemoryTiles {
        let tiles = vec![(0, 0), (1, 0), (2, 0), (3, 0)];
        let mut rng = Pcg32::seed_from_u64(7);
        MemoryTiles::new(tiles, 3, 2, &mut rng)
    }

    fn skip_show_phase(m: &mut MemoryTiles) {
        while m.is_showing() {
            m.tick((9, 9));
        }
    }

    #[test]
    fn show_phase_walks_the_sequence_then_ends() {
        let mut m = memory();
        assert!(m.is_showing());
        skip_show_phase(&mut m);
        assert!(!m.is_showing());
        assert!(!m.is_complete());
    }

    #[test]
    fn replaying_the_sequence_solves_the_puzzle() {
        let mut m = memory();
        skip_show_phase(&mut m);
        let seq = m.sequence().to_vec();
        let mut last = MemoryOutcome::Idle;
        for &tile in &seq {
            m.tick((9, 9)); // step off so re-entry registers
            last = m.tick(tile);
        }
        assert_eq!(last, MemoryOutcome::Solved);
        assert!(m.is_complete());
    }

    #[test]
    fn wrong_tile_resets_progress_only() {
        let mut m = memory();
        skip_show_phase(&mut m);
        let seq = m.sequence().to_vec();
        let wrong = *m.tiles().iter().find(|&&t| t != seq[0]).unwrap();
        assert_eq!(m.tick(wrong), MemoryOutcome::Wrong);
        assert!(m.progress().is_empty());
        assert!(!m.is_complete());
    }

    #[test]
    fn standing_still_does_not_double_enter() {
        let mut m = memory();
        skip_show_phase(&mut m);
        let first = m.sequence()[0];
        m.tick(first);
        m.tick(first);
        m.tick(first);
        assert_eq!(m.progress().len(), 1);
    }
}
