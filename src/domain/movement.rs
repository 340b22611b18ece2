/// Movement resolution — pure functions that decide legality without
/// applying it. The step function owns the actual state change.
///
/// Two disciplines coexist across rooms:
///
///   - **Continuous** — a held direction is sampled whenever the move
///     timer is at 0; one single-cell step against the obstacle view;
///     no push semantics.
///   - **Discrete push** — edge-triggered input; the destination may
///     hold one boulder, which moves only if the cell beyond it is free
///     of walls, hazards, other boulders, and mirrors.
///
/// Shared invariant: a move either fully succeeds (player, and possibly
/// one boulder, each advance exactly one cell) or fully fails with no
/// state change at all.

use super::entity::{Boulder, Mirror, MoveDir};
use super::grid::Coord;
use super::obstacle::ObstacleSet;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// The player advances to this cell.
    Moved(Coord),
    /// The player advances to `player`, the boulder at `player` moves
    /// on to `boulder_to`.
    Pushed { player: Coord, boulder_to: Coord },
    Blocked,
}

/// Continuous-mode step: destination must be clear of the obstacle view.
pub fn resolve_step(from: Coord, dir: MoveDir, obstacles: &ObstacleSet) -> MoveOutcome {
    let (dx, dy) = dir.delta();
    let target = (from.0 + dx, from.1 + dy);
    if obstacles.contains(target) {
        MoveOutcome::Blocked
    } else {
        MoveOutcome::Moved(target)
    }
}

/// Push-mode step: resolves a push chain of length 1, atomically.
pub fn resolve_push(
    from: Coord,
    dir: MoveDir,
    obstacles: &ObstacleSet,
    boulders: &[Boulder],
    mirrors: &[Mirror],
) -> MoveOutcome {
    let (dx, dy) = dir.delta();
    let target = (from.0 + dx, from.1 + dy);

    let mirror_at = |pos: Coord| mirrors.iter().any(|m| m.pos == pos);
    let boulder_at = |pos: Coord| boulders.iter().any(|b| b.pos == pos);

    // Hard obstacles and mirrors block the player outright.
    if obstacles.contains(target) || mirror_at(target) {
        return MoveOutcome::Blocked;
    }

    if boulder_at(target) {
        let beyond = (target.0 + dx, target.1 + dy);
        // Chains of length > 1 are not supported: anything solid behind
        // the boulder rejects the whole move.
        if obstacles.contains(beyond) || boulder_at(beyond) || mirror_at(beyond) {
            return MoveOutcome::Blocked;
        }
        return MoveOutcome::Pushed { player: target, boulder_to: beyond };
    }

    MoveOutcome::Moved(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MirrorKind;
    use crate::domain::grid::GridMap;
    use crate::domain::obstacle;
    use std::collections::HashSet;

    fn view(walls: &[Coord]) -> ObstacleSet {
        let grid = GridMap::new(10, 10, walls.iter().copied().collect::<HashSet<_>>());
        obstacle::compose(&grid, &[], &[], [], [])
    }

    #[test]
    fn step_into_open_cell() {
        let obstacles = view(&[]);
        assert_eq!(
            resolve_step((4, 5), MoveDir::Right, &obstacles),
            MoveOutcome::Moved((5, 5))
        );
    }

    #[test]
    fn step_into_wall_is_blocked() {
        let obstacles = view(&[(5, 5)]);
        assert_eq!(resolve_step((4, 5), MoveDir::Right, &obstacles), MoveOutcome::Blocked);
    }

    #[test]
    fn step_off_the_map_is_blocked() {
        let obstacles = view(&[]);
        assert_eq!(resolve_step((0, 0), MoveDir::Left, &obstacles), MoveOutcome::Blocked);
        assert_eq!(resolve_step((0, 0), MoveDir::Up, &obstacles), MoveOutcome::Blocked);
    }

    #[test]
    fn push_moves_player_and_boulder_together() {
        let obstacles = view(&[]);
        let boulders = vec![Boulder::new((5, 5))];
        assert_eq!(
            resolve_push((4, 5), MoveDir::Right, &obstacles, &boulders, &[]),
            MoveOutcome::Pushed { player: (5, 5), boulder_to: (6, 5) }
        );
    }

    #[test]
    fn push_against_wall_moves_neither() {
        let obstacles = view(&[(6, 5)]);
        let boulders = vec![Boulder::new((5, 5))];
        assert_eq!(
            resolve_push((4, 5), MoveDir::Right, &obstacles, &boulders, &[]),
            MoveOutcome::Blocked
        );
    }

    #[test]
    fn push_against_second_boulder_is_rejected() {
        let obstacles = view(&[]);
        let boulders = vec![Boulder::new((5, 5)), Boulder::new((6, 5))];
        assert_eq!(
            resolve_push((4, 5), MoveDir::Right, &obstacles, &boulders, &[]),
            MoveOutcome::Blocked
        );
    }

    #[test]
    fn push_against_mirror_is_rejected() {
        let obstacles = view(&[]);
        let boulders = vec![Boulder::new((5, 5))];
        let mirrors = vec![Mirror::new((6, 5), MirrorKind::Slash)];
        assert_eq!(
            resolve_push((4, 5), MoveDir::Right, &obstacles, &boulders, &mirrors),
            MoveOutcome::Blocked
        );
    }

    #[test]
    fn mirror_blocks_the_player_in_push_rooms() {
        let obstacles = view(&[]);
        let mirrors = vec![Mirror::new((5, 5), MirrorKind::Backslash)];
        assert_eq!(
            resolve_push((4, 5), MoveDir::Right, &obstacles, &[], &mirrors),
            MoveOutcome::Blocked
        );
    }
}
