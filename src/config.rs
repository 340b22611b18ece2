/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub general: GeneralConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    /// Ticks between accepted player moves.
    pub player_move_cooldown: u32,
    pub patrol_step_cooldown: u32,
    pub patrol_wait_ticks: u32,
    pub chaser_step_cooldown: u32,
    pub drifter_step_cooldown: u32,
    /// How long an opened sequence gate stays open.
    pub sequence_open_ticks: u64,
    /// How long each memory tile is flashed.
    pub memory_show_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    /// Seeds the maze carve, key scatter, drifter spawns and memory
    /// sequence. The same seed always produces the same eight rooms.
    pub world_seed: u64,
    /// First room to load (0-based), for practicing a late room.
    pub start_room: usize,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_move")]
    player_move_cooldown: u32,
    #[serde(default = "default_patrol_step")]
    patrol_step_cooldown: u32,
    #[serde(default = "default_patrol_wait")]
    patrol_wait_ticks: u32,
    #[serde(default = "default_chaser_step")]
    chaser_step_cooldown: u32,
    #[serde(default = "default_drifter_step")]
    drifter_step_cooldown: u32,
    #[serde(default = "default_sequence_open")]
    sequence_open_ticks: u64,
    #[serde(default = "default_memory_show")]
    memory_show_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_world_seed")]
    world_seed: u64,
    #[serde(default)]
    start_room: usize,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 30 }
fn default_player_move() -> u32 { 4 }     // ~8 steps/sec at 30ms ticks
fn default_patrol_step() -> u32 { 5 }
fn default_patrol_wait() -> u32 { 5 }     // wait cycles at each waypoint
fn default_chaser_step() -> u32 { 12 }
fn default_drifter_step() -> u32 { 10 }
fn default_sequence_open() -> u64 { 500 } // ~15s before a gate re-locks
fn default_memory_show() -> u32 { 30 }
fn default_world_seed() -> u64 { 0x7E3B_1E5C }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_move_cooldown: default_player_move(),
            patrol_step_cooldown: default_patrol_step(),
            patrol_wait_ticks: default_patrol_wait(),
            chaser_step_cooldown: default_chaser_step(),
            drifter_step_cooldown: default_drifter_step(),
            sequence_open_ticks: default_sequence_open(),
            memory_show_ticks: default_memory_show(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            world_seed: default_world_seed(),
            start_room: 0,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms,
                player_move_cooldown: toml_cfg.speed.player_move_cooldown,
                patrol_step_cooldown: toml_cfg.speed.patrol_step_cooldown,
                patrol_wait_ticks: toml_cfg.speed.patrol_wait_ticks,
                chaser_step_cooldown: toml_cfg.speed.chaser_step_cooldown,
                drifter_step_cooldown: toml_cfg.speed.drifter_step_cooldown,
                sequence_open_ticks: toml_cfg.speed.sequence_open_ticks,
                memory_show_ticks: toml_cfg.speed.memory_show_ticks,
            },
            general: GeneralConfig {
                world_seed: toml_cfg.general.world_seed,
                start_room: toml_cfg.general.start_room,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let t = TomlConfig::default();
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: t.speed.tick_rate_ms,
                player_move_cooldown: t.speed.player_move_cooldown,
                patrol_step_cooldown: t.speed.patrol_step_cooldown,
                patrol_wait_ticks: t.speed.patrol_wait_ticks,
                chaser_step_cooldown: t.speed.chaser_step_cooldown,
                drifter_step_cooldown: t.speed.drifter_step_cooldown,
                sequence_open_ticks: t.speed.sequence_open_ticks,
                memory_show_ticks: t.speed.memory_show_ticks,
            },
            general: GeneralConfig {
                world_seed: t.general.world_seed,
                start_room: t.general.start_room,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_all_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 30);
        assert_eq!(cfg.speed.chaser_step_cooldown, 12);
        assert_eq!(cfg.general.start_room, 0);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg: TomlConfig = toml::from_str(
            "[speed]\ntick_rate_ms = 50\n[general]\nstart_room = 4\n",
        )
        .unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 50);
        assert_eq!(cfg.speed.player_move_cooldown, 4);
        assert_eq!(cfg.general.start_room, 4);
        assert_eq!(cfg.general.world_seed, default_world_seed());
    }
}
