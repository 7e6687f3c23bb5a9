use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use arena_core::{CombatMode, GameSettings, TickConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub ws_addr: String,
    pub max_connections: usize,
    pub static_dir: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            ws_addr: "0.0.0.0:3000".to_string(),
            max_connections: 1000,
            static_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameSection {
    pub map_width: f64,
    pub map_height: f64,
    pub min_player_size: f64,
    pub max_player_size: f64,
    pub max_health: i32,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            map_width: 800.0,
            map_height: 600.0,
            min_player_size: 20.0,
            max_player_size: 80.0,
            max_health: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatSection {
    pub mode: CombatMode,
    pub attack_range: f64,
    pub kick_range_bonus: f64,
    pub punch_cooldown_ms: u64,
    pub kick_cooldown_ms: u64,
    pub punch_damage: i32,
    pub kick_damage: i32,
    pub punch_swing_ms: u64,
    pub kick_swing_ms: u64,
    pub kill_distance: f64,
    pub kill_size_bonus: f64,
    pub kill_points: u32,
    pub kill_heal: i32,
}

impl Default for CombatSection {
    fn default() -> Self {
        Self {
            mode: CombatMode::Damage,
            attack_range: 50.0,
            kick_range_bonus: 10.0,
            punch_cooldown_ms: 500,
            kick_cooldown_ms: 800,
            punch_damage: 25,
            kick_damage: 35,
            punch_swing_ms: 300,
            kick_swing_ms: 400,
            kill_distance: 30.0,
            kill_size_bonus: 8.0,
            kill_points: 10,
            kill_heal: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickSection {
    pub snapshot_hz: u32,
    pub decay_interval_ms: u64,
}

impl Default for TickSection {
    fn default() -> Self {
        Self {
            snapshot_hz: 30,
            decay_interval_ms: 16,
        }
    }
}

/// Top-level arena server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub net: NetConfig,
    pub game: GameSection,
    pub combat: CombatSection,
    pub tick: TickSection,
}

impl ServerConfig {
    /// Load configuration from an optional TOML file path. A missing file
    /// falls back to defaults; an unreadable or malformed file is an error.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) if Path::new(path).exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            _ => Self::default(),
        };
        Ok(config)
    }

    /// Replace the port of `net.ws_addr`, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.net.ws_addr.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.net.ws_addr.clone(),
        };
        self.net.ws_addr = format!("{}:{}", host, port);
    }

    /// Convert the game and combat sections to arena_core's GameSettings.
    pub fn to_game_settings(&self) -> GameSettings {
        GameSettings {
            map_width: self.game.map_width,
            map_height: self.game.map_height,
            min_player_size: self.game.min_player_size,
            max_player_size: self.game.max_player_size,
            max_health: self.game.max_health,
            combat_mode: self.combat.mode,
            attack_range: self.combat.attack_range,
            kick_range_bonus: self.combat.kick_range_bonus,
            punch_cooldown: Duration::from_millis(self.combat.punch_cooldown_ms),
            kick_cooldown: Duration::from_millis(self.combat.kick_cooldown_ms),
            punch_damage: self.combat.punch_damage,
            kick_damage: self.combat.kick_damage,
            punch_swing: Duration::from_millis(self.combat.punch_swing_ms),
            kick_swing: Duration::from_millis(self.combat.kick_swing_ms),
            kill_distance: self.combat.kill_distance,
            kill_size_bonus: self.combat.kill_size_bonus,
            kill_points: self.combat.kill_points,
            kill_heal: self.combat.kill_heal,
        }
    }

    /// Convert the tick section to arena_core's TickConfig.
    pub fn to_tick_config(&self) -> TickConfig {
        TickConfig {
            snapshot_hz: self.tick.snapshot_hz,
            decay_interval: Duration::from_millis(self.tick.decay_interval_ms.max(1)),
        }
    }
}

/// Parse CLI arguments and load config.
/// Supports: --config <path>, --port <port>
pub fn parse_cli_args() -> ServerConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<&str> = None;
    let mut port_override: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if let Some(val) = args.get(i + 1) {
                    config_path = Some(val.as_str());
                    i += 2;
                } else {
                    eprintln!("--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--port" => {
                match args.get(i + 1).and_then(|v| v.parse::<u16>().ok()) {
                    Some(port) => {
                        port_override = Some(port);
                        i += 2;
                    }
                    None => {
                        eprintln!("--port requires a port number");
                        std::process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    let mut config = match ServerConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = port_override {
        config.set_port(port);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_matches_hardcoded_values() {
        let config = ServerConfig::default();
        assert_eq!(config.net.ws_addr, "0.0.0.0:3000");
        assert_eq!(config.net.max_connections, 1000);
        assert_eq!(config.net.static_dir, "public");
        assert_eq!(config.game.map_width, 800.0);
        assert_eq!(config.game.map_height, 600.0);
        assert_eq!(config.combat.mode, CombatMode::Damage);
        assert_eq!(config.combat.punch_cooldown_ms, 500);
        assert_eq!(config.combat.kick_damage, 35);
        assert_eq!(config.tick.snapshot_hz, 30);
        assert_eq!(config.tick.decay_interval_ms, 16);
    }

    #[test]
    fn to_game_settings_converts_durations() {
        let config = ServerConfig::default();
        let settings = config.to_game_settings();
        assert_eq!(settings.punch_cooldown, Duration::from_millis(500));
        assert_eq!(settings.kick_cooldown, Duration::from_millis(800));
        assert_eq!(settings.punch_swing, Duration::from_millis(300));
        assert_eq!(settings.kill_heal, 30);
        assert_eq!(settings.spawn_margin(), 40.0);
    }

    #[test]
    fn to_tick_config_guards_zero_interval() {
        let mut config = ServerConfig::default();
        config.tick.decay_interval_ms = 0;
        let tick = config.to_tick_config();
        assert_eq!(tick.decay_interval, Duration::from_millis(1));
        assert_eq!(tick.snapshot_hz, 30);
    }

    #[test]
    fn set_port_keeps_host() {
        let mut config = ServerConfig::default();
        config.set_port(8080);
        assert_eq!(config.net.ws_addr, "0.0.0.0:8080");

        config.net.ws_addr = "127.0.0.1:3000".to_string();
        config.set_port(4000);
        assert_eq!(config.net.ws_addr, "127.0.0.1:4000");
    }

    #[test]
    fn load_nonexistent_file_returns_defaults() {
        let config = ServerConfig::load(Some("/tmp/nonexistent_arena_config_12345.toml")).unwrap();
        assert_eq!(config.tick.snapshot_hz, 30);
    }

    #[test]
    fn load_none_returns_defaults() {
        let config = ServerConfig::load(None).unwrap();
        assert_eq!(config.game.max_health, 100);
    }

    #[test]
    fn load_partial_toml() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"
[net]
ws_addr = "127.0.0.1:9000"

[combat]
mode = "proximity"
kill_distance = 45.0

[tick]
snapshot_hz = 10
"#
        )
        .unwrap();

        let config = ServerConfig::load(Some(f.path().to_str().unwrap())).unwrap();
        assert_eq!(config.net.ws_addr, "127.0.0.1:9000");
        assert_eq!(config.combat.mode, CombatMode::Proximity);
        assert_eq!(config.combat.kill_distance, 45.0);
        assert_eq!(config.combat.punch_damage, 25);
        assert_eq!(config.tick.snapshot_hz, 10);
        assert_eq!(config.game.map_width, 800.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[net\nws_addr = ").unwrap();
        let err = ServerConfig::load(Some(f.path().to_str().unwrap()));
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }
}
