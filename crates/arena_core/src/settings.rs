use std::time::Duration;

use serde::Deserialize;

use crate::player::AttackKind;

/// Which attack-resolution model the combat resolver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatMode {
    /// Typed attacks (punch/kick) with cooldowns and hit-point damage.
    Damage,
    /// Any attack instantly kills every player within overlap reach.
    Proximity,
}

/// All gameplay tunables. One instance is owned by the world for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub map_width: f64,
    pub map_height: f64,
    pub min_player_size: f64,
    pub max_player_size: f64,
    pub max_health: i32,
    pub combat_mode: CombatMode,
    pub attack_range: f64,
    pub kick_range_bonus: f64,
    pub punch_cooldown: Duration,
    pub kick_cooldown: Duration,
    pub punch_damage: i32,
    pub kick_damage: i32,
    pub punch_swing: Duration,
    pub kick_swing: Duration,
    /// Proximity mode: base kill reach before the size term.
    pub kill_distance: f64,
    pub kill_size_bonus: f64,
    pub kill_points: u32,
    pub kill_heal: i32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            map_width: 800.0,
            map_height: 600.0,
            min_player_size: 20.0,
            max_player_size: 80.0,
            max_health: 100,
            combat_mode: CombatMode::Damage,
            attack_range: 50.0,
            kick_range_bonus: 10.0,
            punch_cooldown: Duration::from_millis(500),
            kick_cooldown: Duration::from_millis(800),
            punch_damage: 25,
            kick_damage: 35,
            punch_swing: Duration::from_millis(300),
            kick_swing: Duration::from_millis(400),
            kill_distance: 30.0,
            kill_size_bonus: 8.0,
            kill_points: 10,
            kill_heal: 30,
        }
    }
}

impl GameSettings {
    /// Inset from every map edge for spawn and respawn placement. Half the
    /// maximum size keeps even a fully grown player inside the bounds.
    pub fn spawn_margin(&self) -> f64 {
        self.max_player_size / 2.0
    }

    pub fn cooldown(&self, kind: AttackKind) -> Duration {
        match kind {
            AttackKind::Punch => self.punch_cooldown,
            AttackKind::Kick => self.kick_cooldown,
        }
    }

    pub fn damage(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Punch => self.punch_damage,
            AttackKind::Kick => self.kick_damage,
        }
    }

    pub fn swing(&self, kind: AttackKind) -> Duration {
        match kind {
            AttackKind::Punch => self.punch_swing,
            AttackKind::Kick => self.kick_swing,
        }
    }

    pub fn range(&self, kind: AttackKind) -> f64 {
        match kind {
            AttackKind::Punch => self.attack_range,
            AttackKind::Kick => self.attack_range + self.kick_range_bonus,
        }
    }
}

/// Timing for the two periodic sweeps.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Full-state snapshot broadcasts per second.
    pub snapshot_hz: u32,
    /// Interval of the attack-timer decay sweep.
    pub decay_interval: Duration,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            snapshot_hz: 30,
            decay_interval: Duration::from_millis(16),
        }
    }
}

impl TickConfig {
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.snapshot_hz.max(1) as f64)
    }
}
