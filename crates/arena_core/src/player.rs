use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::settings::GameSettings;

/// Stable server-assigned player identity. Ids are monotonic per process
/// and never reused within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

/// Attack flavor in the damage combat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Punch,
    Kick,
}

/// Full server-side state for one joined player. Owned by the registry;
/// cooldown timestamps stay server-private.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub health: i32,
    pub max_health: i32,
    pub kills: u32,
    pub deaths: u32,
    pub points: u32,
    pub color: String,
    /// Horizontal facing, always -1 or 1.
    pub facing: i8,
    pub is_attacking: bool,
    pub attack_type: Option<AttackKind>,
    /// Remaining swing-animation time, counted down by the decay sweep.
    pub attack_timer: Duration,
    pub last_punch: Option<Instant>,
    pub last_kick: Option<Instant>,
}

impl Player {
    /// Fresh spawn state: minimum size, full health, zeroed counters.
    pub fn spawn(
        id: PlayerId,
        name: String,
        x: f64,
        y: f64,
        color: String,
        settings: &GameSettings,
    ) -> Self {
        Self {
            id,
            name,
            x,
            y,
            size: settings.min_player_size,
            health: settings.max_health,
            max_health: settings.max_health,
            kills: 0,
            deaths: 0,
            points: 0,
            color,
            facing: 1,
            is_attacking: false,
            attack_type: None,
            attack_timer: Duration::ZERO,
            last_punch: None,
            last_kick: None,
        }
    }

    pub fn distance_to(&self, other: &Player) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn last_attack(&self, kind: AttackKind) -> Option<Instant> {
        match kind {
            AttackKind::Punch => self.last_punch,
            AttackKind::Kick => self.last_kick,
        }
    }

    /// Stamp the cooldown clock for `kind` and start a swing.
    pub fn record_attack(&mut self, kind: AttackKind, now: Instant, swing: Duration) {
        match kind {
            AttackKind::Punch => self.last_punch = Some(now),
            AttackKind::Kick => self.last_kick = Some(now),
        }
        self.is_attacking = true;
        self.attack_type = Some(kind);
        self.attack_timer = swing;
    }
}
