use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::combat::{self, CombatEvent};
use crate::movement::{self, AppliedMove};
use crate::player::{AttackKind, Player, PlayerId};
use crate::registry::PlayerRegistry;
use crate::settings::GameSettings;

/// The authoritative simulation state: registry, tunables and the RNG used
/// for spawn placement. Owned by the single game task; every mutation runs
/// to completion before the next one starts.
pub struct ArenaWorld {
    pub settings: GameSettings,
    pub players: PlayerRegistry,
    rng: StdRng,
}

impl ArenaWorld {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Seeded construction for deterministic tests.
    pub fn with_rng(settings: GameSettings, rng: StdRng) -> Self {
        Self {
            settings,
            players: PlayerRegistry::new(),
            rng,
        }
    }

    pub fn join(&mut self, requested_name: Option<&str>) -> PlayerId {
        self.players.add(requested_name, &self.settings, &mut self.rng)
    }

    pub fn leave(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(id)
    }

    pub fn apply_move(
        &mut self,
        id: PlayerId,
        x: f64,
        y: f64,
        facing: Option<i8>,
    ) -> Option<AppliedMove> {
        let settings = &self.settings;
        self.players
            .get_mut(id)
            .map(|player| movement::apply_move(player, x, y, facing, settings))
    }

    pub fn resolve_attack(
        &mut self,
        attacker: PlayerId,
        kind: Option<AttackKind>,
        now: Instant,
    ) -> Vec<CombatEvent> {
        combat::resolve_attack(
            &mut self.players,
            attacker,
            kind,
            now,
            &self.settings,
            &mut self.rng,
        )
    }

    /// Update a display name, falling back to the default `Player N` when
    /// the new name is blank. Returns the (old, new) pair.
    pub fn rename(&mut self, id: PlayerId, new_name: &str) -> Option<(String, String)> {
        let player = self.players.get_mut(id)?;
        let old_name = player.name.clone();
        let trimmed = new_name.trim();
        player.name = if trimmed.is_empty() {
            format!("Player {}", id.0)
        } else {
            trimmed.to_string()
        };
        Some((old_name, player.name.clone()))
    }

    pub fn decay_attack_timers(&mut self, step: Duration) {
        combat::decay_attack_timers(&mut self.players, step);
    }
}
