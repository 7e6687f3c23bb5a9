use std::collections::BTreeMap;

use rand::Rng;

use crate::player::{Player, PlayerId};
use crate::settings::GameSettings;

/// Spawn palette; every player gets one of these at creation.
pub const SPAWN_COLORS: [&str; 7] = [
    "#ff6b35", "#4ecdc4", "#45b7d1", "#96ceb4", "#feca57", "#ff9ff3", "#54a0ff",
];

/// Uniform position inside the map rectangle inset by the spawn margin.
pub fn spawn_position(settings: &GameSettings, rng: &mut impl Rng) -> (f64, f64) {
    let margin = settings.spawn_margin();
    let x = rng.gen_range(margin..=settings.map_width - margin);
    let y = rng.gen_range(margin..=settings.map_height - margin);
    (x, y)
}

/// Owns every live player. Keyed by id in a BTreeMap so iteration order is
/// ascending-id and therefore deterministic.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
    next_id: u64,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Create a player at a random spawn point and return its id. A missing
    /// or blank requested name falls back to `Player N`, where N is the same
    /// counter that produced the id.
    pub fn add(
        &mut self,
        requested_name: Option<&str>,
        settings: &GameSettings,
        rng: &mut impl Rng,
    ) -> PlayerId {
        self.next_id += 1;
        let id = PlayerId(self.next_id);

        let name = match requested_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Player {}", self.next_id),
        };
        let (x, y) = spawn_position(settings, rng);
        let color = SPAWN_COLORS[rng.gen_range(0..SPAWN_COLORS.len())].to_string();

        self.players
            .insert(id, Player::spawn(id, name, x, y, color, settings));
        id
    }

    /// Remove a player. Removing an absent id is a no-op returning `None`.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Players in ascending-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
