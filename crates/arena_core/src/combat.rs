use std::time::{Duration, Instant};

use rand::Rng;

use crate::movement::clamp_to_bounds;
use crate::player::{AttackKind, PlayerId};
use crate::registry::{spawn_position, PlayerRegistry};
use crate::settings::{CombatMode, GameSettings};

/// Killer fields captured immediately after one kill transition. A
/// multi-kill swing reports per-kill state, not the final aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct KillerSummary {
    pub id: PlayerId,
    pub name: String,
    pub size: f64,
    pub points: u32,
    pub kills: u32,
    pub health: i32,
}

/// Victim fields captured immediately after the respawn reset.
#[derive(Debug, Clone, PartialEq)]
pub struct VictimSummary {
    pub id: PlayerId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub health: i32,
    pub deaths: u32,
}

/// What one attack did, in wire-broadcast order: per-target damage/kill
/// events first, the attacker's swing last.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    Damaged {
        target: PlayerId,
        health: i32,
        max_health: i32,
    },
    Killed {
        killer: KillerSummary,
        victim: VictimSummary,
    },
    Swing {
        attacker: PlayerId,
        kind: Option<AttackKind>,
        x: f64,
        y: f64,
    },
}

/// Resolve one attack request against current state. Returns no events when
/// the attacker is unknown or still on cooldown (a silent no-op, never an
/// error). Every hit is resolved sequentially in ascending target-id order.
pub fn resolve_attack(
    registry: &mut PlayerRegistry,
    attacker_id: PlayerId,
    requested: Option<AttackKind>,
    now: Instant,
    settings: &GameSettings,
    rng: &mut impl Rng,
) -> Vec<CombatEvent> {
    match settings.combat_mode {
        CombatMode::Damage => resolve_damage_attack(registry, attacker_id, requested, now, settings, rng),
        CombatMode::Proximity => resolve_proximity_attack(registry, attacker_id, settings, rng),
    }
}

fn resolve_damage_attack(
    registry: &mut PlayerRegistry,
    attacker_id: PlayerId,
    requested: Option<AttackKind>,
    now: Instant,
    settings: &GameSettings,
    rng: &mut impl Rng,
) -> Vec<CombatEvent> {
    let kind = requested.unwrap_or(AttackKind::Punch);

    let (ax, ay) = {
        let attacker = match registry.get_mut(attacker_id) {
            Some(p) => p,
            None => return Vec::new(),
        };
        if let Some(last) = attacker.last_attack(kind) {
            if now.duration_since(last) < settings.cooldown(kind) {
                return Vec::new();
            }
        }
        attacker.record_attack(kind, now, settings.swing(kind));
        (attacker.x, attacker.y)
    };

    let range = settings.range(kind);
    let damage = settings.damage(kind);

    // Targets are selected against positions at swing time; kills during the
    // loop cannot pull a respawned player back into this swing.
    let targets: Vec<PlayerId> = match registry.get(attacker_id) {
        Some(attacker) => registry
            .iter()
            .filter(|p| p.id != attacker_id)
            .filter(|p| attacker.distance_to(p) < range)
            .map(|p| p.id)
            .collect(),
        None => Vec::new(),
    };

    let mut events = Vec::new();
    for target_id in targets {
        let lethal = match registry.get_mut(target_id) {
            Some(target) => {
                target.health -= damage;
                target.health <= 0
            }
            None => continue,
        };

        if lethal {
            if let Some(event) = kill_transition(registry, attacker_id, target_id, settings, rng) {
                events.push(event);
            }
        } else if let Some(target) = registry.get(target_id) {
            events.push(CombatEvent::Damaged {
                target: target_id,
                health: target.health,
                max_health: target.max_health,
            });
        }
    }

    events.push(CombatEvent::Swing {
        attacker: attacker_id,
        kind: Some(kind),
        x: ax,
        y: ay,
    });
    events
}

fn resolve_proximity_attack(
    registry: &mut PlayerRegistry,
    attacker_id: PlayerId,
    settings: &GameSettings,
    rng: &mut impl Rng,
) -> Vec<CombatEvent> {
    let (ax, ay) = {
        let attacker = match registry.get_mut(attacker_id) {
            Some(p) => p,
            None => return Vec::new(),
        };
        attacker.is_attacking = true;
        attacker.attack_type = None;
        attacker.attack_timer = settings.punch_swing;
        (attacker.x, attacker.y)
    };

    // Kill reach scales with both bodies: two big players touch sooner.
    let targets: Vec<PlayerId> = match registry.get(attacker_id) {
        Some(attacker) => registry
            .iter()
            .filter(|p| p.id != attacker_id)
            .filter(|p| {
                attacker.distance_to(p)
                    < settings.kill_distance + (attacker.size + p.size) / 2.0
            })
            .map(|p| p.id)
            .collect(),
        None => Vec::new(),
    };

    let mut events = Vec::new();
    for target_id in targets {
        if let Some(event) = kill_transition(registry, attacker_id, target_id, settings, rng) {
            events.push(event);
        }
    }

    events.push(CombatEvent::Swing {
        attacker: attacker_id,
        kind: None,
        x: ax,
        y: ay,
    });
    events
}

/// Apply the kill transition to victim then killer and capture both
/// post-transition snapshots. The victim respawns with the same distribution
/// as a fresh spawn; the killer's growth is re-clamped against the map so
/// the position invariant survives a kill at a wall.
fn kill_transition(
    registry: &mut PlayerRegistry,
    killer_id: PlayerId,
    victim_id: PlayerId,
    settings: &GameSettings,
    rng: &mut impl Rng,
) -> Option<CombatEvent> {
    let (spawn_x, spawn_y) = spawn_position(settings, rng);

    let victim = {
        let victim = registry.get_mut(victim_id)?;
        victim.size = settings.min_player_size;
        victim.health = victim.max_health;
        victim.deaths += 1;
        victim.x = spawn_x;
        victim.y = spawn_y;
        VictimSummary {
            id: victim.id,
            name: victim.name.clone(),
            x: victim.x,
            y: victim.y,
            size: victim.size,
            health: victim.health,
            deaths: victim.deaths,
        }
    };

    let killer = {
        let killer = registry.get_mut(killer_id)?;
        killer.size = (killer.size + settings.kill_size_bonus).min(settings.max_player_size);
        killer.points += settings.kill_points;
        killer.kills += 1;
        killer.health = (killer.health + settings.kill_heal).min(killer.max_health);
        clamp_to_bounds(killer, settings);
        KillerSummary {
            id: killer.id,
            name: killer.name.clone(),
            size: killer.size,
            points: killer.points,
            kills: killer.kills,
            health: killer.health,
        }
    };

    Some(CombatEvent::Killed { killer, victim })
}

/// Count down swing timers; a timer reaching zero clears the attack flags.
/// Runs on the short decay interval, touching only attacking players.
pub fn decay_attack_timers(registry: &mut PlayerRegistry, step: Duration) {
    for player in registry.iter_mut() {
        if !player.is_attacking {
            continue;
        }
        player.attack_timer = player.attack_timer.saturating_sub(step);
        if player.attack_timer.is_zero() {
            player.is_attacking = false;
            player.attack_type = None;
        }
    }
}
