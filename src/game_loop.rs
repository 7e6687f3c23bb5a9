use std::time::Instant;

use arena_core::{ArenaWorld, AttackKind, CombatEvent, PlayerId, TickConfig};
use net::channels::{GatewayEvent, GatewayRx, Outbound, OutboundTx};
use net::protocol::{
    ClientMessage, KillerWire, PlayerStateWire, PlayerWire, ServerMessage, VictimWire,
};
use observability::SnapshotMetrics;
use session::{SessionId, SessionManager};

use crate::shutdown::ShutdownRx;

/// Run the game task. Owns the world and the session map outright: every
/// gateway event and timer tick mutates state to completion before the next
/// one is taken, so no handler ever observes a half-applied attack.
///
/// Two timers drive the periodic work: the attack-timer decay sweep and the
/// full-state snapshot broadcast.
pub async fn run_game_loop(
    mut world: ArenaWorld,
    tick: TickConfig,
    mut gateway_rx: GatewayRx,
    outbound_tx: OutboundTx,
    mut shutdown_rx: ShutdownRx,
) {
    let mut sessions = SessionManager::new();
    let mut decay = tokio::time::interval(tick.decay_interval);
    let mut snapshot = tokio::time::interval(tick.snapshot_interval());
    let mut tick_number: u64 = 0;

    tracing::info!(
        snapshot_hz = tick.snapshot_hz,
        decay_interval_ms = tick.decay_interval.as_millis() as u64,
        "Game loop running"
    );

    loop {
        tokio::select! {
            event = gateway_rx.recv() => match event {
                Some(event) => {
                    handle_gateway_event(&mut world, &mut sessions, &outbound_tx, event);
                }
                None => {
                    tracing::info!("Game loop: gateway channel closed");
                    break;
                }
            },
            _ = decay.tick() => {
                // Fixed step per firing, same cadence the swing lengths assume.
                world.decay_attack_timers(tick.decay_interval);
            }
            _ = snapshot.tick() => {
                tick_number += 1;
                broadcast_snapshot(&world, &outbound_tx, tick_number);
            }
            _ = shutdown_rx.wait() => {
                tracing::info!(
                    sessions = sessions.active_count(),
                    players = world.players.len(),
                    "Game loop: shutdown signal received"
                );
                break;
            }
        }
    }

    tracing::info!("Game loop stopped");
}

fn handle_gateway_event(
    world: &mut ArenaWorld,
    sessions: &mut SessionManager,
    outbound_tx: &OutboundTx,
    event: GatewayEvent,
) {
    match event {
        GatewayEvent::Connected { session_id } => {
            sessions.create_session_with_id(session_id);
            tracing::info!(?session_id, "Session connected (awaiting join)");
        }
        GatewayEvent::Inbound {
            session_id,
            message,
        } => {
            handle_message(world, sessions, outbound_tx, session_id, message);
        }
        GatewayEvent::Disconnected { session_id } => {
            handle_disconnected(world, sessions, outbound_tx, session_id);
        }
    }
}

fn handle_message(
    world: &mut ArenaWorld,
    sessions: &mut SessionManager,
    outbound_tx: &OutboundTx,
    session_id: SessionId,
    message: ClientMessage,
) {
    match (sessions.player_for_session(session_id), message) {
        (None, ClientMessage::Join { name }) => {
            handle_join(world, sessions, outbound_tx, session_id, name.as_deref());
        }
        (None, other) => {
            tracing::debug!(?session_id, message = ?other, "Ignoring message before join");
        }
        (Some(_), ClientMessage::Join { .. }) => {
            tracing::debug!(?session_id, "Duplicate join ignored");
        }
        (Some(player_id), ClientMessage::Move { x, y, facing }) => {
            handle_move(world, outbound_tx, session_id, player_id, x, y, facing);
        }
        (Some(player_id), ClientMessage::Attack { attack_type, .. }) => {
            handle_attack(world, outbound_tx, player_id, attack_type);
        }
        (Some(player_id), ClientMessage::Rename { new_name }) => {
            handle_rename(world, outbound_tx, player_id, &new_name);
        }
    }
}

fn handle_join(
    world: &mut ArenaWorld,
    sessions: &mut SessionManager,
    outbound_tx: &OutboundTx,
    session_id: SessionId,
    name: Option<&str>,
) {
    let player_id = world.join(name);
    sessions.bind_player(session_id, player_id);

    // Private init with the full roster, then announce to everyone else.
    let players: Vec<PlayerWire> = world.players.iter().map(PlayerWire::from).collect();
    send_to(
        outbound_tx,
        session_id,
        &ServerMessage::Init { player_id, players },
    );

    if let Some(player) = world.players.get(player_id) {
        tracing::info!(?session_id, ?player_id, name = %player.name, "Player joined");
        broadcast(
            outbound_tx,
            &ServerMessage::PlayerJoined(PlayerWire::from(player)),
            Some(session_id),
        );
    }
}

fn handle_move(
    world: &mut ArenaWorld,
    outbound_tx: &OutboundTx,
    session_id: SessionId,
    player_id: PlayerId,
    x: f64,
    y: f64,
    facing: Option<i8>,
) {
    if let Some(applied) = world.apply_move(player_id, x, y, facing) {
        // The mover already rendered this move locally.
        broadcast(
            outbound_tx,
            &ServerMessage::PlayerMoved {
                id: player_id,
                x: applied.x,
                y: applied.y,
                facing: applied.facing,
            },
            Some(session_id),
        );
    }
}

fn handle_attack(
    world: &mut ArenaWorld,
    outbound_tx: &OutboundTx,
    player_id: PlayerId,
    kind: Option<AttackKind>,
) {
    let events = world.resolve_attack(player_id, kind, Instant::now());
    for event in &events {
        match event {
            CombatEvent::Damaged {
                target,
                health,
                max_health,
            } => {
                broadcast(
                    outbound_tx,
                    &ServerMessage::PlayerDamaged {
                        id: *target,
                        health: *health,
                        max_health: *max_health,
                    },
                    None,
                );
            }
            CombatEvent::Killed { killer, victim } => {
                tracing::info!(
                    killer = %killer.name,
                    victim = %victim.name,
                    kills = killer.kills,
                    "Player killed"
                );
                broadcast(
                    outbound_tx,
                    &ServerMessage::PlayerKilled {
                        killer: KillerWire::from(killer),
                        victim: VictimWire::from(victim),
                    },
                    None,
                );
            }
            CombatEvent::Swing {
                attacker,
                kind,
                x,
                y,
            } => {
                broadcast(
                    outbound_tx,
                    &ServerMessage::PlayerAttacked {
                        id: *attacker,
                        attack_type: *kind,
                        x: *x,
                        y: *y,
                    },
                    None,
                );
            }
        }
    }
}

fn handle_rename(
    world: &mut ArenaWorld,
    outbound_tx: &OutboundTx,
    player_id: PlayerId,
    new_name: &str,
) {
    if let Some((old_name, new_name)) = world.rename(player_id, new_name) {
        broadcast(
            outbound_tx,
            &ServerMessage::PlayerRenamed {
                id: player_id,
                old_name,
                new_name,
            },
            None,
        );
    }
}

fn handle_disconnected(
    world: &mut ArenaWorld,
    sessions: &mut SessionManager,
    outbound_tx: &OutboundTx,
    session_id: SessionId,
) {
    let player_id = sessions.remove_session(session_id);
    match player_id.and_then(|id| world.leave(id).map(|p| (id, p))) {
        Some((player_id, player)) => {
            tracing::info!(?session_id, ?player_id, name = %player.name, "Player left");
            broadcast(outbound_tx, &ServerMessage::PlayerLeft { id: player_id }, None);
        }
        None => {
            tracing::debug!(?session_id, "Session closed before joining");
        }
    }
}

/// Serialize the full arena state once and fan it out. Skips entirely when
/// the arena is empty.
fn broadcast_snapshot(world: &ArenaWorld, outbound_tx: &OutboundTx, tick_number: u64) {
    if world.players.is_empty() {
        return;
    }
    let started = Instant::now();

    let players: Vec<PlayerStateWire> = world.players.iter().map(PlayerStateWire::from).collect();
    let player_count = players.len();
    let frame = serde_json::to_string(&ServerMessage::GameUpdate { players }).unwrap();
    let snapshot_bytes = frame.len();

    let _ = outbound_tx.send(Outbound::Broadcast {
        frame,
        exclude: None,
    });

    SnapshotMetrics {
        tick_number,
        duration_us: started.elapsed().as_micros(),
        player_count,
        snapshot_bytes,
    }
    .log();
}

fn send_to(outbound_tx: &OutboundTx, session_id: SessionId, msg: &ServerMessage) {
    let _ = outbound_tx.send(Outbound::Unicast {
        session_id,
        frame: serde_json::to_string(msg).unwrap(),
    });
}

fn broadcast(outbound_tx: &OutboundTx, msg: &ServerMessage, exclude: Option<SessionId>) {
    let _ = outbound_tx.send(Outbound::Broadcast {
        frame: serde_json::to_string(msg).unwrap(),
        exclude,
    });
}
