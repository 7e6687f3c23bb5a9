use std::collections::HashMap;

use session::SessionId;

use crate::channels::{Outbound, OutboundRx, RegisterRx, SessionWriteTx, UnregisterRx};

/// Routes outbound frames to per-session write channels. Unicast frames go
/// to one writer; broadcast frames are fanned out to every registered
/// writer, optionally skipping one session. Writers whose channel has
/// closed are dropped on first failed send.
pub async fn run_output_router(
    mut outbound_rx: OutboundRx,
    mut register_rx: RegisterRx,
    mut unregister_rx: UnregisterRx,
) {
    let mut writers: HashMap<SessionId, SessionWriteTx> = HashMap::new();

    loop {
        tokio::select! {
            Some(reg) = register_rx.recv() => {
                tracing::debug!(session_id = ?reg.session_id, "Output router: session registered");
                writers.insert(reg.session_id, reg.write_tx);
            }
            Some(session_id) = unregister_rx.recv() => {
                tracing::debug!(session_id = ?session_id, "Output router: session unregistered");
                writers.remove(&session_id);
            }
            Some(outbound) = outbound_rx.recv() => {
                route(&mut writers, outbound);
            }
            else => break,
        }
    }

    tracing::info!("Output router shutting down");
}

fn route(writers: &mut HashMap<SessionId, SessionWriteTx>, outbound: Outbound) {
    match outbound {
        Outbound::Unicast { session_id, frame } => {
            if let Some(tx) = writers.get(&session_id) {
                if tx.send(frame).is_err() {
                    tracing::debug!(session_id = ?session_id, "Output router: session write channel closed");
                    writers.remove(&session_id);
                }
            }
        }
        Outbound::Broadcast { frame, exclude } => {
            let mut dead = Vec::new();
            for (session_id, tx) in writers.iter() {
                if exclude == Some(*session_id) {
                    continue;
                }
                if tx.send(frame.clone()).is_err() {
                    dead.push(*session_id);
                }
            }
            for session_id in dead {
                tracing::debug!(session_id = ?session_id, "Output router: session write channel closed");
                writers.remove(&session_id);
            }
        }
    }
}
