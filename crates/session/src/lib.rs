use std::collections::BTreeMap;

use arena_core::PlayerId;

/// Identity of one live connection, assigned by the network layer before
/// any game identity exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// One connection's gateway-side record. `player` is `None` until a join
/// message binds a game identity; the connection itself never stores game
/// state.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    pub session_id: SessionId,
    pub player: Option<PlayerId>,
}

impl PlayerSession {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            player: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_some()
    }
}

/// Tracks live sessions and the bidirectional session↔player mapping.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: BTreeMap<SessionId, PlayerSession>,
    player_to_session: BTreeMap<PlayerId, SessionId>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under the id the network layer assigned.
    pub fn create_session_with_id(&mut self, id: SessionId) {
        self.sessions.insert(id, PlayerSession::new(id));
    }

    pub fn get_session(&self, id: SessionId) -> Option<&PlayerSession> {
        self.sessions.get(&id)
    }

    /// Bind a player to a session (on join).
    pub fn bind_player(&mut self, session_id: SessionId, player: PlayerId) {
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.player = Some(player);
            self.player_to_session.insert(player, session_id);
        }
    }

    pub fn player_for_session(&self, session_id: SessionId) -> Option<PlayerId> {
        self.sessions.get(&session_id).and_then(|s| s.player)
    }

    pub fn session_for_player(&self, player: PlayerId) -> Option<SessionId> {
        self.player_to_session.get(&player).copied()
    }

    /// Remove a session and return the player that was bound to it, if any.
    /// Removing an unknown session is a no-op.
    pub fn remove_session(&mut self, session_id: SessionId) -> Option<PlayerId> {
        let session = self.sessions.remove(&session_id)?;
        if let Some(player) = session.player {
            self.player_to_session.remove(&player);
        }
        session.player
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
