use arena_core::{AttackKind, KillerSummary, Player, PlayerId, VictimSummary};
use serde::{Deserialize, Serialize};

/// Client → server frames, wire shape `{"type": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter the arena. A missing or blank name gets a generated default.
    Join {
        #[serde(default)]
        name: Option<String>,
    },
    /// Absolute-position move request.
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        facing: Option<i8>,
    },
    /// Attack at the player's current position. The client's coordinates
    /// are accepted for wire compatibility but the server's own position
    /// for the attacker is authoritative.
    #[serde(rename_all = "camelCase")]
    Attack {
        #[serde(default)]
        attack_type: Option<AttackKind>,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Rename { new_name: String },
}

/// Server → client frames, same `{type, data}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Private reply to a join: the new player's id plus the full roster
    /// (including the joiner).
    #[serde(rename_all = "camelCase")]
    Init {
        player_id: PlayerId,
        players: Vec<PlayerWire>,
    },
    PlayerJoined(PlayerWire),
    PlayerLeft {
        id: PlayerId,
    },
    PlayerMoved {
        id: PlayerId,
        x: f64,
        y: f64,
        facing: i8,
    },
    /// Swing announcement carrying the attacker's authoritative position.
    #[serde(rename_all = "camelCase")]
    PlayerAttacked {
        id: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attack_type: Option<AttackKind>,
        x: f64,
        y: f64,
    },
    #[serde(rename_all = "camelCase")]
    PlayerDamaged {
        id: PlayerId,
        health: i32,
        max_health: i32,
    },
    PlayerKilled {
        killer: KillerWire,
        victim: VictimWire,
    },
    #[serde(rename_all = "camelCase")]
    PlayerRenamed {
        id: PlayerId,
        old_name: String,
        new_name: String,
    },
    GameUpdate {
        players: Vec<PlayerStateWire>,
    },
}

/// Full public roster entry, used by `init` and `playerJoined`. Cooldown
/// timestamps stay server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWire {
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
    pub facing: i8,
    pub is_attacking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<AttackKind>,
}

impl From<&Player> for PlayerWire {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            size: p.size,
            health: p.health,
            max_health: p.max_health,
            kills: p.kills,
            deaths: p.deaths,
            points: p.points,
            color: p.color.clone(),
            facing: p.facing,
            is_attacking: p.is_attacking,
            attack_type: p.attack_type,
        }
    }
}

/// Per-tick `gameUpdate` entry: the public fields that change every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateWire {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub health: i32,
    pub kills: u32,
    pub deaths: u32,
    pub points: u32,
    pub facing: i8,
    pub is_attacking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<AttackKind>,
}

impl From<&Player> for PlayerStateWire {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            size: p.size,
            health: p.health,
            kills: p.kills,
            deaths: p.deaths,
            points: p.points,
            facing: p.facing,
            is_attacking: p.is_attacking,
            attack_type: p.attack_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillerWire {
    pub id: PlayerId,
    pub name: String,
    pub size: f64,
    pub points: u32,
    pub kills: u32,
    pub health: i32,
}

impl From<&KillerSummary> for KillerWire {
    fn from(k: &KillerSummary) -> Self {
        Self {
            id: k.id,
            name: k.name.clone(),
            size: k.size,
            points: k.points,
            kills: k.kills,
            health: k.health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimWire {
    pub id: PlayerId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub health: i32,
    pub deaths: u32,
}

impl From<&VictimSummary> for VictimWire {
    fn from(v: &VictimSummary) -> Self {
        Self {
            id: v.id,
            name: v.name.clone(),
            x: v.x,
            y: v.y,
            size: v.size,
            health: v.health,
            deaths: v.deaths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::GameSettings;

    fn sample_player() -> Player {
        Player::spawn(
            PlayerId(3),
            "alice".to_string(),
            120.5,
            240.0,
            "#feca57".to_string(),
            &GameSettings::default(),
        )
    }

    #[test]
    fn deserialize_join_with_name() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join","data":{"name":"alice"}}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                name: Some("alice".to_string())
            }
        );
    }

    #[test]
    fn deserialize_join_without_name() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"join","data":{}}"#).unwrap();
        assert_eq!(msg, ClientMessage::Join { name: None });
    }

    #[test]
    fn deserialize_move_with_and_without_facing() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","data":{"x":10.5,"y":20,"facing":-1}}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Move {
                x: 10.5,
                y: 20.0,
                facing: Some(-1)
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","data":{"x":1,"y":2}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Move { facing: None, .. }));
    }

    #[test]
    fn deserialize_attack_variants() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"attack","data":{"attackType":"kick","x":400,"y":300}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Attack {
                attack_type: Some(AttackKind::Kick),
                x: Some(400.0),
                y: Some(300.0)
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"attack","data":{}}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Attack {
                attack_type: None,
                x: None,
                y: None
            }
        );
    }

    #[test]
    fn deserialize_rename() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"rename","data":{"newName":"bob"}}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Rename {
                new_name: "bob".to_string()
            }
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport","data":{}}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json at all").is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"data":{}}"#).is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","data":{"x":1,"y":2,"spin":true}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Move { .. }));
    }

    #[test]
    fn serialize_init_envelope() {
        let player = sample_player();
        let msg = ServerMessage::Init {
            player_id: PlayerId(3),
            players: vec![PlayerWire::from(&player)],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.starts_with(r#"{"type":"init","data":"#));
        assert!(json.contains(r#""playerId":3"#));
        assert!(json.contains(r#""name":"alice""#));
        assert!(json.contains(r#""maxHealth":100"#));
        assert!(json.contains(r##""color":"#feca57""##));
        assert!(json.contains(r#""isAttacking":false"#));
    }

    #[test]
    fn serialize_player_joined_as_object() {
        let player = sample_player();
        let json =
            serde_json::to_string(&ServerMessage::PlayerJoined(PlayerWire::from(&player))).unwrap();
        assert!(json.starts_with(r#"{"type":"playerJoined","data":{"id":3"#));
    }

    #[test]
    fn serialize_player_moved() {
        let json = serde_json::to_string(&ServerMessage::PlayerMoved {
            id: PlayerId(7),
            x: 10.0,
            y: 20.0,
            facing: -1,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"playerMoved","data":{"id":7,"x":10.0,"y":20.0,"facing":-1}}"#
        );
    }

    #[test]
    fn player_attacked_omits_missing_kind() {
        let json = serde_json::to_string(&ServerMessage::PlayerAttacked {
            id: PlayerId(1),
            attack_type: Some(AttackKind::Punch),
            x: 5.0,
            y: 6.0,
        })
        .unwrap();
        assert!(json.contains(r#""attackType":"punch""#));

        let json = serde_json::to_string(&ServerMessage::PlayerAttacked {
            id: PlayerId(1),
            attack_type: None,
            x: 5.0,
            y: 6.0,
        })
        .unwrap();
        assert!(!json.contains("attackType"));
    }

    #[test]
    fn serialize_player_damaged_camel_case() {
        let json = serde_json::to_string(&ServerMessage::PlayerDamaged {
            id: PlayerId(2),
            health: 75,
            max_health: 100,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"playerDamaged","data":{"id":2,"health":75,"maxHealth":100}}"#
        );
    }

    #[test]
    fn serialize_player_killed_nests_both_sides() {
        let msg = ServerMessage::PlayerKilled {
            killer: KillerWire {
                id: PlayerId(1),
                name: "alice".to_string(),
                size: 28.0,
                points: 10,
                kills: 1,
                health: 100,
            },
            victim: VictimWire {
                id: PlayerId(2),
                name: "bob".to_string(),
                x: 400.0,
                y: 300.0,
                size: 20.0,
                health: 100,
                deaths: 1,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""killer":{"id":1"#));
        assert!(json.contains(r#""victim":{"id":2"#));
        assert!(json.contains(r#""deaths":1"#));
    }

    #[test]
    fn serialize_player_renamed() {
        let json = serde_json::to_string(&ServerMessage::PlayerRenamed {
            id: PlayerId(4),
            old_name: "Player 4".to_string(),
            new_name: "dave".to_string(),
        })
        .unwrap();
        assert!(json.contains(r#""oldName":"Player 4""#));
        assert!(json.contains(r#""newName":"dave""#));
    }

    #[test]
    fn serialize_game_update_array() {
        let player = sample_player();
        let json = serde_json::to_string(&ServerMessage::GameUpdate {
            players: vec![PlayerStateWire::from(&player)],
        })
        .unwrap();
        assert!(json.starts_with(r#"{"type":"gameUpdate","data":{"players":[{"id":3"#));
        // Roster-only fields stay out of the periodic snapshot.
        assert!(!json.contains("color"));
        assert!(!json.contains("name"));
        assert!(!json.contains("maxHealth"));
    }

    #[test]
    fn server_message_round_trips() {
        let msg = ServerMessage::PlayerLeft { id: PlayerId(9) };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn wire_views_copy_player_fields() {
        let mut player = sample_player();
        player.kills = 3;
        player.is_attacking = true;
        player.attack_type = Some(AttackKind::Kick);

        let full = PlayerWire::from(&player);
        assert_eq!(full.id, PlayerId(3));
        assert_eq!(full.kills, 3);
        assert_eq!(full.attack_type, Some(AttackKind::Kick));

        let state = PlayerStateWire::from(&player);
        assert_eq!(state.id, PlayerId(3));
        assert!(state.is_attacking);
        assert_eq!(state.health, 100);
    }
}
