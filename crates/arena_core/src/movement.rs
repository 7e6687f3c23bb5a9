use crate::player::Player;
use crate::settings::GameSettings;

/// Result of a processed move request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedMove {
    pub x: f64,
    pub y: f64,
    pub facing: i8,
}

/// Clamp a position into the map so the player's circle stays fully inside.
pub fn clamp_to_bounds(player: &mut Player, settings: &GameSettings) {
    let half = player.size / 2.0;
    player.x = player.x.clamp(half, settings.map_width - half);
    player.y = player.y.clamp(half, settings.map_height - half);
}

/// Apply an absolute-position move request. Coordinates are clamped per
/// axis, never rejected. A missing or zero facing keeps the previous value.
pub fn apply_move(
    player: &mut Player,
    x: f64,
    y: f64,
    facing: Option<i8>,
    settings: &GameSettings,
) -> AppliedMove {
    player.x = x;
    player.y = y;
    clamp_to_bounds(player, settings);

    match facing {
        Some(f) if f < 0 => player.facing = -1,
        Some(f) if f > 0 => player.facing = 1,
        _ => {}
    }

    AppliedMove {
        x: player.x,
        y: player.y,
        facing: player.facing,
    }
}
