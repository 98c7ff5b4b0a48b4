//! Player physics: movement, variable-height jumps, ground contact and
//! invulnerability countdowns

use serde::{Deserialize, Serialize};

use super::ability::{Ability, AbilitySet};
use super::entity::{Facing, Player};
use super::state::GameState;
use crate::consts::*;

/// Directional buttons currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldInput {
    pub left: bool,
    pub right: bool,
}

/// Advance the player by one tick
pub fn update(player: &mut Player, state: &mut GameState, held: HeldInput) {
    // Horizontal
    let max_x = ARENA_WIDTH - player.size.x;
    if held.left && player.pos.x > 0.0 {
        player.vel.x = -PLAYER_MOVE_SPEED;
        player.facing = Facing::Left;
    } else if held.right && player.pos.x < max_x {
        player.vel.x = PLAYER_MOVE_SPEED;
        player.facing = Facing::Right;
    } else {
        player.vel.x = 0.0;
    }
    player.pos.x = (player.pos.x + player.vel.x).clamp(0.0, max_x);

    // Holding jump extends the ascent with a boost that decays over the hold
    if player.holding_jump && player.jump_hold_time < MAX_JUMP_HOLD_TIME && player.vel.y < 0.0 {
        let decay = 1.0 - player.jump_hold_time as f32 / MAX_JUMP_HOLD_TIME as f32;
        player.vel.y -= JUMP_HOLD_BOOST * decay;
        player.jump_hold_time += 1;
    }

    player.vel.y += if player.vel.y < 0.0 { LIGHT_GRAVITY } else { GRAVITY };
    player.pos.y += player.vel.y;

    if player.pos.y < 0.0 {
        player.pos.y = 0.0;
        player.vel.y = player.vel.y.max(0.0);
    }

    let floor = player.floor_y();
    if player.pos.y >= floor {
        player.pos.y = floor;
        player.vel.y = 0.0;
        player.grounded = true;
        player.jumping = false;
        player.holding_jump = false;
        player.jump_hold_time = 0;
        player.double_jump_used = false;
    } else {
        player.grounded = false;
    }

    player.damage_resistance.tick();
    state.post_buff_grace.tick();
    state.post_damage_grace.tick();
}

/// Begin a jump (or a double jump). Returns true if the player jumped.
pub fn start_jump(player: &mut Player, abilities: &AbilitySet) -> bool {
    if player.grounded {
        player.vel.y = JUMP_STRENGTH;
        player.jumping = true;
        player.grounded = false;
        player.holding_jump = true;
        player.jump_hold_time = 0;
        player.double_jump_used = false;
        return true;
    }

    if abilities.contains(Ability::DoubleJump) && !player.double_jump_used {
        player.vel.y = DOUBLE_JUMP_STRENGTH;
        player.double_jump_used = true;
        player.holding_jump = true;
        player.jump_hold_time = 0;
        return true;
    }

    false
}

pub fn stop_jump(player: &mut Player) {
    player.holding_jump = false;
}

/// Immune to contact damage while any countdown is running
pub fn is_invulnerable(player: &Player, state: &GameState) -> bool {
    player.damage_resistance.active() || state.post_buff_grace.active() || state.post_damage_grace.active()
}

/// Arm every invulnerability countdown after a hit
pub fn arm_damage_grace(player: &mut Player, state: &mut GameState) {
    player.damage_resistance.arm(DAMAGE_RESISTANCE_TIME);
    state.post_damage_grace.arm(POST_DAMAGE_INVULNERABILITY);
    // Shares the post-damage window so the total immunity stays 60 ticks
    state.post_buff_grace.arm(POST_DAMAGE_INVULNERABILITY);
}

/// Blink state of the invulnerability flash
pub fn player_visible(player: &Player, state: &GameState) -> bool {
    let v = player
        .damage_resistance
        .remaining()
        .max(state.post_buff_grace.remaining())
        .max(state.post_damage_grace.remaining());
    !(v > 0 && (v / BLINK_FREQUENCY) % 2 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeConfig;

    fn setup() -> (Player, GameState) {
        (Player::default(), GameState::new(&ThemeConfig::cowboy()))
    }

    #[test]
    fn test_jump_initiation() {
        let (mut player, _) = setup();
        assert!(start_jump(&mut player, &AbilitySet::new()));
        assert_eq!(player.vel.y, JUMP_STRENGTH);
        assert!(!player.grounded);
        assert!(player.jumping);
        assert!(player.holding_jump);

        // No double jump without the ability
        assert!(!start_jump(&mut player, &AbilitySet::new()));
    }

    #[test]
    fn test_holding_extends_jump() {
        let (mut held_player, mut state) = setup();
        let mut tapped_player = held_player.clone();
        start_jump(&mut held_player, &AbilitySet::new());
        start_jump(&mut tapped_player, &AbilitySet::new());
        stop_jump(&mut tapped_player);

        update(&mut held_player, &mut state, HeldInput::default());
        update(&mut tapped_player, &mut state, HeldInput::default());
        assert!((held_player.vel.y - (-8.0 - 0.3 + 0.4)).abs() < 1e-5);
        assert!((tapped_player.vel.y - (-8.0 + 0.4)).abs() < 1e-5);

        // Boost decays with hold time
        let before = held_player.vel.y;
        update(&mut held_player, &mut state, HeldInput::default());
        let boost = 0.3 * (1.0 - 1.0 / 90.0);
        assert!((held_player.vel.y - (before - boost + 0.4)).abs() < 1e-5);

        // Releasing stops the extension immediately
        stop_jump(&mut held_player);
        let before = held_player.vel.y;
        update(&mut held_player, &mut state, HeldInput::default());
        assert!((held_player.vel.y - (before + 0.4)).abs() < 1e-5);
        assert!(held_player.pos.y < tapped_player.pos.y);
    }

    #[test]
    fn test_lands_and_resets_flags() {
        let (mut player, mut state) = setup();
        start_jump(&mut player, &AbilitySet::new());
        for _ in 0..200 {
            update(&mut player, &mut state, HeldInput::default());
        }
        assert!(player.grounded);
        assert!(!player.jumping);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.pos.y, player.floor_y());
        assert_eq!(player.jump_hold_time, 0);
    }

    #[test]
    fn test_double_jump_once_per_airtime() {
        let (mut player, mut state) = setup();
        let mut abilities = AbilitySet::new();
        abilities.insert(Ability::DoubleJump);
        start_jump(&mut player, &abilities);
        update(&mut player, &mut state, HeldInput::default());
        assert!(start_jump(&mut player, &abilities));
        assert_eq!(player.vel.y, DOUBLE_JUMP_STRENGTH);
        assert!(!start_jump(&mut player, &abilities));
    }

    #[test]
    fn test_horizontal_bounds() {
        let (mut player, mut state) = setup();
        player.pos.x = 1.0;
        update(&mut player, &mut state, HeldInput { left: true, right: false });
        assert_eq!(player.pos.x, 0.0);
        assert_eq!(player.facing, Facing::Left);
        update(&mut player, &mut state, HeldInput { left: true, right: false });
        assert_eq!(player.vel.x, 0.0);

        player.pos.x = ARENA_WIDTH - player.size.x - 2.0;
        update(&mut player, &mut state, HeldInput { left: false, right: true });
        assert_eq!(player.pos.x, ARENA_WIDTH - player.size.x);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_invulnerability_and_blink() {
        let (mut player, mut state) = setup();
        assert!(!is_invulnerable(&player, &state));
        assert!(player_visible(&player, &state));

        arm_damage_grace(&mut player, &mut state);
        assert!(is_invulnerable(&player, &state));
        // v = 60, (60 / 8) % 2 == 1 -> visible
        assert!(player_visible(&player, &state));
        for _ in 0..4 {
            update(&mut player, &mut state, HeldInput::default());
        }
        // v = 56, (56 / 8) % 2 == 1 -> visible; v = 48 -> hidden
        assert!(player_visible(&player, &state));
        for _ in 0..8 {
            update(&mut player, &mut state, HeldInput::default());
        }
        assert!(!player_visible(&player, &state));

        for _ in 0..60 {
            update(&mut player, &mut state, HeldInput::default());
        }
        assert!(!is_invulnerable(&player, &state));
    }
}
