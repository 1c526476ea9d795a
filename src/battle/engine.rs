//! Synchronous turn rules. Every function here runs to completion against a
//! `BattleState` and reports what happened through an `EventBus`; timing is
//! the runner's job.

use crate::battle::state::{
    ActionOutcome, BattleEvent, BattleState, EventBus, GameState, RejectReason, TurnEnd,
};
use crate::config::BattleConfig;
use crate::items::Item;
use crate::player::{BattlePlayer, PlayerAction};
use crate::type_chart::TypeChart;
use rand::Rng;
use tracing::{debug, info};

/// PP every move of the active Pokemon loses when its trainer runs out of time.
pub const TIMEOUT_PP_PENALTY: u8 = 1;

/// Pick which player opens the battle.
pub fn coin_toss() -> usize {
    rand::rng().random_range(0..2)
}

/// Leave `Setup`: announce the coin toss and begin the first turn.
/// Returns false if the battle has already started.
pub fn start_battle(
    battle_state: &mut BattleState,
    config: &BattleConfig,
    first_player: usize,
    bus: &mut EventBus,
) -> bool {
    if battle_state.game_state != GameState::Setup || battle_state.is_over {
        return false;
    }

    let first_player = first_player.min(1);
    info!(
        battle_id = %battle_state.battle_id,
        first = %battle_state.players[first_player].player_name,
        "coin toss decided"
    );
    bus.push(BattleEvent::CoinToss {
        winner_index: first_player,
    });
    battle_state.current = first_player;

    if battle_state.mode.is_game_over(&battle_state.players) {
        let winner = battle_state.mode.winner(&battle_state.players);
        finish_battle(battle_state, winner, bus);
        return true;
    }

    begin_turn(battle_state, config, bus);
    true
}

/// Reset the clock and action flags for the current player's turn.
pub fn begin_turn(battle_state: &mut BattleState, config: &BattleConfig, bus: &mut EventBus) {
    if battle_state.is_over {
        return;
    }

    battle_state.turn_number += 1;
    battle_state.time_remaining = config.turn_limit(battle_state.first_turn);
    battle_state.first_turn = false;
    battle_state.action_taken = false;
    battle_state.timed_out = false;
    battle_state.game_state = GameState::for_player(battle_state.current);

    info!(
        battle_id = %battle_state.battle_id,
        turn = battle_state.turn_number,
        player = %battle_state.current_player().player_name,
        seconds = battle_state.time_remaining,
        "turn started"
    );
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
        player_index: battle_state.current,
        seconds: battle_state.time_remaining,
    });
}

/// Advance the countdown by one unit. Returns true if this tick expired the
/// turn, in which case the timeout penalty has been applied and control has
/// already passed to the other player (the caller still starts the next turn).
pub fn tick(battle_state: &mut BattleState, bus: &mut EventBus) -> bool {
    if !battle_state.clock_running() {
        return false;
    }

    battle_state.time_remaining = battle_state.time_remaining.saturating_sub(1);
    bus.push(BattleEvent::TimerTick {
        remaining: battle_state.time_remaining,
    });

    if battle_state.time_remaining == 0 {
        timeout(battle_state, bus);
        return true;
    }
    false
}

/// Force the current turn to end: every move of the active Pokemon loses PP,
/// then the other player takes over.
pub fn timeout(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.is_over || battle_state.action_taken {
        return;
    }

    let current = battle_state.current;
    battle_state.timed_out = true;
    battle_state.action_taken = true;
    battle_state.players[current]
        .active_pokemon_mut()
        .reduce_all_pp(TIMEOUT_PP_PENALTY);

    info!(
        battle_id = %battle_state.battle_id,
        player = %battle_state.players[current].player_name,
        "turn timed out"
    );
    bus.push(BattleEvent::TurnTimedOut {
        player_index: current,
    });
    end_turn(battle_state, bus);
}

/// Hand control to the other player. Does nothing once the battle is over.
pub fn end_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.is_over {
        return;
    }

    bus.push(BattleEvent::TurnEnded {
        player_index: battle_state.current,
    });
    battle_state.current = battle_state.opponent_index();
    battle_state.game_state = GameState::for_player(battle_state.current);
}

/// Common gate for every action.
fn check_can_act(battle_state: &BattleState) -> Result<(), RejectReason> {
    if battle_state.is_over {
        return Err(RejectReason::BattleOver);
    }
    if battle_state.game_state == GameState::Setup {
        return Err(RejectReason::NotStarted);
    }
    if battle_state.paused {
        return Err(RejectReason::Paused);
    }
    if battle_state.action_taken {
        return Err(RejectReason::ActionAlreadyTaken);
    }
    Ok(())
}

fn reject(battle_state: &BattleState, reason: RejectReason, bus: &mut EventBus) -> ActionOutcome {
    debug!(
        battle_id = %battle_state.battle_id,
        player = battle_state.current,
        ?reason,
        "action rejected"
    );
    bus.push(BattleEvent::ActionRejected {
        player_index: battle_state.current,
        reason,
    });
    ActionOutcome::Rejected(reason)
}

/// Borrow the acting player and its opponent at the same time.
fn split_players(
    players: &mut [BattlePlayer; 2],
    current: usize,
) -> (&mut BattlePlayer, &mut BattlePlayer) {
    let [first, second] = players;
    if current == 0 {
        (first, second)
    } else {
        (second, first)
    }
}

/// Use the move in `move_index` against the opponent's active Pokemon.
pub fn execute_move(
    battle_state: &mut BattleState,
    chart: &TypeChart,
    move_index: usize,
    bus: &mut EventBus,
) -> ActionOutcome {
    if let Err(reason) = check_can_act(battle_state) {
        return reject(battle_state, reason, bus);
    }

    let active = battle_state.current_player().active_pokemon();
    if active.all_moves_out_of_pp() {
        return reject(battle_state, RejectReason::NoPpRemaining, bus);
    }
    let Some(move_instance) = active.moves.get(move_index) else {
        return reject(battle_state, RejectReason::InvalidMoveIndex, bus);
    };
    if !move_instance.has_pp() {
        return reject(battle_state, RejectReason::NoPpRemaining, bus);
    }
    let move_used = move_instance.move_;

    battle_state.action_taken = true;
    let current = battle_state.current;
    let opponent_index = battle_state.opponent_index();
    let (attacker, defender) = split_players(&mut battle_state.players, current);
    let attacker_pokemon = attacker.active_pokemon_mut();
    let defender_pokemon = defender.active_pokemon_mut();

    bus.push(BattleEvent::MoveUsed {
        player_index: current,
        pokemon: attacker_pokemon.name.clone(),
        move_used,
    });

    let damage = attacker_pokemon.attack(chart, defender_pokemon, move_index);
    if move_used.data().is_offensive() {
        bus.push(BattleEvent::AttackTypeEffectiveness {
            multiplier: chart.effectiveness_against(
                move_used.move_type(),
                defender_pokemon.primary_type,
                defender_pokemon.secondary_type,
            ),
        });
        bus.push(BattleEvent::DamageDealt {
            target: defender_pokemon.name.clone(),
            damage,
            remaining_hp: defender_pokemon.current_hp(),
        });
    }
    debug!(
        battle_id = %battle_state.battle_id,
        %move_used,
        damage,
        "move executed"
    );

    resolve_faint(battle_state, opponent_index, bus);
    check_game_over(battle_state, bus);
    ActionOutcome::Accepted(TurnEnd::Delayed)
}

/// Attack with Struggle. Only allowed when no move has PP left.
pub fn execute_struggle(
    battle_state: &mut BattleState,
    chart: &TypeChart,
    bus: &mut EventBus,
) -> ActionOutcome {
    if let Err(reason) = check_can_act(battle_state) {
        return reject(battle_state, reason, bus);
    }
    if battle_state.current_player().active_pokemon().has_usable_move() {
        return reject(battle_state, RejectReason::MovesStillAvailable, bus);
    }

    battle_state.action_taken = true;
    let current = battle_state.current;
    let opponent_index = battle_state.opponent_index();
    let (attacker, defender) = split_players(&mut battle_state.players, current);
    let attacker_pokemon = attacker.active_pokemon_mut();
    let defender_pokemon = defender.active_pokemon_mut();

    bus.push(BattleEvent::MoveUsed {
        player_index: current,
        pokemon: attacker_pokemon.name.clone(),
        move_used: crate::moves::Move::Struggle,
    });
    let (damage, recoil) = attacker_pokemon.struggle(chart, defender_pokemon);
    bus.push(BattleEvent::DamageDealt {
        target: defender_pokemon.name.clone(),
        damage,
        remaining_hp: defender_pokemon.current_hp(),
    });
    bus.push(BattleEvent::RecoilDamage {
        target: attacker_pokemon.name.clone(),
        damage: recoil,
        remaining_hp: attacker_pokemon.current_hp(),
    });

    resolve_faint(battle_state, opponent_index, bus);
    resolve_faint(battle_state, current, bus);
    check_game_over(battle_state, bus);
    ActionOutcome::Accepted(TurnEnd::Delayed)
}

/// Apply `item` to the current player's active Pokemon. Removing the item from
/// the inventory is the caller's job.
pub fn use_item(battle_state: &mut BattleState, item: &Item, bus: &mut EventBus) -> ActionOutcome {
    if let Err(reason) = check_can_act(battle_state) {
        return reject(battle_state, reason, bus);
    }

    battle_state.action_taken = true;
    let current = battle_state.current;
    let target = battle_state.players[current].active_pokemon_mut();
    let outcome = item.use_on(target);
    let target_name = target.name.clone();

    debug!(battle_id = %battle_state.battle_id, item = %item.name, ?outcome, "item used");
    bus.push(BattleEvent::ItemUsed {
        player_index: current,
        item: item.name.clone(),
        target: target_name,
        outcome,
    });
    ActionOutcome::Accepted(TurnEnd::Immediate)
}

/// Take the item at `item_index` out of the current player's inventory and use it.
pub fn use_inventory_item(
    battle_state: &mut BattleState,
    item_index: usize,
    bus: &mut EventBus,
) -> ActionOutcome {
    if let Err(reason) = check_can_act(battle_state) {
        return reject(battle_state, reason, bus);
    }
    let current = battle_state.current;
    let Some(item) = battle_state.players[current].take_item(item_index) else {
        return reject(battle_state, RejectReason::InvalidItem, bus);
    };
    use_item(battle_state, &item, bus)
}

/// Send out the team member at `team_index`.
///
/// An out-of-range index means "no valid switch exists": if the whole team
/// has fainted, the battle ends in the opponent's favour.
pub fn switch_pokemon(
    battle_state: &mut BattleState,
    team_index: usize,
    bus: &mut EventBus,
) -> ActionOutcome {
    if let Err(reason) = check_can_act(battle_state) {
        return reject(battle_state, reason, bus);
    }

    let current = battle_state.current;
    let player = &battle_state.players[current];

    if team_index >= player.team().len() && player.all_fainted() {
        battle_state.action_taken = true;
        let winner = battle_state.opponent_index();
        finish_battle(battle_state, Some(winner), bus);
        return ActionOutcome::Accepted(TurnEnd::Immediate);
    }
    if !player.can_switch_to(team_index) {
        return reject(battle_state, RejectReason::InvalidSwitch, bus);
    }

    let old_pokemon = player.active_pokemon().name.clone();
    let player = &mut battle_state.players[current];
    player.switch_pokemon(team_index);
    let new_pokemon = player.active_pokemon().name.clone();
    battle_state.action_taken = true;

    debug!(battle_id = %battle_state.battle_id, %old_pokemon, %new_pokemon, "switched");
    bus.push(BattleEvent::PokemonSwitched {
        player_index: current,
        old_pokemon,
        new_pokemon,
    });
    ActionOutcome::Accepted(TurnEnd::Immediate)
}

/// Dispatch a `PlayerAction` for the current player.
pub fn apply_action(
    battle_state: &mut BattleState,
    chart: &TypeChart,
    action: &PlayerAction,
    bus: &mut EventBus,
) -> ActionOutcome {
    match *action {
        PlayerAction::UseMove { move_index } => execute_move(battle_state, chart, move_index, bus),
        PlayerAction::UseItem { item_index } => use_inventory_item(battle_state, item_index, bus),
        PlayerAction::SwitchPokemon { team_index } => switch_pokemon(battle_state, team_index, bus),
        PlayerAction::Struggle => execute_struggle(battle_state, chart, bus),
    }
}

/// Screen an action submitted from outside the battle. Those only ever speak
/// for a human trainer, so an AI's turn refuses them. `None` means the action
/// may go ahead.
pub fn screen_external_action(
    battle_state: &BattleState,
    bus: &mut EventBus,
) -> Option<ActionOutcome> {
    if let Err(reason) = check_can_act(battle_state) {
        return Some(reject(battle_state, reason, bus));
    }
    if battle_state.current_player().is_ai() {
        return Some(reject(battle_state, RejectReason::AiControlled, bus));
    }
    None
}

/// Ask the current player's AI for its action. `None` for human players.
pub fn decide_ai_action(battle_state: &BattleState, chart: &TypeChart) -> Option<PlayerAction> {
    battle_state
        .current_player()
        .decide(chart, battle_state.opponent())
}

/// Stop the clock, keeping the remaining time. Returns false if there is no
/// running turn to pause.
pub fn pause(battle_state: &mut BattleState, bus: &mut EventBus) -> bool {
    if battle_state.is_over || battle_state.paused || battle_state.game_state == GameState::Setup {
        return false;
    }
    battle_state.paused = true;
    info!(battle_id = %battle_state.battle_id, remaining = battle_state.time_remaining, "paused");
    bus.push(BattleEvent::BattlePaused {
        remaining: battle_state.time_remaining,
    });
    true
}

/// Restart the clock from exactly where `pause` left it.
pub fn resume(battle_state: &mut BattleState, bus: &mut EventBus) -> bool {
    if battle_state.is_over || !battle_state.paused {
        return false;
    }
    battle_state.paused = false;
    info!(battle_id = %battle_state.battle_id, remaining = battle_state.time_remaining, "resumed");
    bus.push(BattleEvent::BattleResumed {
        remaining: battle_state.time_remaining,
    });
    true
}

/// The player with a healthy Pokemon left while the other has none.
pub fn winner(battle_state: &BattleState) -> Option<usize> {
    battle_state.mode.winner(&battle_state.players)
}

/// If `player_index`'s active Pokemon has fainted, report it and let the game
/// mode send out a replacement.
fn resolve_faint(battle_state: &mut BattleState, player_index: usize, bus: &mut EventBus) {
    let player = &mut battle_state.players[player_index];
    if !player.active_pokemon().is_fainted() {
        return;
    }

    let fainted = player.active_pokemon().name.clone();
    info!(battle_id = %battle_state.battle_id, pokemon = %fainted, "pokemon fainted");
    bus.push(BattleEvent::PokemonFainted {
        player_index,
        pokemon: fainted.clone(),
    });

    if battle_state
        .mode
        .handle_fainted(&mut battle_state.players[player_index])
        .is_some()
    {
        let new_pokemon = battle_state.players[player_index]
            .active_pokemon()
            .name
            .clone();
        bus.push(BattleEvent::PokemonSwitched {
            player_index,
            old_pokemon: fainted,
            new_pokemon,
        });
    }
}

fn check_game_over(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.mode.is_game_over(&battle_state.players) {
        let winner = battle_state.mode.winner(&battle_state.players);
        finish_battle(battle_state, winner, bus);
    }
}

fn finish_battle(battle_state: &mut BattleState, winner: Option<usize>, bus: &mut EventBus) {
    if battle_state.is_over {
        return;
    }
    battle_state.is_over = true;
    battle_state.game_state = GameState::GameOver;
    battle_state.paused = false;

    info!(
        battle_id = %battle_state.battle_id,
        winner = winner.map(|i| battle_state.players[i].player_name.as_str()),
        "battle over"
    );
    bus.push(BattleEvent::BattleEnded { winner });
}
