use crate::battle::state::{BattleEvent, BattleState};
use crate::player::BattlePlayer;

/// Receives notifications from a running battle.
///
/// Implement this for whatever presents the battle. All methods have default
/// no-op implementations, so you only need to implement the ones you care
/// about. Calls happen on the battle's own task, in event order, so keep them
/// quick.
pub trait BattleObserver: Send {
    /// Called once per countdown unit with the time left in the turn.
    fn on_timer_tick(&mut self, remaining: u32) {
        let _ = remaining;
    }

    /// Called after every turn transition.
    fn on_state_changed(&mut self, state: &BattleState) {
        let _ = state;
    }

    /// Called once when the opening player has been decided.
    fn on_coin_toss(&mut self, players: [&str; 2], winner_index: usize) {
        let _ = (players, winner_index);
    }

    /// Called once when a player wins.
    fn on_winner(&mut self, winner: &BattlePlayer) {
        let _ = winner;
    }

    /// Called for every battle event, including the ones above.
    fn on_event(&mut self, event: &BattleEvent, state: &BattleState) {
        let _ = (event, state);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BattleObserver for NullObserver {}

/// Prints the formatted text of each event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintObserver;

impl BattleObserver for PrintObserver {
    fn on_event(&mut self, event: &BattleEvent, state: &BattleState) {
        if let Some(text) = event.format(state) {
            println!("{}", text);
        }
    }
}

/// Route a batch of engine events to `observer`.
pub fn notify(observer: &mut dyn BattleObserver, events: &[BattleEvent], state: &BattleState) {
    for event in events {
        observer.on_event(event, state);
        match event {
            BattleEvent::TimerTick { remaining } => observer.on_timer_tick(*remaining),
            BattleEvent::CoinToss { winner_index } => observer.on_coin_toss(
                [
                    state.players[0].player_name.as_str(),
                    state.players[1].player_name.as_str(),
                ],
                *winner_index,
            ),
            BattleEvent::TurnStarted { .. } | BattleEvent::TurnEnded { .. } => {
                observer.on_state_changed(state)
            }
            BattleEvent::BattleEnded { winner } => {
                observer.on_state_changed(state);
                if let Some(index) = winner {
                    observer.on_winner(&state.players[*index]);
                }
            }
            _ => {}
        }
    }
}
