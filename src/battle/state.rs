use crate::battle::mode::GameMode;
use crate::items::EffectOutcome;
use crate::moves::Move;
use crate::player::BattlePlayer;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Setup,
    PlayerTurn,   // players[0] is acting
    OpponentTurn, // players[1] is acting
    GameOver,
}

impl GameState {
    pub fn for_player(player_index: usize) -> Self {
        if player_index == 0 {
            GameState::PlayerTurn
        } else {
            GameState::OpponentTurn
        }
    }
}

/// Why an action was refused. Rejections leave the battle untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    BattleOver,
    NotStarted,
    Paused,
    ActionAlreadyTaken,
    InvalidMoveIndex,
    NoPpRemaining,
    MovesStillAvailable,
    InvalidSwitch,
    InvalidItem,
    /// The current player is an AI; its turn is played by the runner.
    AiControlled,
}

/// When the turn should pass after an accepted action.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    /// Items and switches hand over straight away.
    Immediate,
    /// Attacks wait `turn_end_delay` so the hit can be shown.
    Delayed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Accepted(TurnEnd),
    Rejected(RejectReason),
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionOutcome::Accepted(_))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    CoinToss {
        winner_index: usize,
    },
    TurnStarted {
        turn_number: u32,
        player_index: usize,
        seconds: u32,
    },
    TimerTick {
        remaining: u32,
    },
    TurnTimedOut {
        player_index: usize,
    },
    TurnEnded {
        player_index: usize,
    },
    BattlePaused {
        remaining: u32,
    },
    BattleResumed {
        remaining: u32,
    },

    // Pokemon Actions
    MoveUsed {
        player_index: usize,
        pokemon: String,
        move_used: Move,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    RecoilDamage {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonFainted {
        player_index: usize,
        pokemon: String,
    },
    PokemonSwitched {
        player_index: usize,
        old_pokemon: String,
        new_pokemon: String,
    },
    ItemUsed {
        player_index: usize,
        item: String,
        target: String,
        outcome: EffectOutcome,
    },
    ActionRejected {
        player_index: usize,
        reason: RejectReason,
    },

    // Battle End
    BattleEnded {
        winner: Option<usize>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let name_of = |index: usize| battle_state.players[index].player_name.as_str();

        match self {
            BattleEvent::CoinToss { winner_index } => Some(format!(
                "Coin toss between {} and {}: {} goes first!",
                name_of(0),
                name_of(1),
                name_of(*winner_index)
            )),
            BattleEvent::TurnStarted {
                turn_number,
                player_index,
                seconds,
            } => Some(format!(
                "=== Turn {}: {} ({}s) ===",
                turn_number,
                name_of(*player_index),
                seconds
            )),
            BattleEvent::TimerTick { .. } => None, // Silent - the display shows the clock
            BattleEvent::TurnTimedOut { player_index } => Some(format!(
                "{} ran out of time! Every move loses 1 PP.",
                name_of(*player_index)
            )),
            BattleEvent::TurnEnded { .. } => None,
            BattleEvent::BattlePaused { remaining } => {
                Some(format!("Battle paused with {}s left.", remaining))
            }
            BattleEvent::BattleResumed { remaining } => {
                Some(format!("Battle resumed with {}s left.", remaining))
            }

            BattleEvent::MoveUsed {
                player_index,
                pokemon,
                move_used,
            } => Some(format!(
                "{}'s {} used {}!",
                name_of(*player_index),
                pokemon,
                move_used
            )),
            BattleEvent::AttackTypeEffectiveness { multiplier } => {
                Self::format_effectiveness(*multiplier)
            }
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::RecoilDamage { target, damage, .. } => {
                Some(format!("{} is hit with {} recoil!", target, damage))
            }
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),
            BattleEvent::PokemonSwitched {
                player_index,
                old_pokemon,
                new_pokemon,
            } => Some(format!(
                "{} recalled {} and sent out {}!",
                name_of(*player_index),
                old_pokemon,
                new_pokemon
            )),
            BattleEvent::ItemUsed {
                player_index,
                item,
                target,
                outcome,
            } => {
                let result = match outcome {
                    EffectOutcome::Healed { amount } => format!("{} recovered {} HP!", target, amount),
                    EffectOutcome::Revived { hp } => format!("{} was revived with {} HP!", target, hp),
                    EffectOutcome::AttackBoosted { amount } => {
                        format!("{}'s attack rose by {}!", target, amount)
                    }
                    EffectOutcome::NoEffect => "But it had no effect!".to_string(),
                };
                Some(format!("{} used a {}. {}", name_of(*player_index), item, result))
            }
            BattleEvent::ActionRejected { .. } => None,

            BattleEvent::BattleEnded { winner } => match winner {
                Some(index) => Some(format!("{} wins the battle!", name_of(*index))),
                None => Some("The battle ended in a draw.".to_string()),
            },
        }
    }

    fn format_effectiveness(multiplier: f64) -> Option<String> {
        if multiplier == 0.0 {
            Some("It had no effect!".to_string())
        } else if multiplier > 1.0 {
            Some("It's super effective!".to_string())
        } else if multiplier < 1.0 {
            Some("It's not very effective...".to_string())
        } else {
            None
        }
    }
}

/// Event bus for collecting and managing battle events.
///
/// ```rust,ignore
/// event_bus.print_debug();                                    // Just print events
/// event_bus.print_formatted(&battle_state);                   // Human-readable format
/// println!("{}", event_bus);                                  // Display impl
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Remove and return every collected event, oldest first.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    /// Print all events using their formatted text (when available) along with battle context.
    /// Falls back to debug format for silent events.
    pub fn print_formatted(&self, battle_state: &BattleState) {
        for event in &self.events {
            match event.format(battle_state) {
                Some(formatted) => println!("  {}", formatted),
                None => println!("  {:?} (silent)", event),
            }
        }
    }

    pub fn print_formatted_with_message(&self, message: &str, battle_state: &BattleState) {
        println!("{}", message);
        self.print_formatted(battle_state);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Everything needed to resume a battle. Timers are not part of the state;
/// the runner rebuilds them from `time_remaining` and the flags below.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub battle_id: String,
    pub players: [BattlePlayer; 2],
    pub mode: GameMode,
    pub game_state: GameState,
    /// Index of the player whose turn it is.
    pub current: usize,
    /// Monotonic: once set, no further actions are accepted.
    pub is_over: bool,
    pub turn_number: u32,
    /// Countdown units left in the current turn.
    pub time_remaining: u32,
    pub action_taken: bool,
    pub timed_out: bool,
    /// The opening turn gets the longer countdown; cleared when it begins.
    pub first_turn: bool,
    pub paused: bool,
}

impl BattleState {
    pub fn new(
        battle_id: impl Into<String>,
        player1: BattlePlayer,
        player2: BattlePlayer,
        mode: GameMode,
    ) -> Self {
        Self {
            battle_id: battle_id.into(),
            players: [player1, player2],
            mode,
            game_state: GameState::Setup,
            current: 0,
            is_over: false,
            turn_number: 0,
            time_remaining: 0,
            action_taken: false,
            timed_out: false,
            first_turn: true,
            paused: false,
        }
    }

    pub fn opponent_index(&self) -> usize {
        1 - self.current
    }

    pub fn current_player(&self) -> &BattlePlayer {
        &self.players[self.current]
    }

    pub fn opponent(&self) -> &BattlePlayer {
        &self.players[self.opponent_index()]
    }

    /// True while a turn is in progress and the clock may run.
    pub fn clock_running(&self) -> bool {
        !self.is_over
            && !self.paused
            && !self.action_taken
            && matches!(self.game_state, GameState::PlayerTurn | GameState::OpponentTurn)
    }

    /// Consistency checks for states that did not come from `new`.
    pub fn validate(&self) -> Result<(), String> {
        if self.current > 1 {
            return Err(format!("current player index {} is out of range", self.current));
        }
        for player in &self.players {
            player.validate()?;
            if player.active_pokemon().is_fainted() && !player.all_fainted() {
                return Err(format!(
                    "{}'s active Pokemon has fainted while healthy teammates remain",
                    player.player_name
                ));
            }
        }
        match (self.is_over, self.mode.is_game_over(&self.players)) {
            (true, false) => {
                return Err("battle is over but both teams can still fight".to_string())
            }
            (false, true) => {
                return Err("a whole team has fainted but the battle is running".to_string())
            }
            _ => {}
        }
        match self.game_state {
            GameState::GameOver if !self.is_over => {
                Err("game state is GameOver but the battle is not over".to_string())
            }
            GameState::PlayerTurn | GameState::OpponentTurn
                if self.is_over || self.game_state != GameState::for_player(self.current) =>
            {
                Err(format!(
                    "game state {:?} does not match current player {}",
                    self.game_state, self.current
                ))
            }
            _ => Ok(()),
        }
    }
}
