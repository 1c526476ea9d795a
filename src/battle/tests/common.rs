use crate::battle::ai::AiArchetype;
use crate::battle::engine;
use crate::battle::mode::GameMode;
use crate::battle::observer::BattleObserver;
use crate::battle::state::{BattleEvent, BattleState, EventBus};
use crate::config::BattleConfig;
use crate::items::Item;
use crate::moves::Move;
use crate::player::{BattlePlayer, PlayerType};
use crate::pokemon::{PokemonInst, Stats};
use crate::species::Species;
use crate::type_chart::{install_type_chart, TypeChart};
use schema::PokemonType;
use tokio::sync::mpsc;

/// The process-wide chart, installed from the built-in table on first use.
pub fn chart() -> &'static TypeChart {
    install_type_chart(TypeChart::builtin())
}

/// A builder for creating test Pokemon instances with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new(Species::Pikachu, 50)
///     .with_moves(vec![Move::Tackle])
///     .with_hp(10)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: Species,
    level: u8,
    moves: Option<Vec<Move>>,
    current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            species,
            level,
            moves: None,
            current_hp: None,
        }
    }

    /// Replace the species' default moves.
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        let mut pokemon = self.species.create();
        if let Some(moves) = self.moves {
            pokemon.moves.clear();
            for move_ in moves {
                pokemon.add_move(move_);
            }
        }
        if self.level != pokemon.level {
            pokemon.set_level(self.level);
        }
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        pokemon
    }
}

/// A Pokemon with 100 HP and 50 in every other stat, so damage is easy to
/// work out by hand.
pub fn plain_pokemon(name: &str, primary_type: PokemonType, moves: &[Move]) -> PokemonInst {
    PokemonInst::new(name, primary_type, None, Stats::new(100, 50, 50, 50, 50, 50))
        .with_moves(moves.iter().copied())
}

/// Creates a human test player with the given team and inventory.
pub fn create_test_player(name: &str, team: Vec<PokemonInst>, inventory: Vec<Item>) -> BattlePlayer {
    match BattlePlayer::new(
        name,
        PlayerType::Human {
            color: "red".to_string(),
        },
        team,
        inventory,
    ) {
        Ok(player) => player,
        Err(err) => panic!("Failed to create test player {}: {}", name, err),
    }
}

pub fn create_ai_player(name: &str, archetype: AiArchetype, team: Vec<PokemonInst>) -> BattlePlayer {
    match BattlePlayer::new(name, PlayerType::Ai { archetype }, team, vec![]) {
        Ok(player) => player,
        Err(err) => panic!("Failed to create AI player {}: {}", name, err),
    }
}

/// Creates a standard battle state in `Setup` for testing.
pub fn create_test_battle(player1: BattlePlayer, player2: BattlePlayer) -> BattleState {
    BattleState::new("test_battle", player1, player2, GameMode::Normal)
}

/// Creates and starts a battle in which `players[0]` moves first.
pub fn started_battle(player1: BattlePlayer, player2: BattlePlayer) -> (BattleState, EventBus) {
    let mut state = create_test_battle(player1, player2);
    let mut bus = EventBus::new();
    assert!(engine::start_battle(
        &mut state,
        &BattleConfig::default(),
        0,
        &mut bus
    ));
    (state, bus)
}

/// Timings small enough to reason about in paused-clock tests.
pub fn fast_config() -> BattleConfig {
    BattleConfig {
        turn_seconds: 5,
        first_turn_seconds: 8,
        tick_millis: 100,
        ai_think_millis: 250,
        turn_end_delay_millis: 150,
    }
}

/// Count events matching `predicate`.
pub fn count_events(bus: &EventBus, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
    bus.events().iter().filter(|e| predicate(e)).count()
}

/// Observer that forwards every event to a channel.
pub struct ChannelObserver(pub mpsc::UnboundedSender<BattleEvent>);

impl BattleObserver for ChannelObserver {
    fn on_event(&mut self, event: &BattleEvent, _state: &BattleState) {
        let _ = self.0.send(event.clone());
    }
}

pub fn channel_observer() -> (Box<dyn BattleObserver>, mpsc::UnboundedReceiver<BattleEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Box::new(ChannelObserver(tx)), rx)
}

/// Everything currently buffered in `rx`.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<BattleEvent>) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
