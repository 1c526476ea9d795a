//! One task per battle. The task owns the `BattleState` outright, so every
//! mutation (commands, countdown ticks, AI decisions, delayed turn ends) is
//! serialized through its `select!` loop.

use crate::battle::engine;
use crate::battle::observer::{notify, BattleObserver};
use crate::battle::state::{ActionOutcome, BattleState, EventBus, GameState, TurnEnd};
use crate::config::BattleConfig;
use crate::errors::{ConfigResult, RunnerError};
use crate::items::Item;
use crate::player::PlayerAction;
use crate::type_chart::{type_chart, TypeChart};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

enum Command {
    Act {
        action: PlayerAction,
        reply: oneshot::Sender<ActionOutcome>,
    },
    UseItem {
        item: Item,
        reply: oneshot::Sender<ActionOutcome>,
    },
    Pause {
        reply: oneshot::Sender<bool>,
    },
    Resume {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<BattleState>,
    },
    Shutdown,
}

/// Cloneable handle for sending commands to a running battle. Actions are
/// always taken on behalf of whichever player's turn it is.
///
/// The battle task stops when the battle ends, on `shutdown`, or once every
/// handle has been dropped. After that every call returns `RunnerError::Closed`.
#[derive(Clone, Debug)]
pub struct BattleHandle {
    battle_id: String,
    tx: mpsc::UnboundedSender<Command>,
}

impl BattleHandle {
    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RunnerError> {
        let (reply, response) = oneshot::channel();
        self.tx.send(build(reply)).map_err(|_| RunnerError::Closed)?;
        response.await.map_err(|_| RunnerError::Closed)
    }

    pub async fn submit(&self, action: PlayerAction) -> Result<ActionOutcome, RunnerError> {
        self.request(|reply| Command::Act { action, reply }).await
    }

    pub async fn execute_move(&self, move_index: usize) -> Result<ActionOutcome, RunnerError> {
        self.submit(PlayerAction::UseMove { move_index }).await
    }

    pub async fn execute_struggle(&self) -> Result<ActionOutcome, RunnerError> {
        self.submit(PlayerAction::Struggle).await
    }

    pub async fn switch_pokemon(&self, team_index: usize) -> Result<ActionOutcome, RunnerError> {
        self.submit(PlayerAction::SwitchPokemon { team_index }).await
    }

    /// Use an item from the current player's inventory, removing it.
    pub async fn use_inventory_item(&self, item_index: usize) -> Result<ActionOutcome, RunnerError> {
        self.submit(PlayerAction::UseItem { item_index }).await
    }

    /// Use an item supplied by the caller; the inventory is left alone.
    pub async fn use_item(&self, item: Item) -> Result<ActionOutcome, RunnerError> {
        self.request(|reply| Command::UseItem { item, reply }).await
    }

    pub async fn pause(&self) -> Result<bool, RunnerError> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume(&self) -> Result<bool, RunnerError> {
        self.request(|reply| Command::Resume { reply }).await
    }

    /// A copy of the current battle state, e.g. for saving.
    pub async fn snapshot(&self) -> Result<BattleState, RunnerError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Stop the battle task. The final state is returned from its `JoinHandle`.
    pub fn shutdown(&self) -> Result<(), RunnerError> {
        self.tx.send(Command::Shutdown).map_err(|_| RunnerError::Closed)
    }
}

/// Deadlines frozen by `pause`, as time left.
#[derive(Debug, Default)]
struct Suspended {
    ai_think: Option<Duration>,
    turn_end: Option<Duration>,
}

pub struct BattleRunner {
    state: BattleState,
    config: BattleConfig,
    chart: &'static TypeChart,
    observer: Box<dyn BattleObserver>,
    commands: mpsc::UnboundedReceiver<Command>,
    bus: EventBus,
    clock: Option<Interval>,
    ai_deadline: Option<Instant>,
    turn_end_deadline: Option<Instant>,
    suspended: Suspended,
}

impl BattleRunner {
    /// Start a battle from `Setup`, tossing a coin for the opening player.
    ///
    /// Every constructor fails with `ConfigError::TypeChartUninitialized` until
    /// a type chart has been installed.
    pub fn start(
        state: BattleState,
        config: BattleConfig,
        observer: Box<dyn BattleObserver>,
    ) -> ConfigResult<(BattleHandle, JoinHandle<BattleState>)> {
        Self::start_with_first_player(state, config, observer, engine::coin_toss())
    }

    /// Start a battle from `Setup` with a known opening player.
    pub fn start_with_first_player(
        state: BattleState,
        config: BattleConfig,
        observer: Box<dyn BattleObserver>,
        first_player: usize,
    ) -> ConfigResult<(BattleHandle, JoinHandle<BattleState>)> {
        let (handle, mut runner) = Self::new(state, config, observer)?;
        if engine::start_battle(&mut runner.state, &runner.config, first_player, &mut runner.bus) {
            runner.restart_turn_timers();
        } else {
            runner.revive_timers();
        }
        Ok((handle, tokio::spawn(runner.run())))
    }

    /// Continue a battle that was saved mid-game. The countdown resumes from
    /// the saved remaining time, and a pending AI decision or turn end is
    /// scheduled afresh. A snapshot still in `Setup` is started normally.
    pub fn restore(
        state: BattleState,
        config: BattleConfig,
        observer: Box<dyn BattleObserver>,
    ) -> ConfigResult<(BattleHandle, JoinHandle<BattleState>)> {
        if state.game_state == GameState::Setup {
            return Self::start(state, config, observer);
        }
        let (handle, mut runner) = Self::new(state, config, observer)?;
        info!(
            battle_id = %runner.state.battle_id,
            turn = runner.state.turn_number,
            remaining = runner.state.time_remaining,
            "battle restored"
        );
        runner.revive_timers();
        Ok((handle, tokio::spawn(runner.run())))
    }

    fn new(
        state: BattleState,
        config: BattleConfig,
        observer: Box<dyn BattleObserver>,
    ) -> ConfigResult<(BattleHandle, Self)> {
        let chart = type_chart()?;
        let (tx, commands) = mpsc::unbounded_channel();
        let handle = BattleHandle {
            battle_id: state.battle_id.clone(),
            tx,
        };
        let runner = Self {
            state,
            config,
            chart,
            observer,
            commands,
            bus: EventBus::new(),
            clock: None,
            ai_deadline: None,
            turn_end_deadline: None,
            suspended: Suspended::default(),
        };
        Ok((handle, runner))
    }

    async fn run(mut self) -> BattleState {
        self.flush();

        while !self.state.is_over {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                _ = next_tick(&mut self.clock) => self.on_tick(),
                _ = sleep_until(self.ai_deadline) => self.on_ai_deadline(),
                _ = sleep_until(self.turn_end_deadline) => self.on_turn_end(),
            }
            self.flush();
        }

        debug!(battle_id = %self.state.battle_id, over = self.state.is_over, "runner stopped");
        self.state
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Act { action, reply } => {
                let outcome = engine::screen_external_action(&self.state, &mut self.bus)
                    .unwrap_or_else(|| {
                        engine::apply_action(&mut self.state, self.chart, &action, &mut self.bus)
                    });
                self.after_action(outcome);
                let _ = reply.send(outcome);
            }
            Command::UseItem { item, reply } => {
                let outcome = engine::screen_external_action(&self.state, &mut self.bus)
                    .unwrap_or_else(|| engine::use_item(&mut self.state, &item, &mut self.bus));
                self.after_action(outcome);
                let _ = reply.send(outcome);
            }
            Command::Pause { reply } => {
                let paused = engine::pause(&mut self.state, &mut self.bus);
                if paused {
                    self.suspend_timers();
                }
                let _ = reply.send(paused);
            }
            Command::Resume { reply } => {
                let resumed = engine::resume(&mut self.state, &mut self.bus);
                if resumed {
                    self.resume_timers();
                }
                let _ = reply.send(resumed);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.state.clone());
            }
            // Handled by the loop.
            Command::Shutdown => {}
        }
    }

    fn on_tick(&mut self) {
        if engine::tick(&mut self.state, &mut self.bus) {
            self.begin_next_turn();
        }
    }

    fn on_ai_deadline(&mut self) {
        self.ai_deadline = None;
        let Some(action) = engine::decide_ai_action(&self.state, self.chart) else {
            return;
        };
        debug!(battle_id = %self.state.battle_id, ?action, "ai decided");
        let outcome = engine::apply_action(&mut self.state, self.chart, &action, &mut self.bus);
        self.after_action(outcome);
    }

    fn on_turn_end(&mut self) {
        self.turn_end_deadline = None;
        engine::end_turn(&mut self.state, &mut self.bus);
        self.begin_next_turn();
    }

    fn after_action(&mut self, outcome: ActionOutcome) {
        let ActionOutcome::Accepted(turn_end) = outcome else {
            return;
        };
        self.clock = None;
        self.ai_deadline = None;
        if self.state.is_over {
            return;
        }
        match turn_end {
            TurnEnd::Immediate => {
                engine::end_turn(&mut self.state, &mut self.bus);
                self.begin_next_turn();
            }
            TurnEnd::Delayed => {
                self.turn_end_deadline = Some(Instant::now() + self.config.turn_end_delay());
            }
        }
    }

    fn begin_next_turn(&mut self) {
        engine::begin_turn(&mut self.state, &self.config, &mut self.bus);
        self.restart_turn_timers();
    }

    /// Drop every timer from the previous turn and arm fresh ones.
    fn restart_turn_timers(&mut self) {
        self.turn_end_deadline = None;
        self.ai_deadline = None;
        self.clock = None;
        self.suspended = Suspended::default();
        if self.state.is_over {
            return;
        }
        self.clock = Some(self.new_clock());
        if self.state.current_player().is_ai() {
            self.ai_deadline = Some(Instant::now() + self.config.ai_think_delay());
        }
    }

    /// Rebuild timers for a state that did not just begin its turn.
    fn revive_timers(&mut self) {
        if self.state.is_over || self.state.game_state == GameState::Setup {
            return;
        }
        if self.state.paused {
            // Whatever was pending restarts from scratch on resume.
            self.suspended = Suspended {
                ai_think: (!self.state.action_taken && self.state.current_player().is_ai())
                    .then(|| self.config.ai_think_delay()),
                turn_end: self.state.action_taken.then(|| self.config.turn_end_delay()),
            };
            return;
        }
        if self.state.action_taken {
            self.turn_end_deadline = Some(Instant::now() + self.config.turn_end_delay());
            return;
        }
        self.clock = Some(self.new_clock());
        if self.state.current_player().is_ai() {
            self.ai_deadline = Some(Instant::now() + self.config.ai_think_delay());
        }
    }

    fn suspend_timers(&mut self) {
        let now = Instant::now();
        self.clock = None;
        self.suspended = Suspended {
            ai_think: self.ai_deadline.take().map(|d| d.saturating_duration_since(now)),
            turn_end: self
                .turn_end_deadline
                .take()
                .map(|d| d.saturating_duration_since(now)),
        };
    }

    fn resume_timers(&mut self) {
        let now = Instant::now();
        let suspended = std::mem::take(&mut self.suspended);
        self.ai_deadline = suspended.ai_think.map(|left| now + left);
        self.turn_end_deadline = suspended.turn_end.map(|left| now + left);
        if self.state.clock_running() {
            self.clock = Some(self.new_clock());
        }
    }

    fn new_clock(&self) -> Interval {
        let period = self.config.tick_interval();
        let mut clock = time::interval_at(Instant::now() + period, period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        clock
    }

    fn flush(&mut self) {
        if self.bus.is_empty() {
            return;
        }
        let events = self.bus.drain();
        notify(self.observer.as_mut(), &events, &self.state);
    }
}

async fn next_tick(clock: &mut Option<Interval>) {
    match clock {
        Some(clock) => {
            clock.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
