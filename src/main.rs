use pokemon_arena::teams::{random_team, MAX_TEAM_SIZE};
use pokemon_arena::{
    initialize_type_chart, AiArchetype, ArenaResult, BattleConfig, BattlePlayer, BattleRunner,
    BattleState, GameMode, PlayerType, PrintObserver,
};
use std::path::Path;
use tracing::{error, info, warn};

/// Two random AI teams fight it out with the bundled timings.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    if let Err(e) = run().await {
        error!(error = %e, "battle failed");
        std::process::exit(1);
    }
}

async fn run() -> ArenaResult<()> {
    let data_path = Path::new("data");

    initialize_type_chart(&data_path.join("type_chart.csv"))?;
    let config = BattleConfig::load(&data_path.join("battle_config.ron")).unwrap_or_else(|e| {
        warn!(error = %e, "using default battle timings");
        BattleConfig::default()
    });

    let mode = GameMode::Normal;
    let mut rng = rand::rng();
    let red = BattlePlayer::new(
        "Red",
        PlayerType::Ai {
            archetype: AiArchetype::Aggressive,
        },
        random_team(3, mode, &mut rng)?,
        vec![],
    )?;
    let blue = BattlePlayer::new(
        "Blue",
        PlayerType::Ai {
            archetype: AiArchetype::Expert,
        },
        random_team(MAX_TEAM_SIZE / 2, mode, &mut rng)?,
        vec![],
    )?;

    for player in [&red, &blue] {
        println!("{}'s team:", player.player_name);
        for pokemon in player.team() {
            println!("  {:#}", pokemon);
        }
    }
    println!();

    let state = BattleState::new("demo", red, blue, mode);
    let (handle, join) = BattleRunner::start(state, config, Box::new(PrintObserver))?;
    info!(battle_id = handle.battle_id(), "battle started");

    match join.await {
        Ok(final_state) => {
            info!(
                turns = final_state.turn_number,
                over = final_state.is_over,
                "battle finished"
            );
        }
        Err(e) => error!(error = %e, "battle task panicked"),
    }
    Ok(())
}
