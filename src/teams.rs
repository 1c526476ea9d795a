use crate::battle::mode::GameMode;
use crate::errors::{ConfigError, ConfigResult};
use crate::items::starter_inventory;
use crate::player::{BattlePlayer, PlayerType};
use crate::pokemon::PokemonInst;
use crate::species::Species;
use rand::seq::IndexedRandom;
use rand::Rng;
use strum::IntoEnumIterator;
use tracing::debug;

pub const MAX_TEAM_SIZE: usize = 6;

/// Build a team for `mode` from a list of species.
///
/// Normal battles take 1 to 6 Pokemon at level 50. Survival battles need
/// exactly the mode's roster size, and every Pokemon is raised to its level.
pub fn assemble_team(species: &[Species], mode: GameMode) -> ConfigResult<Vec<PokemonInst>> {
    match mode.roster_size() {
        Some(required) if species.len() != required => {
            return Err(ConfigError::TeamSize {
                expected: required,
                actual: species.len(),
            });
        }
        None if species.is_empty() => {
            return Err(ConfigError::TeamSize {
                expected: 1,
                actual: 0,
            });
        }
        None if species.len() > MAX_TEAM_SIZE => {
            return Err(ConfigError::TeamSize {
                expected: MAX_TEAM_SIZE,
                actual: species.len(),
            });
        }
        _ => {}
    }

    let team = species
        .iter()
        .map(|species| {
            let mut pokemon = species.create();
            if let Some(level) = mode.fixed_level() {
                pokemon.set_level(level);
            }
            pokemon
        })
        .collect();
    Ok(team)
}

/// Like `assemble_team`, but looks species up by name.
pub fn assemble_team_by_name(names: &[&str], mode: GameMode) -> ConfigResult<Vec<PokemonInst>> {
    let species = names
        .iter()
        .map(|name| {
            name.parse::<Species>()
                .map_err(|_| ConfigError::UnknownSpecies(name.to_string()))
        })
        .collect::<ConfigResult<Vec<_>>>()?;
    assemble_team(&species, mode)
}

/// A team of `size` distinct species picked at random. Survival ignores
/// `size` and uses its fixed roster size.
pub fn random_team<R: Rng + ?Sized>(
    size: usize,
    mode: GameMode,
    rng: &mut R,
) -> ConfigResult<Vec<PokemonInst>> {
    let size = mode.roster_size().unwrap_or(size);
    let all: Vec<Species> = Species::iter().collect();
    let picked: Vec<Species> = all.choose_multiple(rng, size).copied().collect();
    debug!(?picked, %mode, "random team");
    assemble_team(&picked, mode)
}

/// A player ready for battle. Items are only handed out when the mode allows them.
pub fn create_player(
    name: &str,
    player_type: PlayerType,
    species: &[Species],
    mode: GameMode,
) -> ConfigResult<BattlePlayer> {
    let team = assemble_team(species, mode)?;
    let inventory = if mode.allows_items() {
        starter_inventory()
    } else {
        Vec::new()
    };
    BattlePlayer::new(name, player_type, team, inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::AiArchetype;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_normal_team_stays_at_base_level() {
        let team = assemble_team(&[Species::Pikachu, Species::Squirtle], GameMode::Normal).unwrap();
        assert_eq!(team.len(), 2);
        assert!(team.iter().all(|p| p.level == 50));
        assert_eq!(team[0].max_hp(), 95);
    }

    #[test]
    fn test_survival_team_is_six_at_level_100() {
        let species = [
            Species::Pikachu,
            Species::Squirtle,
            Species::Charmander,
            Species::Bulbasaur,
            Species::Snorlax,
            Species::Gastly,
        ];
        let team = assemble_team(&species, GameMode::Survival).unwrap();
        assert_eq!(team.len(), 6);
        assert!(team.iter().all(|p| p.level == 100));
        assert_eq!(team[0].max_hp(), 190);
        assert_eq!(team[0].current_hp(), 190);
    }

    #[rstest]
    #[case(GameMode::Normal, 0, 1)]
    #[case(GameMode::Normal, 7, 6)]
    #[case(GameMode::Survival, 3, 6)]
    fn test_team_size_errors(#[case] mode: GameMode, #[case] size: usize, #[case] expected: usize) {
        let species = vec![Species::Pidgey; size];
        assert_eq!(
            assemble_team(&species, mode),
            Err(ConfigError::TeamSize {
                expected,
                actual: size
            })
        );
    }

    #[test]
    fn test_unknown_species_name() {
        assert_eq!(
            assemble_team_by_name(&["pikachu", "Missingno"], GameMode::Normal),
            Err(ConfigError::UnknownSpecies("Missingno".to_string()))
        );
        let team = assemble_team_by_name(&["pikachu", "ONIX"], GameMode::Normal);
        assert!(team.is_err());
    }

    #[test]
    fn test_random_team_has_distinct_species() {
        let mut rng = rand::rng();
        let team = random_team(4, GameMode::Normal, &mut rng).unwrap();
        assert_eq!(team.len(), 4);
        let mut names: Vec<&str> = team.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);

        let survival = random_team(2, GameMode::Survival, &mut rng).unwrap();
        assert_eq!(survival.len(), 6);
    }

    #[test]
    fn test_survival_players_get_no_items() {
        let species = [Species::Abra; 6];
        let ai = PlayerType::Ai {
            archetype: AiArchetype::Expert,
        };
        let survival = create_player("Cpu", ai.clone(), &species, GameMode::Survival).unwrap();
        assert!(survival.inventory.is_empty());

        let normal = create_player("Cpu", ai, &species[..3], GameMode::Normal).unwrap();
        assert_eq!(normal.inventory, starter_inventory());
    }
}
