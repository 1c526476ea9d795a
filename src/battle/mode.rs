use crate::player::BattlePlayer;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Rule variants for a battle.
///
/// Both modes share faint handling and win detection. Survival differs only in
/// how teams are assembled (six Pokemon at level 100) and in conventionally
/// disallowing items; neither restriction is enforced by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum GameMode {
    #[default]
    Normal,
    Survival,
}

impl GameMode {
    /// Called after `player`'s active Pokemon faints. Sends out the next healthy
    /// team member, if any, and returns its index.
    pub fn handle_fainted(&self, player: &mut BattlePlayer) -> Option<usize> {
        match self {
            GameMode::Normal | GameMode::Survival => player.switch_to_next_available(),
        }
    }

    pub fn is_game_over(&self, players: &[BattlePlayer; 2]) -> bool {
        players.iter().any(BattlePlayer::all_fainted)
    }

    /// Index of the player who still has a healthy Pokemon while the other has
    /// none. `None` while both (or neither) can still fight.
    pub fn winner(&self, players: &[BattlePlayer; 2]) -> Option<usize> {
        match (players[0].all_fainted(), players[1].all_fainted()) {
            (false, true) => Some(0),
            (true, false) => Some(1),
            _ => None,
        }
    }

    /// Team size this mode requires, if it fixes one.
    pub fn roster_size(&self) -> Option<usize> {
        match self {
            GameMode::Normal => None,
            GameMode::Survival => Some(6),
        }
    }

    /// Level every Pokemon is set to at team assembly, if the mode fixes one.
    pub fn fixed_level(&self) -> Option<u8> {
        match self {
            GameMode::Normal => None,
            GameMode::Survival => Some(100),
        }
    }

    pub fn allows_items(&self) -> bool {
        matches!(self, GameMode::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::AiArchetype;
    use crate::player::PlayerType;
    use crate::pokemon::{PokemonInst, Stats};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::PokemonType;

    fn player(name: &str, hps: &[u16]) -> BattlePlayer {
        let team = hps
            .iter()
            .enumerate()
            .map(|(i, &hp)| {
                let mut pokemon = PokemonInst::new(
                    format!("{}-{}", name, i),
                    PokemonType::Normal,
                    None,
                    Stats::new(100, 50, 50, 50, 50, 50),
                );
                pokemon.set_hp(hp);
                pokemon
            })
            .collect();
        BattlePlayer::new(
            name,
            PlayerType::Ai {
                archetype: AiArchetype::Aggressive,
            },
            team,
            vec![],
        )
        .unwrap()
    }

    #[rstest]
    #[case(GameMode::Normal)]
    #[case(GameMode::Survival)]
    fn test_handle_fainted_sends_out_next(#[case] mode: GameMode) {
        let mut p = player("B", &[0, 0, 40]);
        assert_eq!(mode.handle_fainted(&mut p), Some(2));
        assert_eq!(p.active_pokemon_index(), 2);
    }

    #[test]
    fn test_handle_fainted_with_nothing_left() {
        let mut p = player("B", &[0]);
        assert_eq!(GameMode::Normal.handle_fainted(&mut p), None);
        assert_eq!(p.active_pokemon_index(), 0);
    }

    #[rstest]
    #[case(&[100], &[100], false, None)]
    #[case(&[100], &[0], true, Some(0))]
    #[case(&[0, 0], &[0, 5], true, Some(1))]
    #[case(&[0], &[0], true, None)]
    fn test_game_over_and_winner(
        #[case] a: &[u16],
        #[case] b: &[u16],
        #[case] over: bool,
        #[case] winner: Option<usize>,
    ) {
        let players = [player("A", a), player("B", b)];
        for mode in [GameMode::Normal, GameMode::Survival] {
            assert_eq!(mode.is_game_over(&players), over);
            assert_eq!(mode.winner(&players), winner);
        }
    }

    #[test]
    fn test_survival_setup_constraints() {
        assert_eq!(GameMode::Survival.roster_size(), Some(6));
        assert_eq!(GameMode::Survival.fixed_level(), Some(100));
        assert!(!GameMode::Survival.allows_items());

        assert_eq!(GameMode::Normal.roster_size(), None);
        assert_eq!(GameMode::Normal.fixed_level(), None);
        assert!(GameMode::Normal.allows_items());
    }

    #[test]
    fn test_parse_mode_name() {
        assert_eq!("survival".parse::<GameMode>(), Ok(GameMode::Survival));
        assert_eq!(GameMode::Normal.to_string(), "Normal");
    }
}
