#[cfg(test)]
mod tests {
    use crate::battle::engine;
    use crate::battle::state::{ActionOutcome, BattleEvent, RejectReason, TurnEnd};
    use crate::battle::tests::common::{chart, create_test_player, plain_pokemon, started_battle};
    use crate::moves::Move;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::PokemonType;

    fn switching_battle() -> (crate::battle::state::BattleState, crate::battle::state::EventBus) {
        let lead = plain_pokemon("Lead", PokemonType::Fire, &[Move::Ember]);
        let mut down = plain_pokemon("Down", PokemonType::Water, &[Move::Tackle]);
        down.set_hp(0);
        let bench = plain_pokemon("Bench", PokemonType::Grass, &[Move::VineWhip]);
        started_battle(
            create_test_player("A", vec![lead, down, bench], vec![]),
            create_test_player("B", vec![plain_pokemon("Foe", PokemonType::Normal, &[Move::Tackle])], vec![]),
        )
    }

    #[rstest]
    #[case::active(0, false)]
    #[case::fainted(1, false)]
    #[case::healthy(2, true)]
    #[case::out_of_range(5, false)]
    fn test_switch_validity(#[case] team_index: usize, #[case] allowed: bool) {
        let (mut state, mut bus) = switching_battle();
        let outcome = engine::switch_pokemon(&mut state, team_index, &mut bus);

        if allowed {
            assert_eq!(outcome, ActionOutcome::Accepted(TurnEnd::Immediate));
            assert_eq!(state.players[0].active_pokemon_index(), team_index);
            assert!(state.action_taken);
        } else {
            assert_eq!(outcome, ActionOutcome::Rejected(RejectReason::InvalidSwitch));
            assert_eq!(state.players[0].active_pokemon_index(), 0);
            assert!(!state.action_taken);
        }
        assert!(!state.is_over);
    }

    #[test]
    fn test_switch_reports_both_names() {
        let (mut state, mut bus) = switching_battle();
        engine::switch_pokemon(&mut state, 2, &mut bus);
        assert!(bus.events().contains(&BattleEvent::PokemonSwitched {
            player_index: 0,
            old_pokemon: "Lead".to_string(),
            new_pokemon: "Bench".to_string(),
        }));

        // The switched-in Pokemon is the one that attacks next turn.
        engine::end_turn(&mut state, &mut bus);
        engine::begin_turn(&mut state, &Default::default(), &mut bus);
        engine::execute_move(&mut state, chart(), 0, &mut bus);
        engine::end_turn(&mut state, &mut bus);
        engine::begin_turn(&mut state, &Default::default(), &mut bus);
        engine::execute_move(&mut state, chart(), 0, &mut bus);
        assert!(bus.events().contains(&BattleEvent::MoveUsed {
            player_index: 0,
            pokemon: "Bench".to_string(),
            move_used: Move::VineWhip,
        }));
    }

    #[test]
    fn test_no_valid_switch_with_whole_team_fainted_loses() {
        let (mut state, mut bus) = switching_battle();
        for pokemon in state.players[0].team_mut() {
            pokemon.set_hp(0);
        }

        let outcome = engine::switch_pokemon(&mut state, 99, &mut bus);

        assert_eq!(outcome, ActionOutcome::Accepted(TurnEnd::Immediate));
        assert!(state.is_over);
        assert_eq!(
            bus.events().last(),
            Some(&BattleEvent::BattleEnded { winner: Some(1) })
        );
    }

    #[test]
    fn test_switch_after_acting_is_rejected() {
        let (mut state, mut bus) = switching_battle();
        engine::execute_move(&mut state, chart(), 0, &mut bus);
        assert_eq!(
            engine::switch_pokemon(&mut state, 2, &mut bus),
            ActionOutcome::Rejected(RejectReason::ActionAlreadyTaken)
        );
        assert_eq!(state.players[0].active_pokemon().name, "Lead");
    }
}
