//! A module for defining AI behaviors for battle opponents.

use crate::player::{BattlePlayer, PlayerAction};
use crate::pokemon::PokemonInst;
use crate::type_chart::TypeChart;
use ordered_float::OrderedFloat;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use strum::{Display, EnumIter, EnumString};

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Index of the move to use, or `None` if the policy has no valid move.
    fn select_move(&self, active: &PokemonInst) -> Option<usize>;

    /// Index of the team member to switch to, or `None` to stay in.
    fn select_switch(
        &self,
        chart: &TypeChart,
        team: &[PokemonInst],
        active_index: usize,
        opponent: &PokemonInst,
    ) -> Option<usize>;

    /// Switch first if the policy wants to; otherwise attack. Falls back to the
    /// first move with PP, then to Struggle, when the policy has no move.
    fn decide_action(
        &self,
        chart: &TypeChart,
        player: &BattlePlayer,
        opponent: &PokemonInst,
    ) -> PlayerAction {
        let active_index = player.active_pokemon_index();
        if let Some(team_index) = self.select_switch(chart, player.team(), active_index, opponent) {
            if player.can_switch_to(team_index) {
                return PlayerAction::SwitchPokemon { team_index };
            }
        }

        let active = player.active_pokemon();
        let chosen = self
            .select_move(active)
            .filter(|&index| active.moves.get(index).is_some_and(|m| m.has_pp()))
            .or_else(|| first_move_where(active, |_| true));

        match chosen {
            Some(move_index) => PlayerAction::UseMove { move_index },
            None => PlayerAction::Struggle,
        }
    }
}

/// The selectable AI personalities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum AiArchetype {
    Defensive,
    Aggressive,
    SwitchPrioritizing,
    Expert,
}

impl AiArchetype {
    pub fn behavior(self) -> &'static dyn Behavior {
        match self {
            AiArchetype::Defensive => &DefensiveAI,
            AiArchetype::Aggressive => &AggressiveAI,
            AiArchetype::SwitchPrioritizing => &SwitchingAI,
            AiArchetype::Expert => &ExpertAI,
        }
    }
}

/// Prefers the first Status move; otherwise picks any usable move at random.
pub struct DefensiveAI;

/// Goes for big hits and never switches out.
pub struct AggressiveAI;

/// Always looks for a better type matchup on the bench.
pub struct SwitchingAI;

/// Combines HP-aware move choice with selective switching.
pub struct ExpertAI;

impl Behavior for DefensiveAI {
    fn select_move(&self, active: &PokemonInst) -> Option<usize> {
        first_move_where(active, |m| !m.data().is_offensive())
            .or_else(|| random_usable_move(active))
    }

    fn select_switch(
        &self,
        _: &TypeChart,
        _: &[PokemonInst],
        _: usize,
        _: &PokemonInst,
    ) -> Option<usize> {
        None
    }
}

impl Behavior for AggressiveAI {
    fn select_move(&self, active: &PokemonInst) -> Option<usize> {
        first_move_where(active, |m| m.power() >= 70)
            .or_else(|| first_move_where(active, |m| m.data().is_offensive()))
            .or_else(|| random_usable_move(active))
    }

    fn select_switch(
        &self,
        _: &TypeChart,
        _: &[PokemonInst],
        _: usize,
        _: &PokemonInst,
    ) -> Option<usize> {
        None
    }
}

impl Behavior for SwitchingAI {
    /// Never picks a move itself; `decide_action` only attacks when no switch exists.
    fn select_move(&self, _active: &PokemonInst) -> Option<usize> {
        None
    }

    fn select_switch(
        &self,
        chart: &TypeChart,
        team: &[PokemonInst],
        active_index: usize,
        opponent: &PokemonInst,
    ) -> Option<usize> {
        let candidates = bench(team, active_index);
        best_matchup(chart, team, &candidates, opponent, 0.0).or_else(|| candidates.first().copied())
    }
}

impl Behavior for ExpertAI {
    fn select_move(&self, active: &PokemonInst) -> Option<usize> {
        let defensive = if active.hp_fraction() < 0.3 {
            first_move_where(active, |m| !m.data().is_offensive())
        } else {
            None
        };

        defensive
            .or_else(|| first_move_where(active, |m| m.power() >= 80))
            .or_else(|| first_move_where(active, |m| m.data().is_offensive()))
            .or_else(|| first_move_where(active, |_| true))
    }

    fn select_switch(
        &self,
        chart: &TypeChart,
        team: &[PokemonInst],
        active_index: usize,
        opponent: &PokemonInst,
    ) -> Option<usize> {
        let active = team.get(active_index)?;
        let candidates = bench(team, active_index);

        if active.hp_fraction() < 0.2 {
            // Retreat to the bulkiest healthy teammate.
            return candidates.iter().copied().min_by_key(|&index| {
                let stats = &team[index].curr_stats;
                Reverse(stats.defense as u32 + stats.sp_defense as u32)
            });
        }

        best_matchup(chart, team, &candidates, opponent, 1.0)
    }
}

/// Product of the candidate's types attacking each of the opponent's types.
pub fn matchup_score(chart: &TypeChart, candidate: &PokemonInst, opponent: &PokemonInst) -> f64 {
    let (primary, secondary) = candidate.types();
    std::iter::once(primary)
        .chain(secondary)
        .map(|attacking| {
            chart.effectiveness_against(attacking, opponent.primary_type, opponent.secondary_type)
        })
        .product()
}

/// Healthy team members other than the active one, in team order.
fn bench(team: &[PokemonInst], active_index: usize) -> Vec<usize> {
    team.iter()
        .enumerate()
        .filter(|(index, pokemon)| *index != active_index && !pokemon.is_fainted())
        .map(|(index, _)| index)
        .collect()
}

/// The candidate with the best matchup strictly above `threshold`. Ties go to
/// the earliest team slot.
fn best_matchup(
    chart: &TypeChart,
    team: &[PokemonInst],
    candidates: &[usize],
    opponent: &PokemonInst,
    threshold: f64,
) -> Option<usize> {
    candidates
        .iter()
        .map(|&index| (index, matchup_score(chart, &team[index], opponent)))
        .filter(|(_, score)| *score > threshold)
        .min_by_key(|(_, score)| Reverse(OrderedFloat(*score)))
        .map(|(index, _)| index)
}

fn first_move_where(
    active: &PokemonInst,
    predicate: impl Fn(crate::moves::Move) -> bool,
) -> Option<usize> {
    active
        .moves
        .iter()
        .position(|m| m.has_pp() && predicate(m.move_))
}

fn random_usable_move(active: &PokemonInst) -> Option<usize> {
    let usable: Vec<usize> = active
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| m.has_pp())
        .map(|(index, _)| index)
        .collect();
    usable.choose(&mut rand::rng()).copied()
}
