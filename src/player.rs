use crate::battle::ai::AiArchetype;
use crate::errors::{ConfigError, ConfigResult};
use crate::items::Item;
use crate::pokemon::PokemonInst;
use crate::type_chart::TypeChart;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active Pokémon's move list.
    UseMove { move_index: usize },

    // The index refers to the item's position in the player's inventory.
    UseItem { item_index: usize },

    // The index refers to the Pokémon's position in the player's team.
    SwitchPokemon { team_index: usize },

    // Only valid once every move of the active Pokémon is out of PP.
    Struggle,
}

/// Who controls a player: a person (shown in their chosen colour) or an AI archetype.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PlayerType {
    Human { color: String },
    Ai { archetype: AiArchetype },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattlePlayer {
    pub player_name: String,
    pub player_type: PlayerType,

    // Never empty once constructed.
    team: Vec<PokemonInst>,

    pub inventory: Vec<Item>,

    // Always a valid index into `team`.
    active_pokemon_index: usize,
}

impl BattlePlayer {
    /// Create a new BattlePlayer. The team must contain at least one Pokemon.
    pub fn new(
        player_name: impl Into<String>,
        player_type: PlayerType,
        team: Vec<PokemonInst>,
        inventory: Vec<Item>,
    ) -> ConfigResult<Self> {
        let player_name = player_name.into();
        if team.is_empty() {
            return Err(ConfigError::EmptyRoster {
                player: player_name,
            });
        }

        Ok(BattlePlayer {
            player_name,
            player_type,
            team,
            inventory,
            active_pokemon_index: 0,
        })
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.player_type, PlayerType::Ai { .. })
    }

    pub fn ai_archetype(&self) -> Option<AiArchetype> {
        match &self.player_type {
            PlayerType::Ai { archetype } => Some(*archetype),
            PlayerType::Human { .. } => None,
        }
    }

    pub fn team(&self) -> &[PokemonInst] {
        &self.team
    }

    pub fn team_mut(&mut self) -> &mut [PokemonInst] {
        &mut self.team
    }

    pub fn active_pokemon_index(&self) -> usize {
        self.active_pokemon_index
    }

    /// Get the currently active Pokemon
    pub fn active_pokemon(&self) -> &PokemonInst {
        &self.team[self.active_pokemon_index]
    }

    /// Get the currently active Pokemon mutably
    pub fn active_pokemon_mut(&mut self) -> &mut PokemonInst {
        &mut self.team[self.active_pokemon_index]
    }

    /// Make `index` the active Pokemon. Out-of-range indices are ignored.
    pub fn set_active_index(&mut self, index: usize) {
        if index < self.team.len() {
            self.active_pokemon_index = index;
        }
    }

    /// True if `index` names a healthy Pokemon other than the active one.
    pub fn can_switch_to(&self, index: usize) -> bool {
        index != self.active_pokemon_index
            && self.team.get(index).is_some_and(|p| !p.is_fainted())
    }

    /// Every team index that `can_switch_to` accepts, in team order.
    pub fn valid_switches(&self) -> Vec<usize> {
        (0..self.team.len())
            .filter(|&index| self.can_switch_to(index))
            .collect()
    }

    /// Switch the active Pokemon. Returns false (and changes nothing) if the
    /// target is out of range, fainted, or already active.
    pub fn switch_pokemon(&mut self, new_index: usize) -> bool {
        if !self.can_switch_to(new_index) {
            return false;
        }
        self.active_pokemon_index = new_index;
        true
    }

    /// Send out the first healthy Pokemon after the active one, wrapping
    /// around. Leaves the active index alone if every Pokemon has fainted.
    pub fn switch_to_next_available(&mut self) -> Option<usize> {
        let len = self.team.len();
        let next = (1..=len)
            .map(|offset| (self.active_pokemon_index + offset) % len)
            .find(|&index| !self.team[index].is_fainted())?;
        self.active_pokemon_index = next;
        Some(next)
    }

    pub fn all_fainted(&self) -> bool {
        self.team.iter().all(PokemonInst::is_fainted)
    }

    pub fn fainted_count(&self) -> usize {
        self.team.iter().filter(|p| p.is_fainted()).count()
    }

    /// Remove an item from the inventory so it can be used.
    pub fn take_item(&mut self, item_index: usize) -> Option<Item> {
        if item_index < self.inventory.len() {
            Some(self.inventory.remove(item_index))
        } else {
            None
        }
    }

    /// Check the invariants `new` establishes. Deserialized players bypass
    /// `new`, so snapshots are validated with this.
    pub fn validate(&self) -> Result<(), String> {
        if self.team.is_empty() {
            return Err(format!("player '{}' has an empty team", self.player_name));
        }
        if self.active_pokemon_index >= self.team.len() {
            return Err(format!(
                "player '{}' has active index {} but only {} Pokemon",
                self.player_name,
                self.active_pokemon_index,
                self.team.len()
            ));
        }
        for pokemon in &self.team {
            pokemon.validate()?;
        }
        Ok(())
    }

    /// Let an AI player pick its action against `opponent`. Human players
    /// always return `None`; their commands arrive from outside.
    pub fn decide(&self, chart: &TypeChart, opponent: &BattlePlayer) -> Option<PlayerAction> {
        let archetype = self.ai_archetype()?;
        Some(archetype.behavior().decide_action(chart, self, opponent.active_pokemon()))
    }
}

impl fmt::Display for BattlePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_pokemon();
        write!(
            f,
            "{}: {} ({}/{} fainted)",
            self.player_name,
            active,
            self.fainted_count(),
            self.team.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::Stats;
    use pretty_assertions::assert_eq;
    use schema::PokemonType;

    fn mon(name: &str) -> PokemonInst {
        PokemonInst::new(name, PokemonType::Normal, None, Stats::new(100, 50, 50, 50, 50, 50))
    }

    fn fainted(name: &str) -> PokemonInst {
        let mut pokemon = mon(name);
        pokemon.take_damage(u16::MAX);
        pokemon
    }

    fn human(team: Vec<PokemonInst>) -> BattlePlayer {
        BattlePlayer::new(
            "Red",
            PlayerType::Human {
                color: "red".to_string(),
            },
            team,
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_team_is_rejected() {
        let result = BattlePlayer::new(
            "Nobody",
            PlayerType::Ai {
                archetype: AiArchetype::Aggressive,
            },
            vec![],
            vec![],
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigError::EmptyRoster {
                player: "Nobody".to_string()
            }
        );
    }

    #[test]
    fn test_switch_to_next_available_wraps_around() {
        let mut player = human(vec![mon("A"), fainted("B"), mon("C"), mon("D")]);
        player.set_active_index(3);
        player.active_pokemon_mut().take_damage(u16::MAX);

        assert_eq!(player.switch_to_next_available(), Some(0));
        assert_eq!(player.active_pokemon().name, "A");

        assert_eq!(player.switch_to_next_available(), Some(2));
        assert_eq!(player.active_pokemon().name, "C");
    }

    #[test]
    fn test_switch_to_next_available_with_everyone_fainted() {
        let mut player = human(vec![fainted("A"), fainted("B")]);
        player.set_active_index(1);
        assert_eq!(player.switch_to_next_available(), None);
        assert_eq!(player.active_pokemon_index(), 1);
        assert!(player.all_fainted());
    }

    #[test]
    fn test_set_active_index_ignores_out_of_range() {
        let mut player = human(vec![mon("A"), mon("B")]);
        player.set_active_index(5);
        assert_eq!(player.active_pokemon_index(), 0);
        player.set_active_index(1);
        assert_eq!(player.active_pokemon_index(), 1);
    }

    #[test]
    fn test_switch_rules() {
        let mut player = human(vec![mon("A"), fainted("B"), mon("C")]);

        assert!(!player.switch_pokemon(0), "already active");
        assert!(!player.switch_pokemon(1), "fainted");
        assert!(!player.switch_pokemon(7), "out of range");
        assert_eq!(player.active_pokemon_index(), 0);

        assert_eq!(player.valid_switches(), vec![2]);
        assert!(player.switch_pokemon(2));
        assert_eq!(player.active_pokemon_index(), 2);
    }

    #[test]
    fn test_take_item() {
        let mut player = human(vec![mon("A")]);
        player.inventory = vec![Item::potion(), Item::revive()];

        assert_eq!(player.take_item(1), Some(Item::revive()));
        assert_eq!(player.take_item(1), None);
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_humans_do_not_decide() {
        let player = human(vec![mon("A")]);
        let opponent = human(vec![mon("B")]);
        assert_eq!(player.decide(&TypeChart::builtin(), &opponent), None);
    }
}
