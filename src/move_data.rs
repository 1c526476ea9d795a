//! Immutable move definitions and the by-type registry.

use crate::moves::Move;
use schema::{MoveCategory, PokemonType};
use std::collections::HashMap;
use std::sync::LazyLock;
use strum::IntoEnumIterator;

/// Registry of learnable moves grouped by elemental type, built on first use.
static MOVES_BY_TYPE: LazyLock<HashMap<PokemonType, Vec<Move>>> = LazyLock::new(|| {
    let mut map: HashMap<PokemonType, Vec<Move>> = HashMap::new();
    for move_ in Move::iter().filter(|m| *m != Move::Struggle) {
        map.entry(move_.move_type()).or_default().push(move_);
    }
    map
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    /// Zero for Status moves.
    pub power: u16,
    pub category: MoveCategory,
    pub move_type: PokemonType,
    /// Percentage in 0..=100.
    pub accuracy: u8,
    pub max_pp: u8,
    /// Reserved ordering hint. Turns resolve one action at a time, so the
    /// engine carries this value without consulting it.
    pub priority: i8,
}

impl MoveData {
    const fn new(
        name: &'static str,
        move_type: PokemonType,
        category: MoveCategory,
        power: u16,
        accuracy: u8,
        max_pp: u8,
    ) -> Self {
        Self {
            name,
            power,
            category,
            move_type,
            accuracy,
            max_pp,
            priority: 0,
        }
    }

    const fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_offensive(&self) -> bool {
        self.category.is_offensive()
    }
}

/// Get the static definition of a move.
pub fn get_move_data(move_: Move) -> MoveData {
    use MoveCategory::{Physical, Special, Status};
    use PokemonType::*;

    match move_ {
        // Normal
        Move::Tackle => MoveData::new("Tackle", Normal, Physical, 40, 100, 35),
        Move::Scratch => MoveData::new("Scratch", Normal, Physical, 40, 100, 35),
        Move::QuickAttack => {
            MoveData::new("Quick Attack", Normal, Physical, 40, 100, 30).with_priority(1)
        }
        Move::Slash => MoveData::new("Slash", Normal, Physical, 70, 100, 20),
        Move::BodySlam => MoveData::new("Body Slam", Normal, Physical, 85, 100, 15),
        Move::DoubleEdge => MoveData::new("Double-Edge", Normal, Physical, 120, 100, 15),
        Move::HyperBeam => MoveData::new("Hyper Beam", Normal, Special, 150, 90, 5),
        Move::Growl => MoveData::new("Growl", Normal, Status, 0, 100, 40),
        Move::Harden => MoveData::new("Harden", Normal, Status, 0, 100, 30),
        Move::Recover => MoveData::new("Recover", Normal, Status, 0, 100, 10),
        Move::Protect => MoveData::new("Protect", Normal, Status, 0, 100, 10).with_priority(4),

        // Fire
        Move::Ember => MoveData::new("Ember", Fire, Special, 40, 100, 25),
        Move::FirePunch => MoveData::new("Fire Punch", Fire, Physical, 75, 100, 15),
        Move::Flamethrower => MoveData::new("Flamethrower", Fire, Special, 90, 100, 15),
        Move::FireBlast => MoveData::new("Fire Blast", Fire, Special, 110, 85, 5),
        Move::WillOWisp => MoveData::new("Will-O-Wisp", Fire, Status, 0, 85, 15),

        // Water
        Move::WaterGun => MoveData::new("Water Gun", Water, Special, 40, 100, 25),
        Move::Waterfall => MoveData::new("Waterfall", Water, Physical, 80, 100, 15),
        Move::Surf => MoveData::new("Surf", Water, Special, 90, 100, 15),
        Move::HydroPump => MoveData::new("Hydro Pump", Water, Special, 110, 80, 5),
        Move::Withdraw => MoveData::new("Withdraw", Water, Status, 0, 100, 40),

        // Electric
        Move::ThunderShock => MoveData::new("Thunder Shock", Electric, Special, 40, 100, 30),
        Move::ThunderPunch => MoveData::new("Thunder Punch", Electric, Physical, 75, 100, 15),
        Move::Thunderbolt => MoveData::new("Thunderbolt", Electric, Special, 90, 100, 15),
        Move::Thunder => MoveData::new("Thunder", Electric, Special, 110, 70, 10),
        Move::ThunderWave => MoveData::new("Thunder Wave", Electric, Status, 0, 90, 20),

        // Grass
        Move::VineWhip => MoveData::new("Vine Whip", Grass, Physical, 45, 100, 25),
        Move::RazorLeaf => MoveData::new("Razor Leaf", Grass, Physical, 55, 95, 25),
        Move::GigaDrain => MoveData::new("Giga Drain", Grass, Special, 75, 100, 10),
        Move::SolarBeam => MoveData::new("Solar Beam", Grass, Special, 120, 100, 10),
        Move::Synthesis => MoveData::new("Synthesis", Grass, Status, 0, 100, 5),

        // Ice
        Move::IcePunch => MoveData::new("Ice Punch", Ice, Physical, 75, 100, 15),
        Move::IceBeam => MoveData::new("Ice Beam", Ice, Special, 90, 100, 10),
        Move::Blizzard => MoveData::new("Blizzard", Ice, Special, 110, 70, 5),

        // Fighting
        Move::KarateChop => MoveData::new("Karate Chop", Fighting, Physical, 50, 100, 25),
        Move::CloseCombat => MoveData::new("Close Combat", Fighting, Physical, 120, 100, 5),
        Move::BulkUp => MoveData::new("Bulk Up", Fighting, Status, 0, 100, 20),

        // Poison
        Move::PoisonSting => MoveData::new("Poison Sting", Poison, Physical, 15, 100, 35),
        Move::SludgeBomb => MoveData::new("Sludge Bomb", Poison, Special, 90, 100, 10),
        Move::Toxic => MoveData::new("Toxic", Poison, Status, 0, 90, 10),

        // Ground
        Move::MudSlap => MoveData::new("Mud-Slap", Ground, Special, 20, 100, 10),
        Move::Dig => MoveData::new("Dig", Ground, Physical, 80, 100, 10),
        Move::Earthquake => MoveData::new("Earthquake", Ground, Physical, 100, 100, 10),

        // Flying
        Move::Gust => MoveData::new("Gust", Flying, Special, 40, 100, 35),
        Move::WingAttack => MoveData::new("Wing Attack", Flying, Physical, 60, 100, 35),
        Move::AirSlash => MoveData::new("Air Slash", Flying, Special, 75, 95, 15),

        // Psychic
        Move::Confusion => MoveData::new("Confusion", Psychic, Special, 50, 100, 25),
        Move::Psychic => MoveData::new("Psychic", Psychic, Special, 90, 100, 10),
        Move::Reflect => MoveData::new("Reflect", Psychic, Status, 0, 100, 20),
        Move::LightScreen => MoveData::new("Light Screen", Psychic, Status, 0, 100, 30),

        // Bug
        Move::BugBite => MoveData::new("Bug Bite", Bug, Physical, 60, 100, 20),
        Move::XScissor => MoveData::new("X-Scissor", Bug, Physical, 80, 100, 15),

        // Rock
        Move::RockThrow => MoveData::new("Rock Throw", Rock, Physical, 50, 90, 15),
        Move::RockSlide => MoveData::new("Rock Slide", Rock, Physical, 75, 90, 10),
        Move::StoneEdge => MoveData::new("Stone Edge", Rock, Physical, 100, 80, 5),

        // Ghost
        Move::Lick => MoveData::new("Lick", Ghost, Physical, 30, 100, 30),
        Move::ShadowBall => MoveData::new("Shadow Ball", Ghost, Special, 80, 100, 15),

        // Dragon
        Move::DragonClaw => MoveData::new("Dragon Claw", Dragon, Physical, 80, 100, 15),
        Move::DragonPulse => MoveData::new("Dragon Pulse", Dragon, Special, 85, 100, 10),
        Move::Outrage => MoveData::new("Outrage", Dragon, Physical, 120, 100, 10),

        // Dark
        Move::Bite => MoveData::new("Bite", Dark, Physical, 60, 100, 25),
        Move::Crunch => MoveData::new("Crunch", Dark, Physical, 80, 100, 15),

        // Steel
        Move::MetalClaw => MoveData::new("Metal Claw", Steel, Physical, 50, 95, 35),
        Move::IronTail => MoveData::new("Iron Tail", Steel, Physical, 100, 75, 15),
        Move::IronDefense => MoveData::new("Iron Defense", Steel, Status, 0, 100, 15),

        // Fairy
        Move::FairyWind => MoveData::new("Fairy Wind", Fairy, Special, 40, 100, 30),
        Move::Moonblast => MoveData::new("Moonblast", Fairy, Special, 95, 100, 15),

        Move::Struggle => MoveData::new("Struggle", Normal, Physical, 50, 100, 1),
    }
}

/// All catalog moves of the given type, in declaration order. Struggle is never listed.
pub fn moves_of_type(move_type: PokemonType) -> &'static [Move] {
    MOVES_BY_TYPE
        .get(&move_type)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_entries_are_consistent() {
        for move_ in Move::iter() {
            let data = move_.data();
            assert!(data.accuracy <= 100, "{} has accuracy above 100", data.name);
            assert!(data.max_pp > 0, "{} has no PP", data.name);
            assert_eq!(
                data.power == 0,
                data.category == MoveCategory::Status,
                "{} power does not match its category",
                data.name
            );
        }
    }

    #[test]
    fn test_moves_of_type() {
        let fire = moves_of_type(PokemonType::Fire);
        assert_eq!(
            fire,
            &[
                Move::Ember,
                Move::FirePunch,
                Move::Flamethrower,
                Move::FireBlast,
                Move::WillOWisp
            ]
        );
        assert!(!moves_of_type(PokemonType::Normal).contains(&Move::Struggle));
    }

    #[test]
    fn test_every_type_has_moves() {
        for move_type in PokemonType::iter() {
            assert!(
                !moves_of_type(move_type).is_empty(),
                "no moves registered for {}",
                move_type
            );
        }
    }
}
