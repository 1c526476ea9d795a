//! The species dex: a fixed set of Pokemon templates with their level-50
//! stats and default movesets.

use crate::moves::Move;
use crate::pokemon::{PokemonInst, Stats};
use schema::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Species {
    Bulbasaur,
    Charmander,
    Squirtle,
    Pikachu,
    Geodude,
    Machop,
    Abra,
    Gastly,
    Pidgey,
    Snorlax,
    Lapras,
    Dratini,
    Umbreon,
    Magnemite,
    Clefairy,
    Scyther,
    Steelix,
    Jynx,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesTemplate {
    pub name: &'static str,
    pub primary_type: PokemonType,
    pub secondary_type: Option<PokemonType>,
    /// Stats at level 50.
    pub base_stats: Stats,
    pub moves: [Move; 4],
}

impl Species {
    pub fn template(self) -> SpeciesTemplate {
        get_species_template(self)
    }

    pub fn name(self) -> &'static str {
        self.template().name
    }

    /// A fresh level-50 Pokemon of this species with its default moves.
    pub fn create(self) -> PokemonInst {
        let template = self.template();
        PokemonInst::new(
            template.name,
            template.primary_type,
            template.secondary_type,
            template.base_stats,
        )
        .with_moves(template.moves)
    }
}

pub fn get_species_template(species: Species) -> SpeciesTemplate {
    use PokemonType::*;

    match species {
        Species::Bulbasaur => SpeciesTemplate {
            name: "Bulbasaur",
            primary_type: Grass,
            secondary_type: Some(Poison),
            base_stats: Stats::new(105, 54, 54, 70, 70, 50),
            moves: [Move::VineWhip, Move::RazorLeaf, Move::SludgeBomb, Move::Synthesis],
        },
        Species::Charmander => SpeciesTemplate {
            name: "Charmander",
            primary_type: Fire,
            secondary_type: None,
            base_stats: Stats::new(99, 57, 48, 65, 55, 70),
            moves: [Move::Scratch, Move::Ember, Move::Flamethrower, Move::Growl],
        },
        Species::Squirtle => SpeciesTemplate {
            name: "Squirtle",
            primary_type: Water,
            secondary_type: None,
            base_stats: Stats::new(104, 53, 70, 55, 69, 48),
            moves: [Move::Tackle, Move::WaterGun, Move::Surf, Move::Withdraw],
        },
        Species::Pikachu => SpeciesTemplate {
            name: "Pikachu",
            primary_type: Electric,
            secondary_type: None,
            base_stats: Stats::new(95, 60, 45, 55, 55, 95),
            moves: [Move::QuickAttack, Move::ThunderShock, Move::Thunderbolt, Move::ThunderWave],
        },
        Species::Geodude => SpeciesTemplate {
            name: "Geodude",
            primary_type: Rock,
            secondary_type: Some(Ground),
            base_stats: Stats::new(100, 85, 105, 35, 35, 25),
            moves: [Move::Tackle, Move::RockThrow, Move::Earthquake, Move::Harden],
        },
        Species::Machop => SpeciesTemplate {
            name: "Machop",
            primary_type: Fighting,
            secondary_type: None,
            base_stats: Stats::new(130, 85, 55, 40, 40, 40),
            moves: [Move::KarateChop, Move::CloseCombat, Move::RockSlide, Move::BulkUp],
        },
        Species::Abra => SpeciesTemplate {
            name: "Abra",
            primary_type: Psychic,
            secondary_type: None,
            base_stats: Stats::new(85, 25, 20, 110, 60, 95),
            moves: [Move::Confusion, Move::Psychic, Move::ShadowBall, Move::Reflect],
        },
        Species::Gastly => SpeciesTemplate {
            name: "Gastly",
            primary_type: Ghost,
            secondary_type: Some(Poison),
            base_stats: Stats::new(90, 40, 35, 105, 40, 85),
            moves: [Move::Lick, Move::ShadowBall, Move::SludgeBomb, Move::Toxic],
        },
        Species::Pidgey => SpeciesTemplate {
            name: "Pidgey",
            primary_type: Normal,
            secondary_type: Some(Flying),
            base_stats: Stats::new(100, 50, 45, 40, 40, 61),
            moves: [Move::Tackle, Move::Gust, Move::WingAttack, Move::AirSlash],
        },
        Species::Snorlax => SpeciesTemplate {
            name: "Snorlax",
            primary_type: Normal,
            secondary_type: None,
            base_stats: Stats::new(220, 115, 70, 70, 115, 35),
            moves: [Move::BodySlam, Move::Crunch, Move::Earthquake, Move::Recover],
        },
        Species::Lapras => SpeciesTemplate {
            name: "Lapras",
            primary_type: Water,
            secondary_type: Some(Ice),
            base_stats: Stats::new(190, 90, 85, 90, 100, 65),
            moves: [Move::Surf, Move::IceBeam, Move::Thunderbolt, Move::Psychic],
        },
        Species::Dratini => SpeciesTemplate {
            name: "Dratini",
            primary_type: Dragon,
            secondary_type: None,
            base_stats: Stats::new(101, 69, 50, 55, 55, 55),
            moves: [Move::DragonClaw, Move::DragonPulse, Move::Outrage, Move::ThunderWave],
        },
        Species::Umbreon => SpeciesTemplate {
            name: "Umbreon",
            primary_type: Dark,
            secondary_type: None,
            base_stats: Stats::new(155, 70, 115, 65, 135, 70),
            moves: [Move::Bite, Move::Crunch, Move::Protect, Move::Recover],
        },
        Species::Magnemite => SpeciesTemplate {
            name: "Magnemite",
            primary_type: Electric,
            secondary_type: Some(Steel),
            base_stats: Stats::new(85, 40, 75, 100, 60, 50),
            moves: [Move::ThunderShock, Move::Thunderbolt, Move::MetalClaw, Move::ThunderWave],
        },
        Species::Clefairy => SpeciesTemplate {
            name: "Clefairy",
            primary_type: Fairy,
            secondary_type: None,
            base_stats: Stats::new(130, 50, 53, 65, 70, 40),
            moves: [Move::FairyWind, Move::Moonblast, Move::BodySlam, Move::LightScreen],
        },
        Species::Scyther => SpeciesTemplate {
            name: "Scyther",
            primary_type: Bug,
            secondary_type: Some(Flying),
            base_stats: Stats::new(130, 115, 85, 60, 85, 110),
            moves: [Move::QuickAttack, Move::XScissor, Move::WingAttack, Move::Slash],
        },
        Species::Steelix => SpeciesTemplate {
            name: "Steelix",
            primary_type: Steel,
            secondary_type: Some(Ground),
            base_stats: Stats::new(135, 90, 205, 60, 70, 35),
            moves: [Move::IronTail, Move::Earthquake, Move::Crunch, Move::IronDefense],
        },
        Species::Jynx => SpeciesTemplate {
            name: "Jynx",
            primary_type: Ice,
            secondary_type: Some(Psychic),
            base_stats: Stats::new(125, 55, 40, 120, 100, 100),
            moves: [Move::IcePunch, Move::Blizzard, Move::Psychic, Move::LightScreen],
        },
    }
}

/// Display detailed information about a species including stats and moves
pub fn display_species_detailed(species: Species, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let data = species.template();

    writeln!(f, "{}", data.name)?;
    writeln!(f, "--------------------")?;

    write!(f, "Type(s): {}", data.primary_type)?;
    if let Some(secondary) = data.secondary_type {
        write!(f, " / {}", secondary)?;
    }
    writeln!(f)?;
    writeln!(f, "--------------------")?;

    writeln!(f, "Stats (Lv. 50):")?;
    let stats = &data.base_stats;
    const LABEL_WIDTH: usize = 12;

    writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", stats.hp)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", stats.attack)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", stats.defense)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Atk", stats.sp_attack)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Def", stats.sp_defense)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Speed", stats.speed)?;
    writeln!(f, "--------------------")?;

    let move_names: Vec<&str> = data.moves.iter().map(|m| m.name()).collect();
    write!(f, "Moves: {}", move_names.join(", "))
}

/// Wrapper that renders `display_species_detailed` through `Display`.
pub struct SpeciesCard(pub Species);

impl fmt::Display for SpeciesCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_species_detailed(self.0, f)
    }
}
