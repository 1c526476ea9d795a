use crate::move_data::MoveData;
use schema::{MoveCategory, PokemonType};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Move {
    // Normal Type
    Tackle,
    Scratch,
    QuickAttack,
    Slash,
    BodySlam,
    DoubleEdge,
    HyperBeam,
    Growl,
    Harden,
    Recover,
    Protect,

    // Fire Type
    Ember,
    FirePunch,
    Flamethrower,
    FireBlast,
    WillOWisp,

    // Water Type
    WaterGun,
    Waterfall,
    Surf,
    HydroPump,
    Withdraw,

    // Electric Type
    ThunderShock,
    ThunderPunch,
    Thunderbolt,
    Thunder,
    ThunderWave,

    // Grass Type
    VineWhip,
    RazorLeaf,
    GigaDrain,
    SolarBeam,
    Synthesis,

    // Ice Type
    IcePunch,
    IceBeam,
    Blizzard,

    // Fighting Type
    KarateChop,
    CloseCombat,
    BulkUp,

    // Poison Type
    PoisonSting,
    SludgeBomb,
    Toxic,

    // Ground Type
    MudSlap,
    Dig,
    Earthquake,

    // Flying Type
    Gust,
    WingAttack,
    AirSlash,

    // Psychic Type
    Confusion,
    Psychic,
    Reflect,
    LightScreen,

    // Bug Type
    BugBite,
    XScissor,

    // Rock Type
    RockThrow,
    RockSlide,
    StoneEdge,

    // Ghost Type
    Lick,
    ShadowBall,

    // Dragon Type
    DragonClaw,
    DragonPulse,
    Outrage,

    // Dark Type
    Bite,
    Crunch,

    // Steel Type
    MetalClaw,
    IronTail,
    IronDefense,

    // Fairy Type
    FairyWind,
    Moonblast,

    // Last resort when every move is out of PP
    Struggle,
}

impl Move {
    /// The static definition of this move.
    pub fn data(self) -> MoveData {
        crate::move_data::get_move_data(self)
    }

    pub fn name(self) -> &'static str {
        self.data().name
    }

    pub fn power(self) -> u16 {
        self.data().power
    }

    pub fn category(self) -> MoveCategory {
        self.data().category
    }

    pub fn move_type(self) -> PokemonType {
        self.data().move_type
    }

    pub fn max_pp(self) -> u8 {
        self.data().max_pp
    }

    /// Look up a move by its display name, ignoring case, spaces, dashes and underscores.
    pub fn from_name(name: &str) -> Option<Move> {
        let wanted = normalize(name);
        Move::iter().find(|move_| normalize(move_.name()) == wanted)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_name(s).ok_or_else(|| format!("Unknown move: {}", s))
    }
}

fn normalize(name: &str) -> String {
    name.to_uppercase().replace([' ', '-', '_'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_lookup_by_display_name() {
        assert_eq!(Move::from_name("Quick Attack"), Some(Move::QuickAttack));
        assert_eq!(Move::from_name("x-scissor"), Some(Move::XScissor));
        assert_eq!(Move::from_str("will_o_wisp"), Ok(Move::WillOWisp));
        assert!(Move::from_str("Splash").is_err());
    }

    #[test]
    fn test_display_uses_catalog_name() {
        assert_eq!(Move::HydroPump.to_string(), "Hydro Pump");
    }
}
