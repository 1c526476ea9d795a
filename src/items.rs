use crate::pokemon::PokemonInst;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an item does to the Pokemon it is used on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore a fixed amount of HP, capped at max HP.
    Heal { amount: u16 },
    /// Bring a fainted Pokemon back with a fraction of its max HP.
    Revive { fraction: f64 },
    /// Raise attack by a fixed amount. Repeated boosts stack.
    BoostAttack { amount: u16 },
}

/// The visible result of using an item, used for battle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOutcome {
    Healed { amount: u16 },
    Revived { hp: u16 },
    AttackBoosted { amount: u16 },
    NoEffect,
}

impl ItemEffect {
    pub fn apply(&self, target: &mut PokemonInst) -> EffectOutcome {
        match *self {
            // Only the max HP bounds a heal, so a potion also lifts a fainted target.
            ItemEffect::Heal { amount } => EffectOutcome::Healed {
                amount: target.heal(amount),
            },
            ItemEffect::Revive { fraction } => {
                if !target.is_fainted() {
                    return EffectOutcome::NoEffect;
                }
                let hp = ((target.max_hp() as f64 * fraction).floor() as u16).max(1);
                target.set_hp(hp);
                EffectOutcome::Revived {
                    hp: target.current_hp(),
                }
            }
            ItemEffect::BoostAttack { amount } => {
                target.boost_attack(amount);
                EffectOutcome::AttackBoosted { amount }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub effect: ItemEffect,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            effect,
        }
    }

    /// Apply the item's effect. Removing the item from an inventory is the caller's job.
    pub fn use_on(&self, target: &mut PokemonInst) -> EffectOutcome {
        self.effect.apply(target)
    }

    pub fn potion() -> Self {
        Self::new("Potion", "Restores 20 HP.", ItemEffect::Heal { amount: 20 })
    }

    pub fn super_potion() -> Self {
        Self::new("Super Potion", "Restores 50 HP.", ItemEffect::Heal { amount: 50 })
    }

    pub fn hyper_potion() -> Self {
        Self::new("Hyper Potion", "Restores 200 HP.", ItemEffect::Heal { amount: 200 })
    }

    pub fn revive() -> Self {
        Self::new(
            "Revive",
            "Revives a fainted Pokemon with half its max HP.",
            ItemEffect::Revive { fraction: 0.5 },
        )
    }

    pub fn max_revive() -> Self {
        Self::new(
            "Max Revive",
            "Revives a fainted Pokemon with full HP.",
            ItemEffect::Revive { fraction: 1.0 },
        )
    }

    pub fn x_attack() -> Self {
        Self::new(
            "X Attack",
            "Raises the attack of the active Pokemon by 10.",
            ItemEffect::BoostAttack { amount: 10 },
        )
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// Every item a player can start a battle with.
pub fn item_catalog() -> Vec<Item> {
    vec![
        Item::potion(),
        Item::super_potion(),
        Item::hyper_potion(),
        Item::revive(),
        Item::max_revive(),
        Item::x_attack(),
    ]
}

/// The inventory each player receives in a standard battle.
pub fn starter_inventory() -> Vec<Item> {
    vec![
        Item::potion(),
        Item::potion(),
        Item::super_potion(),
        Item::revive(),
        Item::x_attack(),
    ]
}
