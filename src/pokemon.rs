use crate::moves::Move;
use crate::type_chart::TypeChart;
use schema::{MoveCategory, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Pokemon can know at most this many moves.
pub const MAX_MOVES: usize = 4;

/// The level at which base stats are expressed.
pub const BASE_LEVEL: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl Stats {
    pub fn new(hp: u16, attack: u16, defense: u16, sp_attack: u16, sp_defense: u16, speed: u16) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }

    /// Every stat multiplied by `factor`, never dropping below 1.
    fn scaled(&self, factor: f64) -> Self {
        let scale = |value: u16| ((value as f64 * factor).floor() as u16).max(1);
        Self {
            hp: scale(self.hp),
            attack: scale(self.attack),
            defense: scale(self.defense),
            sp_attack: scale(self.sp_attack),
            sp_defense: scale(self.sp_defense),
            speed: scale(self.speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_: Move,
    pub pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(move_: Move) -> Self {
        MoveInstance {
            move_,
            pp: move_.max_pp(),
        }
    }

    pub fn max_pp(&self) -> u8 {
        self.move_.max_pp()
    }

    /// Use the move (decrease PP). Returns false if there was no PP left.
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    /// Lower PP by `amount`, stopping at zero.
    pub fn reduce_pp(&mut self, amount: u8) {
        self.pp = self.pp.saturating_sub(amount);
    }

    /// Restore PP, capped at the move's maximum.
    pub fn restore_pp(&mut self, amount: u8) {
        self.pp = self.pp.saturating_add(amount).min(self.max_pp());
    }

    pub fn has_pp(&self) -> bool {
        self.pp > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub level: u8,
    pub primary_type: PokemonType,
    pub secondary_type: Option<PokemonType>,
    /// Stats at `BASE_LEVEL`; `set_level` rescales from these.
    pub base_stats: Stats,
    /// Current battle stats. `curr_stats.hp` is the maximum HP.
    pub curr_stats: Stats,
    current_hp: u16,
    pub moves: Vec<MoveInstance>,
}

impl PokemonInst {
    /// Create a Pokemon at the base level with full HP and no moves.
    pub fn new(
        name: impl Into<String>,
        primary_type: PokemonType,
        secondary_type: Option<PokemonType>,
        base_stats: Stats,
    ) -> Self {
        PokemonInst {
            name: name.into(),
            level: BASE_LEVEL,
            primary_type,
            secondary_type,
            base_stats,
            curr_stats: base_stats,
            current_hp: base_stats.hp,
            moves: Vec::with_capacity(MAX_MOVES),
        }
    }

    /// Builder-style variant of `add_move` for assembling Pokemon.
    pub fn with_moves(mut self, moves: impl IntoIterator<Item = Move>) -> Self {
        for move_ in moves {
            self.add_move(move_);
        }
        self
    }

    /// Teach a move. Ignored once the Pokemon already knows `MAX_MOVES` moves.
    pub fn add_move(&mut self, move_: Move) {
        if self.moves.len() < MAX_MOVES {
            self.moves.push(MoveInstance::new(move_));
        }
    }

    pub fn types(&self) -> (PokemonType, Option<PokemonType>) {
        (self.primary_type, self.secondary_type)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.primary_type == pokemon_type || self.secondary_type == Some(pokemon_type)
    }

    pub fn max_hp(&self) -> u16 {
        self.curr_stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    /// Set current HP directly, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Current HP as a fraction of max HP.
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp() == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp() as f64
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn take_damage(&mut self, amount: u16) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Restore HP, capped at max HP. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    /// Raise the current attack stat. Boosts stack without an upper bound.
    pub fn boost_attack(&mut self, amount: u16) {
        self.curr_stats.attack = self.curr_stats.attack.saturating_add(amount);
    }

    /// True when every known move has 0 PP. A Pokemon with no moves is not locked out.
    pub fn all_moves_out_of_pp(&self) -> bool {
        !self.moves.is_empty() && self.moves.iter().all(|m| m.pp == 0)
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(MoveInstance::has_pp)
    }

    /// Blanket PP penalty: every move loses `amount` PP.
    pub fn reduce_all_pp(&mut self, amount: u8) {
        for move_instance in &mut self.moves {
            move_instance.reduce_pp(amount);
        }
    }

    pub fn restore_all_pp(&mut self) {
        for move_instance in &mut self.moves {
            move_instance.pp = move_instance.max_pp();
        }
    }

    /// Rescale all stats from their level-50 values and refill HP.
    pub fn set_level(&mut self, level: u8) {
        let level = level.max(1);
        self.level = level;
        self.curr_stats = self.base_stats.scaled(level as f64 / BASE_LEVEL as f64);
        self.current_hp = self.curr_stats.hp;
    }

    /// Reject states that `take_damage`, `add_move` and PP handling can never produce.
    pub fn validate(&self) -> Result<(), String> {
        if self.current_hp > self.max_hp() {
            return Err(format!(
                "{} has {} HP but a maximum of {}",
                self.name,
                self.current_hp,
                self.max_hp()
            ));
        }
        if self.moves.len() > MAX_MOVES {
            return Err(format!("{} knows {} moves", self.name, self.moves.len()));
        }
        if let Some(m) = self.moves.iter().find(|m| m.pp > m.max_pp()) {
            return Err(format!(
                "{} has {} PP on {} (max {})",
                self.name,
                m.pp,
                m.move_,
                m.max_pp()
            ));
        }
        Ok(())
    }

    /// Damage this Pokemon would deal to `target` with `move_`:
    /// `floor(power * atk / def * 0.5 * effectiveness * stab) + 1`.
    /// Status moves deal no damage.
    pub fn calculate_damage(&self, chart: &TypeChart, target: &PokemonInst, move_: Move) -> u16 {
        let data = move_.data();
        let (attack_stat, defense_stat) = match data.category {
            MoveCategory::Physical => (self.curr_stats.attack, target.curr_stats.defense),
            MoveCategory::Special => (self.curr_stats.sp_attack, target.curr_stats.sp_defense),
            MoveCategory::Status => return 0,
        };

        let effectiveness =
            chart.effectiveness_against(data.move_type, target.primary_type, target.secondary_type);
        let stab = if self.has_type(data.move_type) { 1.5 } else { 1.0 };

        let raw = data.power as f64 * attack_stat as f64 / defense_stat.max(1) as f64
            * 0.5
            * effectiveness
            * stab;
        (raw.floor() as u16).saturating_add(1)
    }

    /// Attack `target` with the move in `move_index`. Spends one PP and returns
    /// the damage dealt, or 0 without side effects if the slot is empty or out of PP.
    pub fn attack(&mut self, chart: &TypeChart, target: &mut PokemonInst, move_index: usize) -> u16 {
        let Some(move_instance) = self.moves.get_mut(move_index) else {
            return 0;
        };
        if !move_instance.use_move() {
            return 0;
        }
        let move_ = move_instance.move_;
        let damage = self.calculate_damage(chart, target, move_);
        target.take_damage(damage);
        damage
    }

    /// Last-resort attack with Struggle: costs no PP, recoils a quarter of the
    /// damage dealt (at least 1) onto the user. Returns `(damage, recoil)`.
    pub fn struggle(&mut self, chart: &TypeChart, target: &mut PokemonInst) -> (u16, u16) {
        let damage = self.calculate_damage(chart, target, Move::Struggle);
        target.take_damage(damage);
        let recoil = (damage / 4).max(1);
        self.take_damage(recoil);
        (damage, recoil)
    }
}

impl fmt::Display for PokemonInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = match self.secondary_type {
            Some(secondary) => format!("{}/{}", self.primary_type, secondary),
            None => self.primary_type.to_string(),
        };
        write!(
            f,
            "{} Lv.{} [{}] HP: {}/{}",
            self.name,
            self.level,
            types,
            self.current_hp,
            self.max_hp()
        )?;

        // The alternate form (`{:#}`) adds the move list.
        if f.alternate() {
            for move_instance in &self.moves {
                write!(
                    f,
                    "\n  - {} ({}/{} PP)",
                    move_instance.move_,
                    move_instance.pp,
                    move_instance.max_pp()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn chart() -> TypeChart {
        TypeChart::builtin()
    }

    fn flat_stats(value: u16) -> Stats {
        Stats::new(100, value, value, value, value, value)
    }

    fn normal_mon() -> PokemonInst {
        PokemonInst::new("Plain", PokemonType::Normal, None, flat_stats(50))
    }

    #[test]
    fn test_reference_damage_value() {
        // 40 power, 50 atk vs 50 def, neutral, no STAB: floor(40 * 1 * 0.5) + 1
        let attacker = PokemonInst::new("Attacker", PokemonType::Fire, None, flat_stats(50));
        let target = normal_mon();
        assert_eq!(attacker.calculate_damage(&chart(), &target, Move::Tackle), 21);
    }

    #[test]
    fn test_damage_is_deterministic() {
        let attacker = normal_mon();
        let target = normal_mon();
        let first = attacker.calculate_damage(&chart(), &target, Move::BodySlam);
        for _ in 0..10 {
            assert_eq!(attacker.calculate_damage(&chart(), &target, Move::BodySlam), first);
        }
    }

    #[test]
    fn test_stab_is_one_and_a_half() {
        // Ember and Thunder Shock share power and category; only Ember matches the user.
        let attacker = PokemonInst::new("Fiery", PokemonType::Fire, None, flat_stats(50));
        let target = normal_mon();
        let with_stab = attacker.calculate_damage(&chart(), &target, Move::Ember) - 1;
        let without_stab = attacker.calculate_damage(&chart(), &target, Move::ThunderShock) - 1;
        assert_eq!(without_stab, 20);
        assert_eq!(with_stab, 30);
    }

    #[test]
    fn test_stab_matches_secondary_type() {
        let attacker = PokemonInst::new(
            "Dual",
            PokemonType::Grass,
            Some(PokemonType::Poison),
            flat_stats(50),
        );
        let target = normal_mon();
        assert_eq!(attacker.calculate_damage(&chart(), &target, Move::SludgeBomb), 68);
    }

    #[test]
    fn test_special_moves_use_special_stats() {
        let attacker = PokemonInst::new(
            "Caster",
            PokemonType::Normal,
            None,
            Stats::new(100, 10, 50, 100, 50, 50),
        );
        let target = PokemonInst::new(
            "Wall",
            PokemonType::Normal,
            None,
            Stats::new(100, 50, 50, 50, 25, 50),
        );
        // 40 * 100 / 25 * 0.5 = 80
        assert_eq!(attacker.calculate_damage(&chart(), &target, Move::Gust), 81);
    }

    #[test]
    fn test_immunity_still_deals_minimum_damage() {
        let attacker = normal_mon();
        let ghost = PokemonInst::new("Spooky", PokemonType::Ghost, None, flat_stats(50));
        assert_eq!(attacker.calculate_damage(&chart(), &ghost, Move::Tackle), 1);
    }

    #[test]
    fn test_status_moves_deal_no_damage() {
        let attacker = normal_mon();
        let target = normal_mon();
        assert_eq!(attacker.calculate_damage(&chart(), &target, Move::Growl), 0);
    }

    #[test]
    fn test_attack_spends_pp_and_damages_target() {
        let mut attacker = normal_mon().with_moves([Move::Tackle]);
        let mut target = normal_mon();

        let damage = attacker.attack(&chart(), &mut target, 0);

        assert_eq!(damage, 31); // STAB: floor(40 * 0.5 * 1.5) + 1
        assert_eq!(target.current_hp(), 100 - 31);
        assert_eq!(attacker.moves[0].pp, Move::Tackle.max_pp() - 1);
    }

    #[test]
    fn test_attack_with_no_pp_does_nothing() {
        let mut attacker = normal_mon().with_moves([Move::Tackle]);
        attacker.moves[0].pp = 0;
        let mut target = normal_mon();

        assert_eq!(attacker.attack(&chart(), &mut target, 0), 0);
        assert_eq!(target.current_hp(), 100);
        assert_eq!(attacker.moves[0].pp, 0);
        assert_eq!(attacker.attack(&chart(), &mut target, 3), 0);
    }

    #[test]
    fn test_fifth_move_is_ignored() {
        let pokemon = normal_mon().with_moves([
            Move::Tackle,
            Move::Growl,
            Move::Slash,
            Move::BodySlam,
            Move::HyperBeam,
        ]);
        assert_eq!(pokemon.moves.len(), MAX_MOVES);
        assert!(pokemon.moves.iter().all(|m| m.move_ != Move::HyperBeam));
    }

    #[rstest]
    #[case(&[30], 70)]
    #[case(&[60, 60], 0)]
    #[case(&[0, 100, 5], 0)]
    #[case(&[u16::MAX], 0)]
    fn test_hp_stays_in_range(#[case] hits: &[u16], #[case] expected: u16) {
        let mut pokemon = normal_mon();
        for hit in hits {
            pokemon.take_damage(*hit);
            assert!(pokemon.current_hp() <= pokemon.max_hp());
        }
        assert_eq!(pokemon.current_hp(), expected);
        assert_eq!(pokemon.is_fainted(), expected == 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut pokemon = normal_mon();
        pokemon.take_damage(30);
        assert_eq!(pokemon.heal(50), 30);
        assert_eq!(pokemon.current_hp(), 100);
    }

    #[test]
    fn test_out_of_pp_detection() {
        assert!(!normal_mon().all_moves_out_of_pp());

        let mut pokemon = normal_mon().with_moves([Move::Tackle, Move::Growl]);
        assert!(!pokemon.all_moves_out_of_pp());
        pokemon.moves[0].pp = 0;
        assert!(!pokemon.all_moves_out_of_pp());
        pokemon.moves[1].pp = 0;
        assert!(pokemon.all_moves_out_of_pp());
    }

    #[test]
    fn test_pp_reduction_clamps_at_zero() {
        let mut pokemon = normal_mon().with_moves([Move::HyperBeam]);
        for _ in 0..10 {
            pokemon.reduce_all_pp(1);
        }
        assert_eq!(pokemon.moves[0].pp, 0);
        pokemon.moves[0].restore_pp(200);
        assert_eq!(pokemon.moves[0].pp, Move::HyperBeam.max_pp());
    }

    #[test]
    fn test_set_level_rescales_from_base() {
        let mut pokemon = PokemonInst::new(
            "Scaled",
            PokemonType::Water,
            None,
            Stats::new(120, 60, 50, 45, 40, 30),
        );
        pokemon.take_damage(50);

        pokemon.set_level(100);
        assert_eq!(pokemon.curr_stats, Stats::new(240, 120, 100, 90, 80, 60));
        assert_eq!(pokemon.current_hp(), 240);

        // Rescaling always starts from the base, not the previous level.
        pokemon.set_level(25);
        assert_eq!(pokemon.curr_stats, Stats::new(60, 30, 25, 22, 20, 15));
        assert_eq!(pokemon.level, 25);
    }

    #[test]
    fn test_struggle_recoils_on_user() {
        let mut attacker = normal_mon();
        let mut target = normal_mon();
        let (damage, recoil) = attacker.struggle(&chart(), &mut target);
        // floor(50 * 0.5 * 1.5) + 1 with STAB
        assert_eq!(damage, 38);
        assert_eq!(recoil, 9);
        assert_eq!(attacker.current_hp(), 91);
        assert_eq!(target.current_hp(), 62);
    }
}
