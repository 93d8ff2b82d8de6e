//! Character stat block (attack/defense + additive bonuses)
//!
//! `CharacterStats` — это StatProvider агента: CombatResolver берёт урон из
//! `attack_value()`. Defense хранится, но в расчёт урона не входит
//! (hit resolution без miss/block).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Stat kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatType {
    Attack,
    Defense,
}

/// One stat: base value + additive bonuses (экипировка, бафы).
#[derive(Debug, Clone, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct BaseStat {
    pub stat_type: StatType,
    pub base_value: i32,
    #[serde(default)]
    pub bonuses: Vec<i32>,
}

impl BaseStat {
    pub fn new(stat_type: StatType, base_value: i32) -> Self {
        Self {
            stat_type,
            base_value,
            bonuses: Vec::new(),
        }
    }

    pub fn add_bonus(&mut self, value: i32) {
        self.bonuses.push(value);
    }

    /// Removes the first bonus with an equal value. Returns `false` if none matched.
    pub fn remove_bonus(&mut self, value: i32) -> bool {
        let Some(index) = self.bonuses.iter().position(|&bonus| bonus == value) else {
            return false;
        };
        self.bonuses.remove(index);
        true
    }

    /// base + Σ bonuses (может быть отрицательным при дебаффах)
    pub fn calculated_value(&self) -> i32 {
        self.base_value + self.bonuses.iter().sum::<i32>()
    }
}

/// Collaborator contract: where an attacker's damage comes from.
pub trait StatProvider {
    /// Damage of one hit. Never negative.
    fn attack_value(&self) -> u32;
}

/// Stat block of an actor
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct CharacterStats {
    pub attack: BaseStat,
    pub defense: BaseStat,
}

impl CharacterStats {
    pub fn new(attack: i32, defense: i32) -> Self {
        Self {
            attack: BaseStat::new(StatType::Attack, attack),
            defense: BaseStat::new(StatType::Defense, defense),
        }
    }

    pub fn stat(&self, stat_type: StatType) -> &BaseStat {
        match stat_type {
            StatType::Attack => &self.attack,
            StatType::Defense => &self.defense,
        }
    }

    pub fn stat_mut(&mut self, stat_type: StatType) -> &mut BaseStat {
        match stat_type {
            StatType::Attack => &mut self.attack,
            StatType::Defense => &mut self.defense,
        }
    }

    /// Apply a set of bonuses (e.g. equipping an item): each entry's base value
    /// becomes a bonus on the stat of the same type.
    pub fn add_bonuses(&mut self, bonuses: &[BaseStat]) {
        for bonus in bonuses {
            self.stat_mut(bonus.stat_type).add_bonus(bonus.base_value);
        }
    }

    pub fn remove_bonuses(&mut self, bonuses: &[BaseStat]) {
        for bonus in bonuses {
            self.stat_mut(bonus.stat_type).remove_bonus(bonus.base_value);
        }
    }
}

impl StatProvider for CharacterStats {
    fn attack_value(&self) -> u32 {
        self.attack.calculated_value().max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculated_value_sums_bonuses() {
        let mut stat = BaseStat::new(StatType::Attack, 12);
        stat.add_bonus(3);
        stat.add_bonus(-1);
        assert_eq!(stat.calculated_value(), 14);
    }

    #[test]
    fn test_remove_bonus_removes_first_match_only() {
        let mut stat = BaseStat::new(StatType::Defense, 10);
        stat.add_bonus(2);
        stat.add_bonus(2);

        assert!(stat.remove_bonus(2));
        assert_eq!(stat.bonuses, vec![2]);
        assert!(!stat.remove_bonus(5));
    }

    #[test]
    fn test_equip_and_unequip_bonuses() {
        let mut stats = CharacterStats::new(12, 10);
        let pitchfork = vec![
            BaseStat::new(StatType::Attack, 4),
            BaseStat::new(StatType::Defense, 1),
        ];

        stats.add_bonuses(&pitchfork);
        assert_eq!(stats.attack_value(), 16);
        assert_eq!(stats.stat(StatType::Defense).calculated_value(), 11);

        stats.remove_bonuses(&pitchfork);
        assert_eq!(stats, CharacterStats::new(12, 10));
    }

    #[test]
    fn test_attack_value_never_negative() {
        let mut stats = CharacterStats::new(3, 0);
        stats.attack.add_bonus(-10);
        assert_eq!(stats.attack_value(), 0);
    }
}
