//! Keyword abilities.
//!
//! Keywords alter targetability, combat resolution or attack eligibility:
//!
//! - `Haste`: may attack the turn it is played
//! - `Taunt`: enemies must attack it first
//! - `Bane`: any strike it lands destroys the struck unit
//! - `Elusive`: only elusive attackers may strike it
//! - `Stealth`: cannot be attacked or chosen by enemy effects until it attacks
//! - `DivineShield`: absorbs the first damage instance
//! - `DoubleAttack`: may attack twice per turn

use serde::{Deserialize, Serialize};

/// A single keyword ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Haste,
    Taunt,
    Bane,
    Elusive,
    Stealth,
    DivineShield,
    DoubleAttack,
}

impl Keyword {
    /// Every keyword, in display order.
    pub const ALL: [Keyword; 7] = [
        Keyword::Haste,
        Keyword::Taunt,
        Keyword::Bane,
        Keyword::Elusive,
        Keyword::Stealth,
        Keyword::DivineShield,
        Keyword::DoubleAttack,
    ];
}

/// Set of keyword flags carried by a card or unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    pub haste: bool,
    pub taunt: bool,
    pub bane: bool,
    pub elusive: bool,
    pub stealth: bool,
    pub divine_shield: bool,
    pub double_attack: bool,
}

impl Keywords {
    /// No keywords.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            haste: false,
            taunt: false,
            bane: false,
            elusive: false,
            stealth: false,
            divine_shield: false,
            double_attack: false,
        }
    }

    /// Check a keyword.
    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        match keyword {
            Keyword::Haste => self.haste,
            Keyword::Taunt => self.taunt,
            Keyword::Bane => self.bane,
            Keyword::Elusive => self.elusive,
            Keyword::Stealth => self.stealth,
            Keyword::DivineShield => self.divine_shield,
            Keyword::DoubleAttack => self.double_attack,
        }
    }

    /// Set or clear a keyword.
    pub fn set(&mut self, keyword: Keyword, value: bool) {
        let flag = match keyword {
            Keyword::Haste => &mut self.haste,
            Keyword::Taunt => &mut self.taunt,
            Keyword::Bane => &mut self.bane,
            Keyword::Elusive => &mut self.elusive,
            Keyword::Stealth => &mut self.stealth,
            Keyword::DivineShield => &mut self.divine_shield,
            Keyword::DoubleAttack => &mut self.double_attack,
        };
        *flag = value;
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with(mut self, keyword: Keyword) -> Self {
        self.set(keyword, true);
        self
    }

    /// Check if no keyword is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// Iterate over the keywords that are set.
    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        Keyword::ALL.into_iter().filter(move |k| self.has(*k))
    }
}

impl FromIterator<Keyword> for Keywords {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Keywords::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_has() {
        let mut keywords = Keywords::none();
        assert!(keywords.is_empty());

        keywords.set(Keyword::Taunt, true);
        assert!(keywords.has(Keyword::Taunt));
        assert!(!keywords.has(Keyword::Bane));

        keywords.set(Keyword::Taunt, false);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_from_iter() {
        let keywords: Keywords = [Keyword::Haste, Keyword::DivineShield].into_iter().collect();

        assert!(keywords.haste);
        assert!(keywords.divine_shield);
        assert_eq!(keywords.iter().count(), 2);
    }

    #[test]
    fn test_partial_json() {
        let keywords: Keywords = serde_json::from_str(r#"{"taunt": true}"#).unwrap();
        assert_eq!(keywords, Keywords::none().with(Keyword::Taunt));
    }
}
