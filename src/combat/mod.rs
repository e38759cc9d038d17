//! Combat: declaring and resolving attacks.
//!
//! An attack targets the enemy face or one enemy unit. Taunt, elusive and
//! stealth restrict the choice; divine shield, bane and double attack change
//! the exchange. See [`resolver`] for the resolution order.

pub mod resolver;

pub use resolver::{attack, validate_attack};
