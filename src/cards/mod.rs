//! Card system: definitions, keywords, instances and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (kind, cost, stats, keywords, triggers)
//! - `CardInstance`: A card in a hand or deck
//! - `UnitInstance`: A unit or building on a board
//! - `CardCatalog`: Definition lookup with placeholder fallback

pub mod definition;
pub mod instance;
pub mod keywords;
pub mod registry;
pub mod standard;

pub use definition::{CardDefinition, CardId, CardKind};
pub use instance::{CardInstance, Hit, Instance, Status, UnitInstance};
pub use keywords::{Keyword, Keywords};
pub use registry::CardCatalog;
