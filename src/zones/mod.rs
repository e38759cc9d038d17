//! Zone system for card locations.
//!
//! Each side owns four zones:
//!
//! - **hand**: bounded (10 by default); draws past the cap are discarded
//! - **deck**: ordered; draws take the front card
//! - **board**: bounded (7 by default); units and buildings
//! - **graveyard**: append-only snapshots of dead units
//!
//! ## Key Types
//!
//! - `Zone`: Ordered, optionally bounded container backed by `im::Vector`

pub mod zone;

pub use zone::Zone;
