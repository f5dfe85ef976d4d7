//! Domain layer: entities and business rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config
//! loading).

pub mod date;
pub mod entities;
pub mod error;

pub use date::GedcomDate;
pub use entities::{Event, EventKind, Family, Individual, PersonName, Sex};
pub use error::DomainError;
