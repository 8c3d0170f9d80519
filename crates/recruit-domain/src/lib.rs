//! recruit-domain
//!
//! Pure data model for the recruitment listing wizard: the declared field
//! table, wizard steps, form records, question sets and persisted answers.
//! No I/O, no terminal, no storage.

pub mod answers;
pub mod error;
pub mod fields;
pub mod question;
pub mod record;
pub mod regions;
pub mod steps;

pub use answers::*;
pub use error::DomainError;
pub use fields::*;
pub use question::*;
pub use record::*;
pub use steps::*;
