//! recruit-core
//!
//! Controllers and services for the recruitment wizard.
//! Depends on recruit-domain. No terminal I/O; every side effect goes through
//! the surface traits in [`storage`], [`notify`] and [`time`].

pub mod error;
pub mod form;
pub mod markdown;
pub mod notify;
pub mod question_flow;
pub mod storage;
pub mod time;
pub mod transfer;
pub mod wizard;

pub use error::CoreError;
pub use form::*;
pub use markdown::*;
pub use notify::*;
pub use question_flow::*;
pub use storage::*;
pub use time::*;
pub use transfer::*;
pub use wizard::*;
