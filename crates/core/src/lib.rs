//! Domain logic for the Draftpad document service.
//!
//! Pure types and decision functions shared by the persistence, session,
//! and API layers. Nothing in this crate touches the database; everything
//! time-dependent takes the current instant as a parameter.

pub mod error;
pub mod history;
pub mod identity;
pub mod preview;
pub mod revision;
pub mod types;
