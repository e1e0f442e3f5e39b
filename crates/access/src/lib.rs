//! Allow-list access control for the export gateway.
//!
//! Two independently persisted identifier sets (authorized users, authorized
//! channels) gate every export. Membership is explicit: an empty allow-list
//! denies everyone, so both sets must be populated before the gateway will
//! export anything.

pub mod error;
pub mod gate;
pub mod identifier;
pub mod store;

pub use {
    error::{Error, Result},
    gate::{Access, AccessGate, DenyReason},
    identifier::IdKind,
    store::AllowListStore,
};
