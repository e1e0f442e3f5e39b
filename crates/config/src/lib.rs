//! Configuration for the export gateway: schema, discovery loader, and
//! environment overrides.

pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{AccessConfig, ChanlogConfig, ExportsConfig, ServerConfig, SlackConfig},
};
