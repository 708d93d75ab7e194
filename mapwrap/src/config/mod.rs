//! Configuration of the map server.
//!
//! - [`Config`]: top-level record and YAML loader
//! - [`ServerConfig`]: socket settings
//!
//! Provider options ([`LeafletOptions`](crate::LeafletOptions),
//! [`TangramOptions`](crate::TangramOptions)) are read from the `leaflet` and
//! `tangram` sections.

mod main;
mod server;

pub use main::Config;
pub use server::ServerConfig;
