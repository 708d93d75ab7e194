//! # mapwrap
//!
//! Leaflet and Tangram for axum: the libraries' files are embedded in the
//! binary, served below a mount prefix and injected into HTML pages.
//!
//! - [`leaflet`]: the Leaflet provider and its options
//! - [`tangram`]: the Tangram provider, which stacks Leaflet below itself
//! - [`config`]: YAML configuration
//! - [`server`]: a demo server that puts everything together
//!
//! ## Usage Example
//!
//! ```rust
//! use axum::{Router, response::Html, routing::get};
//! use mapwrap::{TangramOptions, tangram};
//! use mapwrap_core::Mux;
//!
//! let mut options = TangramOptions::default();
//! options.set_prefix("/maps");
//! options.nextzen.api_key = String::from("your-key");
//!
//! let page = Router::new().route("/", get(|| async { Html("<html><head></head><body></body></html>") }));
//!
//! let mut mux = Mux::new();
//! mux.handle("/", tangram::append_resources_handler(page, &options)).unwrap();
//! tangram::append_asset_handlers(&mut mux, &options).unwrap();
//!
//! assert!(mux.contains("/maps/javascript/tangram.min.js"));
//! assert!(mux.contains("/maps/javascript/leaflet.js"));
//! let _app: Router = mux.into_router();
//! ```

pub mod config;
pub mod leaflet;
pub mod server;
pub mod tangram;

pub use config::{Config, ServerConfig};
pub use leaflet::LeafletOptions;
pub use server::MapServer;
pub use tangram::{NextzenOptions, TangramOptions};
