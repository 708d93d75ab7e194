//! # mapwrap_core
//!
//! Building blocks for serving client-side map libraries next to an HTML page:
//!
//! - [`url`]: prefix-aware path joining and segment-anchored prefix stripping
//! - [`rewrite`]: request rewriting middleware (e.g. stripping a mount prefix)
//! - [`assets`]: embedded asset bundles served under deterministic routes
//! - [`inject`]: `<link>`/`<script>` injection into HTML responses
//! - [`mux`]: a route table that refuses duplicate registrations
//! - [`provider`]: composing providers that depend on each other
//!
//! ## Usage Example
//!
//! ```rust
//! use axum::{Router, response::Html, routing::get};
//! use mapwrap_core::{Injection, Mux, ResourceList, append_resources};
//!
//! let page = Router::new().route("/", get(|| async { Html("<html><head></head><body></body></html>") }));
//!
//! let resources = ResourceList::new(vec!["/javascript/map.js".into()], vec!["/css/map.css".into()]);
//! let page = append_resources(page, Injection::new(resources, false));
//!
//! let mut mux = Mux::new();
//! mux.handle("/", page).unwrap();
//! let _app: Router = mux.into_router();
//! ```

pub mod assets;
mod error;
pub mod inject;
pub mod mime;
pub mod mux;
pub mod provider;
pub mod response;
pub mod rewrite;
pub mod url;

pub use assets::{Asset, AssetBundle};
pub use error::ConfigError;
pub use inject::{Injection, ResourceList, append_resources};
pub use mux::Mux;
pub use provider::{Provider, append_asset_handlers, append_resources_handler};
pub use url::{Url, join};
