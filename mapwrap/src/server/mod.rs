//! Demo map server.
//!
//! Serves a single map page at `<prefix>/` with the Tangram stack (and
//! optionally a separate Leaflet stack) injected, plus all embedded assets.
//! `/status` answers `ready!` for liveness checks.
//!
//! `MapServer` owns lifecycle concerns only: building the route table once,
//! listening on a socket and shutting down gracefully.

use crate::{Config, LeafletOptions, TangramOptions, leaflet, tangram};
use anyhow::{Context, Result};
use axum::{
	Router,
	response::{Html, Redirect},
	routing::get,
};
use mapwrap_core::{
	Mux,
	response::error_404,
	rewrite::strip_prefix_handler,
	url::{join, parse_prefix},
};
use std::net::SocketAddr;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

const MAP_PAGE: &str = include_str!("../../templates/map.html");

pub struct MapServer {
	ip: String,
	port: u16,
	leaflet: Option<LeafletOptions>,
	tangram: TangramOptions,
	/// One-shot channel to signal graceful shutdown to the serving task.
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<JoinHandle<()>>,
	local_addr: Option<SocketAddr>,
}

impl MapServer {
	pub fn new(ip: &str, port: u16, tangram: TangramOptions) -> MapServer {
		MapServer {
			ip: ip.to_owned(),
			port,
			leaflet: None,
			tangram,
			exit_signal: None,
			join: None,
			local_addr: None,
		}
	}

	pub fn from_config(config: Config) -> MapServer {
		let mut server = MapServer::new(config.server.ip(), config.server.port(), config.tangram);
		server.leaflet = config.leaflet;
		server
	}

	/// Stacks a separate Leaflet provider below Tangram.
	pub fn set_leaflet(&mut self, leaflet: Option<LeafletOptions>) {
		self.leaflet = leaflet;
	}

	/// Mount prefix of the map page, the same as Tangram's.
	pub fn prefix(&self) -> &str {
		&self.tangram.prefix
	}

	/// Address the server is bound to, once started.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.local_addr
	}

	/// Builds the complete route table.
	///
	/// Fails if two providers claim the same route or a prefix is invalid.
	pub fn build_mux(&self) -> Result<Mux> {
		let prefix = parse_prefix(&self.tangram.prefix)?;
		let mut mux = Mux::new();

		mux.handle("/status", Router::new().fallback(get(|| async { "ready!" })))?;

		let mut page = strip_prefix_handler(map_page_router(), &prefix)?;
		if let Some(leaflet) = &self.leaflet {
			page = leaflet::append_resources_handler(page, leaflet);
		}
		page = tangram::append_resources_handler(page, &self.tangram);

		mux
			.handle(&join(&prefix, "/"), page)
			.context("registering map page")?;

		if !prefix.is_empty() {
			mux.handle(&prefix, redirect_router(join(&prefix, "/")))?;
		}

		if let Some(leaflet) = &self.leaflet {
			leaflet::append_asset_handlers(&mut mux, leaflet)?;
		}
		tangram::append_asset_handlers(&mut mux, &self.tangram)?;

		Ok(mux)
	}

	pub fn build_router(&self) -> Result<Router> {
		Ok(self.build_mux()?.into_router())
	}

	/// Registered routes in lexicographic order.
	pub fn routes(&self) -> Result<Vec<String>> {
		Ok(self.build_mux()?.patterns().map(String::from).collect())
	}

	/// Builds the router, binds the socket and spawns the serving task.
	///
	/// Starting a running server restarts it.
	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");

		let router = self.build_router()?;

		let listener = TcpListener::bind((self.ip.as_str(), self.port))
			.await
			.with_context(|| format!("binding to {}:{}", self.ip, self.port))?;
		let local_addr = listener.local_addr()?;
		log::info!("server listening on {local_addr}");

		let (tx, rx) = oneshot::channel::<()>();

		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(handle);
		self.local_addr = Some(local_addr);

		Ok(())
	}

	/// Triggers graceful shutdown and waits for the serving task.
	///
	/// Stopping a stopped server does nothing.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(std::time::Duration::from_secs(10), handle).await {
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Ok(Ok(())) => {}
				Err(_) => log::warn!("server task did not shut down within timeout"),
			}
		}

		self.local_addr = None;
	}
}

fn map_page_router() -> Router {
	Router::new()
		.route("/", get(|| async { Html(MAP_PAGE) }))
		.fallback(|| async { error_404() })
}

/// `<prefix>` without trailing slash redirects to `<prefix>/`.
fn redirect_router(target: String) -> Router {
	Router::new().fallback(get(move || {
		let target = target.clone();
		async move { Redirect::permanent(&target) }
	}))
}
