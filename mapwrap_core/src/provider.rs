//! Composition of resource providers.
//!
//! A [`Provider`] bundles the assets of one client-side library with the tags a
//! page needs to load them. Providers may depend on other providers; the
//! dependencies are always handled first, so their tags come before the
//! provider's own tags and their routes are claimed first.

use crate::{
	AssetBundle, Injection, Mux, ResourceList, append_resources,
	assets,
	url::{is_absolute_url, join},
};
use anyhow::{Context, Result};
use axum::Router;

pub trait Provider: Send + Sync {
	/// Used in log messages and error contexts.
	fn name(&self) -> &str;

	/// Mount prefix of the assets, `""` or `/` for the root.
	fn prefix(&self) -> &str;

	/// Resources relative to the provider root, before prefixing.
	fn resources(&self) -> ResourceList;

	fn inject_at_eof(&self) -> bool;

	/// `data-*` attributes for the `<body>` tag, names without `data-`.
	fn data_attributes(&self) -> Vec<(String, String)> {
		Vec::new()
	}

	fn assets(&self) -> AssetBundle;

	/// Providers whose resources are injected before the own ones.
	fn resource_dependencies(&self) -> Vec<&dyn Provider> {
		Vec::new()
	}

	/// Providers whose assets are registered before the own ones.
	fn asset_dependencies(&self) -> Vec<&dyn Provider> {
		Vec::new()
	}

	/// The provider's own injection, with all URLs below [`Provider::prefix`].
	fn injection(&self) -> Injection {
		Injection::new(self.resources().with_prefix(self.prefix()), self.inject_at_eof())
			.with_data_attributes(self.data_attributes())
	}
}

/// Wraps `next` with the injectors of all resource dependencies of `provider`
/// and then with the provider's own injector.
pub fn append_resources_handler(next: Router, provider: &dyn Provider) -> Router {
	let next = provider
		.resource_dependencies()
		.into_iter()
		.fold(next, |next, dependency| append_resources_handler(next, dependency));

	let injection = provider.injection();
	log::debug!(
		"append {} scripts and {} stylesheets of '{}'",
		injection.resources.javascript.len(),
		injection.resources.stylesheets.len(),
		provider.name()
	);

	append_resources(next, injection)
}

/// Registers the assets of all asset dependencies of `provider`, then its own.
///
/// Every relative resource of the provider must be part of its bundle, so a
/// page never references an asset that is not served.
pub fn append_asset_handlers(mux: &mut Mux, provider: &dyn Provider) -> Result<()> {
	for dependency in provider.asset_dependencies() {
		append_asset_handlers(mux, dependency)
			.with_context(|| format!("registering dependency of '{}'", provider.name()))?;
	}

	let bundle = provider.assets();
	let resources = provider.resources();
	for url in resources.javascript.iter().chain(resources.stylesheets.iter()) {
		if !is_absolute_url(url) {
			bundle
				.require(url)
				.with_context(|| format!("checking resources of '{}'", provider.name()))?;
		}
	}

	assets::append_asset_handlers(mux, bundle, provider.prefix())
		.with_context(|| format!("registering assets of '{}' at '{}'", provider.name(), join(provider.prefix(), "")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Asset, ConfigError};
	use axum::{
		body::Body,
		extract::Request,
		http::StatusCode,
		response::Html,
		routing::get,
	};
	use rstest::rstest;
	use tower::ServiceExt as _;

	static BASE_ASSETS: &[Asset] = &[
		Asset {
			path: "javascript/base.js",
			content: b"var base;",
		},
		Asset {
			path: "css/base.css",
			content: b".base{}",
		},
	];

	static TOP_ASSETS: &[Asset] = &[
		Asset {
			path: "javascript/top.js",
			content: b"var top;",
		},
		Asset {
			path: "css/top.css",
			content: b".top{}",
		},
	];

	struct Base {
		prefix: String,
		at_eof: bool,
	}

	impl Provider for Base {
		fn name(&self) -> &str {
			"base"
		}
		fn prefix(&self) -> &str {
			&self.prefix
		}
		fn resources(&self) -> ResourceList {
			ResourceList::new(vec!["javascript/base.js".into()], vec!["css/base.css".into()])
		}
		fn inject_at_eof(&self) -> bool {
			self.at_eof
		}
		fn assets(&self) -> AssetBundle {
			AssetBundle::new("base", BASE_ASSETS)
		}
	}

	struct Top {
		prefix: String,
		at_eof: bool,
		base: Base,
		include_base: bool,
		extra_script: Option<String>,
	}

	impl Top {
		fn new(prefix: &str, at_eof: bool, base_at_eof: bool) -> Top {
			Top {
				prefix: prefix.into(),
				at_eof,
				base: Base {
					prefix: prefix.into(),
					at_eof: base_at_eof,
				},
				include_base: true,
				extra_script: None,
			}
		}
	}

	impl Provider for Top {
		fn name(&self) -> &str {
			"top"
		}
		fn prefix(&self) -> &str {
			&self.prefix
		}
		fn resources(&self) -> ResourceList {
			let mut javascript = vec!["javascript/top.js".to_string()];
			javascript.extend(self.extra_script.clone());
			ResourceList::new(javascript, vec!["css/top.css".into()])
		}
		fn inject_at_eof(&self) -> bool {
			self.at_eof
		}
		fn data_attributes(&self) -> Vec<(String, String)> {
			vec![("top-key".into(), "secret".into())]
		}
		fn assets(&self) -> AssetBundle {
			AssetBundle::new("top", TOP_ASSETS)
		}
		fn resource_dependencies(&self) -> Vec<&dyn Provider> {
			if self.include_base { vec![&self.base] } else { vec![] }
		}
		fn asset_dependencies(&self) -> Vec<&dyn Provider> {
			if self.include_base { vec![&self.base] } else { vec![] }
		}
	}

	const PAGE: &str = "<html><head><title>map</title></head><body><div id=\"map\"></div></body></html>";

	async fn get_page(provider: &dyn Provider) -> String {
		let page = Router::new().fallback(get(|| async { Html(PAGE) }));
		let app = append_resources_handler(page, provider);
		let req = Request::builder().uri("/").body(Body::empty()).unwrap();
		let res = app.oneshot(req).await.unwrap();
		let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	fn position(html: &str, needle: &str) -> usize {
		html.find(needle).unwrap_or_else(|| panic!("'{needle}' not found in:\n{html}"))
	}

	#[rstest]
	#[case(false, false)]
	#[case(false, true)]
	#[case(true, false)]
	#[case(true, true)]
	#[tokio::test]
	async fn dependency_resources_come_first(#[case] top_at_eof: bool, #[case] base_at_eof: bool) {
		let html = get_page(&Top::new("/maps", top_at_eof, base_at_eof)).await;

		let head_end = position(&html, "</head>");
		let content = position(&html, "<div id=\"map\">");

		// stylesheets always go to the head, dependency first
		assert!(position(&html, "/maps/css/base.css") < position(&html, "/maps/css/top.css"));
		assert!(position(&html, "/maps/css/top.css") < head_end);

		let base_js = position(&html, "/maps/javascript/base.js");
		let top_js = position(&html, "/maps/javascript/top.js");
		assert_eq!(base_js > content, base_at_eof);
		assert_eq!(top_js > content, top_at_eof);
		if top_at_eof == base_at_eof {
			assert!(base_js < top_js, "dependency script must come first:\n{html}");
		}
	}

	#[tokio::test]
	async fn disabled_dependency_is_not_injected() {
		let mut top = Top::new("", false, false);
		top.include_base = false;
		let html = get_page(&top).await;
		assert!(!html.contains("base.js"));
		assert!(!html.contains("base.css"));
		assert!(html.contains(r#"<script src="/javascript/top.js"></script></head>"#));
		assert!(html.contains(r#"<body data-top-key="secret">"#));
	}

	#[tokio::test]
	async fn assets_of_dependencies_are_registered() {
		let mut mux = Mux::new();
		append_asset_handlers(&mut mux, &Top::new("/maps/v1", false, false)).unwrap();
		assert_eq!(
			mux.patterns().collect::<Vec<_>>(),
			vec![
				"/maps/v1/css/base.css",
				"/maps/v1/css/top.css",
				"/maps/v1/javascript/base.js",
				"/maps/v1/javascript/top.js",
			]
		);

		let req = Request::builder()
			.uri("/maps/v1/javascript/base.js")
			.body(Body::empty())
			.unwrap();
		let res = mux.into_router().oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
	}

	#[test]
	fn disabled_dependency_assets_are_skipped() {
		let mut top = Top::new("", false, false);
		top.include_base = false;
		let mut mux = Mux::new();
		append_asset_handlers(&mut mux, &top).unwrap();
		assert!(!mux.contains("/javascript/base.js"));
		assert!(mux.contains("/javascript/top.js"));
	}

	#[test]
	fn colliding_providers_fail() {
		let mut mux = Mux::new();
		append_asset_handlers(&mut mux, &Top::new("/maps", false, false)).unwrap();

		let other = Base {
			prefix: "/maps/".into(),
			at_eof: false,
		};
		let err = append_asset_handlers(&mut mux, &other).unwrap_err();
		assert_eq!(
			err.downcast_ref::<ConfigError>(),
			Some(&ConfigError::DuplicateRoute("/maps/javascript/base.js".into()))
		);
	}

	#[test]
	fn resources_must_be_bundled() {
		let mut top = Top::new("", false, false);
		top.extra_script = Some("javascript/missing.js".into());
		let mut mux = Mux::new();
		let err = append_asset_handlers(&mut mux, &top).unwrap_err();
		assert_eq!(
			err.downcast_ref::<ConfigError>(),
			Some(&ConfigError::MissingAsset {
				bundle: "top".into(),
				path: "javascript/missing.js".into()
			})
		);

		// external scripts need no asset
		top.extra_script = Some("https://cdn.example.org/lib.js".into());
		let mut mux = Mux::new();
		append_asset_handlers(&mut mux, &top).unwrap();
	}
}
