//! Small response helpers shared by the asset and middleware handlers.

use axum::{
	body::Body,
	http::{StatusCode, header},
	response::Response,
};

pub(crate) fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();

	for (i, cause) in err.chain().skip(1).enumerate() {
		if i == 0 {
			result.push_str("\n  Caused by:");
		}
		result.push_str(&format!("\n    {}", cause));
	}

	result
}

fn error_with(status: StatusCode, message: &'static str) -> Response<Body> {
	let mut response = Response::new(Body::from(message));
	*response.status_mut() = status;
	response.headers_mut().insert(
		header::CONTENT_TYPE,
		header::HeaderValue::from_static("text/plain; charset=utf-8"),
	);
	response
}

pub fn error_404() -> Response<Body> {
	error_with(StatusCode::NOT_FOUND, "Not Found")
}

pub fn error_500() -> Response<Body> {
	error_with(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// 200 response carrying `data` with the given content type.
pub fn ok_data(data: &'static [u8], mime: &str) -> Response<Body> {
	let mut response = Response::new(Body::from(data));
	match header::HeaderValue::from_str(mime) {
		Ok(value) => {
			response.headers_mut().insert(header::CONTENT_TYPE, value);
		}
		Err(err) => log::warn!("invalid content type '{mime}': {err}"),
	}
	response
}
