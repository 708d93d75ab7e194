/// Content type for an asset path, guessed from its extension.
///
/// Text types are served as UTF-8.
pub fn guess_mime(path: &str) -> String {
	let mime = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_owned();
	if mime.starts_with("text/") {
		format!("{mime}; charset=utf-8")
	} else {
		mime
	}
}
