/// Makes a raw link safe to embed as one path segment in a backend request.
///
/// Only `:`, `/` and `=` are escaped; the backend decodes exactly this set.
/// `?`, `&` and everything else pass through unchanged.
pub fn encode_for_transport(url: &str) -> String {
    url.replace(':', "%3A")
        .replace('/', "%2F")
        .replace('=', "%3D")
}
