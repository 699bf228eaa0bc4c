use crate::{Category, RelinkError, RelinkResult};

/// Extracts the identifier that follows `/<category>/` in `url`.
///
/// The link is split on the segment and the piece after the first occurrence
/// is kept up to the next occurrence, then cut at the first `?`. Fragments and
/// trailing path components are left in place.
pub fn extract_id(category: Category, url: &str) -> RelinkResult<String> {
    let missing = || RelinkError::MissingSegment {
        category,
        url: url.to_string(),
    };

    if !category.has_segment() {
        return Err(missing());
    }

    let segment = format!("/{category}/");
    let after = url.split(segment.as_str()).nth(1).ok_or_else(missing)?;
    let id = after.split('?').next().unwrap_or(after);
    Ok(id.to_string())
}
