//! Local filename derivation for downloaded assets.

/// Sanitizes an asset name from the service for use as a local filename.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores (no `..`, no hidden files)
/// - Limits length to 255 bytes (Linux NAME_MAX)
pub fn sanitize_asset_name(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let c = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

/// Local filename for an asset, falling back to `asset-<id>` when nothing
/// usable is left after sanitizing.
pub fn local_name_for(asset_name: &str, asset_id: &str) -> String {
    let name = sanitize_asset_name(asset_name);
    if name.is_empty() {
        format!("asset-{}", sanitize_asset_name(asset_id))
    } else {
        name
    }
}
