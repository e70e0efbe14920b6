use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
pub use url::Url;

/// Characters escaped when an asset file name is embedded into markup
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Used when a locator has no usable last path segment (e.g. `https://example.com/`)
pub const FALLBACK_FILE_NAME: &str = "image";

/// Checks whether an attribute value points at a remote HTTP(S) resource
///
/// Relative paths, root-relative paths, protocol-relative references and
/// every other scheme (`data:`, `file:`, ...) are considered local.
pub fn is_external_url(value: &str) -> bool {
    let value = value.trim();

    let has_http_scheme = ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    if !has_http_scheme {
        return false;
    }

    match Url::parse(value) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

/// Extracts the last path segment of a locator, without query string or fragment
///
/// The segment gets percent-decoded so that the on-disk name is readable;
/// path separators that were hidden behind escapes are replaced with `_`.
pub fn locator_file_name(locator: &str) -> String {
    let segment: String = match Url::parse(locator.trim()) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string(),
        Err(_) => {
            let without_fragment = locator.split('#').next().unwrap_or_default();
            let without_query = without_fragment.split('?').next().unwrap_or_default();
            without_query
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        }
    };

    let decoded = percent_decode_str(&segment)
        .decode_utf8_lossy()
        .replace(['/', '\\'], "_");
    let trimmed = decoded.trim().trim_start_matches('.');

    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Composes the reference embedded into markup: `{asset_path}/{file_name}`
pub fn public_asset_path(asset_path: &str, file_name: &str) -> String {
    let encoded_file_name = utf8_percent_encode(file_name, PATH_SEGMENT).to_string();
    let asset_path = asset_path.trim_end_matches('/');

    if asset_path.is_empty() {
        format!("/{encoded_file_name}")
    } else {
        format!("{asset_path}/{encoded_file_name}")
    }
}

/// Directory under the distribution root that holds localized assets
///
/// `asset_path` doubles as a public URL prefix, so a leading slash is
/// stripped before it gets joined onto the filesystem root.
pub fn asset_directory(dist_path: &Path, asset_path: &str) -> PathBuf {
    let relative = asset_path.trim_matches('/');

    if relative.is_empty() {
        dist_path.to_path_buf()
    } else {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(dist_path.to_path_buf(), |path, part| path.join(part))
    }
}
