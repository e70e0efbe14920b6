use crate::core::LocalImagesError;

/// Magic byte signatures; `.` matches any byte
const FILE_SIGNATURES: [[&[u8]; 2]; 22] = [
    // Image
    [b"GIF87a", b"image/gif"],
    [b"GIF89a", b"image/gif"],
    [b"\xFF\xD8\xFF", b"image/jpeg"],
    [b"\x89PNG\x0D\x0A\x1A\x0A", b"image/png"],
    [b"RIFF....WEBP", b"image/webp"],
    [b"\x00\x00\x01\x00", b"image/x-icon"],
    [b"....ftypavif", b"image/avif"],
    [b"BM", b"image/bmp"],
    [b"II*\x00", b"image/tiff"],
    [b"MM\x00*", b"image/tiff"],
    // Audio
    [b"ID3", b"audio/mpeg"],
    [b"\xFF\x0E", b"audio/mpeg"],
    [b"\xFF\x0F", b"audio/mpeg"],
    [b"OggS", b"audio/ogg"],
    [b"RIFF....WAVEfmt ", b"audio/wav"],
    [b"fLaC", b"audio/x-flac"],
    // Video
    [b"RIFF....AVI LIST", b"video/avi"],
    [b"....ftyp", b"video/mp4"],
    [b"\x00\x00\x01\x0B", b"video/mpeg"],
    [b"....moov", b"video/quicktime"],
    [b"\x1A\x45\xDF\xA3", b"video/webm"],
    [b"\x00\x00\x01\xBA", b"video/mpeg"],
];

/// Media types paired with the extension appended for them
const MEDIA_TYPE_EXTENSIONS: &[(&str, &str)] = &[
    ("image/gif", "gif"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/webp", "webp"),
    ("image/x-icon", "ico"),
    ("image/avif", "avif"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tif"),
    ("audio/mpeg", "mp3"),
    ("audio/ogg", "ogg"),
    ("audio/wav", "wav"),
    ("audio/x-flac", "flac"),
    ("video/avi", "avi"),
    ("video/mp4", "mp4"),
    ("video/mpeg", "mpeg"),
    ("video/quicktime", "mov"),
    ("video/webm", "webm"),
];

/// How many leading bytes are searched for an inline SVG root element
const SVG_SNIFF_WINDOW: usize = 1024;

fn signature_matches(signature: &[u8], data: &[u8]) -> bool {
    data.len() >= signature.len()
        && signature
            .iter()
            .zip(data)
            .all(|(expected, actual)| *expected == b'.' || expected == actual)
}

fn looks_like_svg(data: &[u8]) -> bool {
    let window = &data[..data.len().min(SVG_SNIFF_WINDOW)];
    let text = String::from_utf8_lossy(window);
    let text = text.trim_start_matches('\u{feff}').trim_start();

    (text.starts_with("<svg") || text.starts_with("<?xml") || text.starts_with("<!DOCTYPE svg"))
        && text.contains("<svg")
}

/// Determines the media type of data based on its content signature
pub fn detect_media_type(data: &[u8]) -> Option<&'static str> {
    for signature in &FILE_SIGNATURES {
        if signature_matches(signature[0], data) {
            return std::str::from_utf8(signature[1]).ok();
        }
    }

    if looks_like_svg(data) {
        return Some("image/svg+xml");
    }

    None
}

/// Determines the media type based on file extension
pub fn detect_media_type_by_file_name(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let extension = extension.to_lowercase();

    let media_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" | "jfif" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/x-flac",
        "mp4" => "video/mp4",
        "avi" => "video/avi",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mpeg" | "mpg" => "video/mpeg",
        _ => return None,
    };

    Some(media_type)
}

/// File extension used for a given media type
pub fn extension_for_media_type(media_type: &str) -> Option<&'static str> {
    MEDIA_TYPE_EXTENSIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(media_type))
        .map(|(_, extension)| *extension)
}

/// Makes sure a base file name carries an extension
///
/// Names that already end in a recognized extension are returned unchanged;
/// anything else gets the extension inferred from the downloaded bytes.
pub fn resolve_extension(base: &str, data: &[u8]) -> Result<String, LocalImagesError> {
    if detect_media_type_by_file_name(base).is_some() {
        return Ok(base.to_string());
    }

    detect_media_type(data)
        .and_then(extension_for_media_type)
        .map(|extension| format!("{base}.{extension}"))
        .ok_or_else(|| LocalImagesError::UnknownExtension {
            file_name: base.to_string(),
        })
}
