//! MIME type detection module
//!
//! Content-Type of a front-end build artifact, by file extension.

use std::path::Path;

/// Get MIME Content-Type for a file path
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    get_content_type(ext.as_deref())
}

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("pdf") => "application/pdf",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_end_artifacts() {
        assert_eq!(
            content_type_for(Path::new("dist/index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            content_type_for(Path::new("dist/assets/index-3f2a.js")),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(
            content_type_for(Path::new("dist/assets/index-3f2a.js.map")),
            "application/json"
        );
        assert_eq!(
            content_type_for(Path::new("dist/site.webmanifest")),
            "application/manifest+json"
        );
    }

    #[test]
    fn test_extension_case_and_unknown() {
        assert_eq!(content_type_for(Path::new("LOGO.PNG")), "image/png");
        assert_eq!(
            content_type_for(Path::new("README")),
            "application/octet-stream"
        );
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
    }
}
