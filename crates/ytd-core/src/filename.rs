//! Output file naming

/// Sanitize filename for filesystem
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the final file name for a download.
///
/// An empty (or whitespace-only) `requested` name falls back to `title`. The
/// extension is appended when the name does not already end with it; an
/// existing different extension is kept, so `clip.mkv` becomes `clip.mkv.mp4`.
pub fn normalize_file_name(requested: &str, title: &str, extension: &str) -> String {
    let base = if requested.trim().is_empty() {
        title
    } else {
        requested
    };

    let mut name = sanitize_filename(base);
    if name.is_empty() {
        name = "download".to_string();
    }

    let suffix = format!(".{}", extension);
    if !name.ends_with(&suffix) {
        name.push_str(&suffix);
    }
    name
}
