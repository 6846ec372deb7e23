use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

// Maximum size for snapshot and metadata files: 16MB
const MAX_FILE_SIZE_BYTES: u64 = 16 * 1024 * 1024;

// Characters that cannot appear inside a single directory name
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS.add(b'/').add(b'\\').add(b'%').add(b':');

/// Encodes a case number or case name into a single safe directory name
///
/// Plain ASCII names are left as they are. Non-ASCII bytes, separators, `%`, `:` and
/// control characters are percent-encoded, and the special segments `.` and `..` are
/// encoded as a whole so a case can never resolve outside its parent directory.
///
/// # Examples
///
/// ```
/// use casefile::encode_segment;
///
/// assert_eq!(encode_segment("Kitchen Fire"), "Kitchen Fire");
/// assert_eq!(encode_segment("A/B"), "A%2FB");
/// assert_eq!(encode_segment(".."), "%2E%2E");
/// ```
pub fn encode_segment(segment: &str) -> String {
    match segment {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string(),
    }
}

/// Refuse snapshot and metadata files larger than 16 MiB
///
/// Checks the already-open handle, so the size seen is the size of the file that will
/// be read.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let size = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?
        .len();

    ensure!(
        size <= MAX_FILE_SIZE_BYTES,
        "{} is {} bytes, larger than the {} byte limit",
        path.display(),
        size,
        MAX_FILE_SIZE_BYTES
    );
    Ok(())
}

/// Shorten paths under the user's home directory to `~/...` for display
pub fn format_path_with_tilde(path: &Path) -> String {
    display_relative_to_home(path, dirs::home_dir().as_deref())
}

fn display_relative_to_home(path: &Path, home: Option<&Path>) -> String {
    match home.filter(|home| !home.as_os_str().is_empty()).map(|home| path.strip_prefix(home)) {
        Some(Ok(rest)) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(Ok(rest)) => format!("~/{}", rest.display()),
        _ => path.display().to_string(),
    }
}
