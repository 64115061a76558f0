use ahash::AHashSet;
use console::Term;
use std::path::Path;

pub mod emojis {
    use console::Emoji;
    pub static SWEEP: Emoji<'_, '_> = Emoji("🧹 ", "");
    pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
    pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
    pub static SPARKLES: Emoji<'_, '_> = Emoji("✨ ", "");
    pub static LINE_CLEAR: &str = "\x1b[2K\r";
}

/// Extensions selected when neither the config file nor the command line
/// names any.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["c", "h"];

/// Check if we're running in a TTY (interactive terminal)
pub fn is_tty() -> bool {
    Term::stdout().is_term() && Term::stderr().is_term()
}

/// Normalize a user supplied extension: `.C` and `c` both become `c`.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

pub fn is_source_file(extension: &str, extensions: &AHashSet<String>) -> bool {
    extensions.contains(&extension.to_ascii_lowercase())
}

/// Whether the extension of `path` is one of `extensions`.
pub fn has_source_extension(path: &Path, extensions: &AHashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| is_source_file(ext, extensions))
}

/// Format timing string, returning empty string if no_timing is true
pub fn timing(duration_seconds: f64, no_timing: bool) -> String {
    if no_timing {
        String::new()
    } else {
        format!(" in {:.2}s", duration_seconds)
    }
}
