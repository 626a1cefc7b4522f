use std::path::{self, Path};

use tracing::warn;

/// Path of `file` relative to the storage `root`, as reported upstream.
///
/// Both paths are made absolute first so a relative root such as
/// `./recordings` works. If that fails, or `file` is not under the resolved
/// root, the configured root is removed as a literal prefix instead.
pub fn relative_to_root(root: &Path, file: &Path) -> String {
    let resolved = path::absolute(root).and_then(|r| path::absolute(file).map(|f| (r, f)));

    match resolved {
        Ok((abs_root, abs_file)) => match abs_file.strip_prefix(&abs_root) {
            Ok(relative) => relative.to_string_lossy().into_owned(),
            Err(_) => {
                warn!(
                    root = ?abs_root,
                    file = ?abs_file,
                    "File is not under the storage root, falling back to prefix trimming"
                );
                strip_literal_prefix(root, file)
            }
        },
        Err(e) => {
            warn!(
                root = ?root,
                error = %e,
                "Could not resolve storage root, falling back to prefix trimming"
            );
            strip_literal_prefix(root, file)
        }
    }
}

/// Remove `root` from the front of `file` as plain text, then any leading
/// separators.
pub fn strip_literal_prefix(root: &Path, file: &Path) -> String {
    let root = root.to_string_lossy();
    let file = file.to_string_lossy();
    let rest = file.strip_prefix(root.as_ref()).unwrap_or(&file);
    rest.trim_start_matches(path::MAIN_SEPARATOR).to_string()
}
