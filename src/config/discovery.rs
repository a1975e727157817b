//! Locating a project's manifest on disk

use super::parser::{parse_file, ConfigParseError, DeclarationList};
use super::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Search `start` and then each of its ancestors for a `.better-env` file.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    find_config_file_within(start, None)
}

/// Like [`find_config_file`], but `ceiling` is the last directory checked.
pub fn find_config_file_within(start: &Path, ceiling: Option<&Path>) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        debug!(path = %candidate.display(), "Looking for manifest");
        if candidate.is_file() {
            return Some(candidate);
        }
        if ceiling == Some(dir) {
            break;
        }
    }
    None
}

/// Parse the manifest that sits directly in `project_root`.
pub fn load_declarations(project_root: &Path) -> Result<DeclarationList, ConfigParseError> {
    parse_file(project_root.join(CONFIG_FILE_NAME))
}
