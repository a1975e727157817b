//! Line-oriented parser for `.better-env` manifests
//!
//! ```text
//! # comment line, ignored
//! VARIABLE_NAME_ONE
//!    WHITESPACE_TRIMMED_NAME
//! ```
//!
//! Blank lines and lines whose first non-whitespace character is `#` are
//! skipped. Every other line is trimmed and kept verbatim, in file order,
//! duplicates included. The parser does not judge whether a name is a valid
//! identifier; see [`ConfigValidator`](super::ConfigValidator) for that.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Declared variable names in file order.
pub type DeclarationList = Vec<String>;

const COMMENT_PREFIX: char = '#';

#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("failed to open {}: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {} at line {line}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ConfigParseError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigParseError::OpenFailed { path, .. } | ConfigParseError::ReadFailed { path, .. } => {
                path
            }
        }
    }
}

/// Apply the per-line rule: `Some(name)` for a declaration, `None` for a
/// blank or comment line.
pub fn parse_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse the manifest at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DeclarationList, ConfigParseError> {
    let path = path.as_ref();
    let open_failed = |source| ConfigParseError::OpenFailed {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_failed)?;

    // A directory opens fine on unix; only reading it fails.
    if file.metadata().map_err(open_failed)?.is_dir() {
        return Err(open_failed(io::Error::other("is a directory")));
    }

    let declarations = collect(BufReader::new(file), path)?;
    debug!(path = %path.display(), count = declarations.len(), "Parsed manifest");
    Ok(declarations)
}

/// Parse manifest content from any buffered reader. `origin` names the
/// source in errors.
pub fn parse_reader<R: BufRead>(
    reader: R,
    origin: impl AsRef<Path>,
) -> Result<DeclarationList, ConfigParseError> {
    collect(reader, origin.as_ref())
}

/// Parse manifest content already held in memory.
pub fn parse_str(content: &str) -> DeclarationList {
    content
        .lines()
        .filter_map(parse_line)
        .map(str::to_string)
        .collect()
}

fn collect<R: BufRead>(reader: R, origin: &Path) -> Result<DeclarationList, ConfigParseError> {
    let mut declarations = Vec::new();

    for (index, raw) in reader.split(b'\n').enumerate() {
        let line_number = index + 1;
        let read_failed = |source| ConfigParseError::ReadFailed {
            path: origin.to_path_buf(),
            line: line_number,
            source,
        };

        let mut raw = raw.map_err(read_failed)?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        match String::from_utf8(raw) {
            Ok(line) => match parse_line(&line) {
                Some(name) => declarations.push(name.to_string()),
                None => trace!(line = line_number, "Skipping blank or comment line"),
            },
            // Comments and blanks are skipped whatever their encoding; a
            // declaration must be valid UTF-8.
            Err(e) => {
                if parse_line(&String::from_utf8_lossy(e.as_bytes())).is_some() {
                    return Err(read_failed(io::Error::new(io::ErrorKind::InvalidData, e)));
                }
                trace!(line = line_number, "Skipping non-UTF-8 comment line");
            }
        }
    }

    Ok(declarations)
}
