//! Creation of an empty `.better-env` manifest
//!
//! Initialization is create-or-replace only: it never merges with or appends
//! to existing content, and it refuses to replace an existing manifest unless
//! force mode is requested. Two concurrent force initializations of the same
//! directory are not coordinated; the last writer wins.

use super::CONFIG_FILE_NAME;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Content written to a freshly initialized manifest.
const DEFAULT_CONTENT: &[u8] = b"";

#[derive(Error, Debug)]
pub enum InitError {
    #[error("{} exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to inspect {}: {source}", path.display())]
    StatFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} already exists (use --force to overwrite)", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("write {}: {source}", path.display())]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Options for a single initialization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    /// Directory that will contain the manifest; created when missing
    pub target_dir: PathBuf,
    /// Replace an existing manifest instead of failing
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("."),
            force: false,
        }
    }
}

impl InitOptions {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Path of the manifest these options point at.
    pub fn target_file(&self) -> PathBuf {
        self.target_dir.join(CONFIG_FILE_NAME)
    }
}

pub struct ConfigInitializer {
    options: InitOptions,
}

impl ConfigInitializer {
    pub fn new(options: InitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InitOptions {
        &self.options
    }

    /// Ensure the target directory exists and write an empty manifest into it.
    ///
    /// Returns the path of the written file.
    pub fn initialize(&self) -> Result<PathBuf, InitError> {
        ensure_directory(&self.options.target_dir)?;

        let target = self.options.target_file();
        write_manifest(&target, self.options.force)?;

        info!(path = %target.display(), force = self.options.force, "Created empty manifest");
        Ok(target)
    }
}

impl Default for ConfigInitializer {
    fn default() -> Self {
        Self::new(InitOptions::default())
    }
}

fn ensure_directory(dir: &Path) -> Result<(), InitError> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => {
            debug!(path = %dir.display(), "Target directory exists");
            Ok(())
        }
        Ok(_) => Err(InitError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %dir.display(), "Creating target directory");
            fs::create_dir_all(dir).map_err(|source| InitError::DirectoryCreateFailed {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(InitError::StatFailed {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn write_manifest(target: &Path, force: bool) -> Result<(), InitError> {
    let mut open_options = OpenOptions::new();
    open_options.write(true);
    if force {
        open_options.create(true).truncate(true);
    } else {
        // create_new fails atomically if anything already sits at the path
        open_options.create_new(true);
    }

    let mut file = open_options.open(target).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            InitError::AlreadyExists {
                path: target.to_path_buf(),
            }
        } else {
            InitError::FileWriteFailed {
                path: target.to_path_buf(),
                source,
            }
        }
    })?;

    file.write_all(DEFAULT_CONTENT)
        .map_err(|source| InitError::FileWriteFailed {
            path: target.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_options_point_at_current_directory() {
        let options = InitOptions::default();
        assert_eq!(options.target_dir, PathBuf::from("."));
        assert!(!options.force);
        assert_eq!(options.target_file(), PathBuf::from(".").join(".better-env"));
    }

    #[test]
    fn test_initializer_keeps_options() {
        let options = InitOptions::new("nested/project").with_force(true);
        let initializer = ConfigInitializer::new(options.clone());
        assert_eq!(initializer.options(), &options);
        assert_eq!(ConfigInitializer::default().options(), &InitOptions::default());
    }

    #[test]
    fn test_initialize_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let initializer = ConfigInitializer::new(InitOptions::new(dir.path()));

        let written = initializer.initialize().unwrap();

        assert_eq!(written, dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(fs::metadata(&written).unwrap().len(), 0);
    }

    #[test]
    fn test_existing_file_blocks_without_force() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&target, "API_KEY\n").unwrap();

        let err = ConfigInitializer::new(InitOptions::new(dir.path()))
            .initialize()
            .unwrap_err();

        assert!(matches!(err, InitError::AlreadyExists { .. }));
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "API_KEY\n");
    }

    #[test]
    fn test_force_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&target, "API_KEY\nDB_URL\n").unwrap();

        ConfigInitializer::new(InitOptions::new(dir.path()).with_force(true))
            .initialize()
            .unwrap();

        assert_eq!(fs::metadata(&target).unwrap().len(), 0);
    }

    #[test]
    fn test_file_as_target_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let not_dir = dir.path().join("not-a-dir");
        fs::write(&not_dir, "x").unwrap();

        let err = ConfigInitializer::new(InitOptions::new(&not_dir).with_force(true))
            .initialize()
            .unwrap_err();

        assert!(matches!(err, InitError::NotADirectory { .. }));
    }

    #[test]
    fn test_directory_named_like_manifest_is_not_replaced() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(CONFIG_FILE_NAME)).unwrap();

        let err = ConfigInitializer::new(InitOptions::new(dir.path()))
            .initialize()
            .unwrap_err();
        assert!(matches!(err, InitError::AlreadyExists { .. }));

        let err = ConfigInitializer::new(InitOptions::new(dir.path()).with_force(true))
            .initialize()
            .unwrap_err();
        assert!(matches!(err, InitError::FileWriteFailed { .. }));
    }
}
