//! Moving the data folder (database and clip images) to a custom location.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::SettingsStore;

/// Name of the folder created inside a user-chosen directory.
pub const DATA_FOLDER_NAME: &str = "pastebar-data";
/// File name of the history database.
pub const DB_FILE_NAME: &str = "pastebar-db.data";
/// Image folders stored next to the database.
pub const IMAGE_FOLDERS: [&str; 2] = ["clip-images", "clipboard-images"];

const WRITE_PROBE: &str = ".pastebar-write-test";

/// Errors raised while choosing or switching the data folder.
#[derive(Debug, Error)]
pub enum DataLocationError {
    /// The selected path does not exist.
    #[error("selected path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    /// The selected path is a file.
    #[error("selected path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// A test file could not be written into the selected directory.
    #[error("selected directory is not writable: {}", path.display())]
    NotWritable {
        /// Selected directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The selected folder is the one already in use.
    #[error("{} is already the data folder", .0.display())]
    SameAsCurrent(PathBuf),
    /// Reading directory metadata failed.
    #[error("failed to inspect {}", path.display())]
    Inspect {
        /// Inspected path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Creating the data folder failed.
    #[error("failed to create {}", path.display())]
    CreateDirectory {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Copying the database or images failed.
    #[error("failed to copy {} to {}", from.display(), to.display())]
    Copy {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The database operation is neither none nor copy.
    #[error("unknown database operation: {0} (expected none or copy)")]
    UnknownOperation(String),
}

/// What a selected directory already contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathStatus {
    /// Nothing at all.
    Empty,
    /// Unrelated files.
    NotEmpty,
    /// A `pastebar-data` folder that can be reused.
    HasPastebarDataSubfolder,
    /// The directory itself holds PasteBar data.
    IsPastebarDataAndNotEmpty,
}

/// Classify the content of `path`.
///
/// # Errors
/// Returns [`DataLocationError::Inspect`] when the directory cannot be read.
pub fn check_custom_data_path(path: &Path) -> Result<PathStatus, DataLocationError> {
    let inspect = |source| DataLocationError::Inspect {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(path).map_err(inspect)?;
    if entries.next().transpose().map_err(inspect)?.is_none() {
        return Ok(PathStatus::Empty);
    }

    let is_data_folder = path.file_name().is_some_and(|name| name == DATA_FOLDER_NAME);
    if is_data_folder || path.join(DB_FILE_NAME).is_file() {
        return Ok(PathStatus::IsPastebarDataAndNotEmpty);
    }
    if path.join(DATA_FOLDER_NAME).is_dir() {
        return Ok(PathStatus::HasPastebarDataSubfolder);
    }
    Ok(PathStatus::NotEmpty)
}

/// User prompts raised while choosing a data folder.
pub trait Dialog {
    /// Show an informational message.
    fn message(&mut self, text: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, text: &str) -> bool;
}

/// Turn a user-selected directory into the data folder to use.
///
/// Returns `None` when the user declines to create a `pastebar-data` folder.
///
/// # Errors
/// Returns an error when the directory cannot be inspected or the data folder
/// cannot be created.
pub fn resolve_data_folder(selected: &Path, dialog: &mut impl Dialog) -> Result<Option<PathBuf>, DataLocationError> {
    match check_custom_data_path(selected)? {
        PathStatus::Empty => Ok(Some(selected.to_path_buf())),
        PathStatus::HasPastebarDataSubfolder => {
            dialog.message(&format!(
                "Found existing \"{DATA_FOLDER_NAME}\" folder. The application will use this folder to store data."
            ));
            Ok(Some(selected.join(DATA_FOLDER_NAME)))
        }
        PathStatus::NotEmpty => {
            let create = dialog.confirm(&format!(
                "The selected folder is not empty and does not contain PasteBar data files. \
                 Do you want to create a \"{DATA_FOLDER_NAME}\" subfolder to store the data?"
            ));
            if !create {
                return Ok(None);
            }
            let folder = selected.join(DATA_FOLDER_NAME);
            fs::create_dir_all(&folder).map_err(|source| DataLocationError::CreateDirectory {
                path: folder.clone(),
                source,
            })?;
            Ok(Some(folder))
        }
        PathStatus::IsPastebarDataAndNotEmpty => {
            dialog.message(
                "This folder already contains PasteBar data. The application will use this existing data after restart.",
            );
            Ok(Some(selected.to_path_buf()))
        }
    }
}

/// Check that `path` can become the data folder.
///
/// # Errors
/// Returns an error when `path` equals `current`, is missing, is not a
/// directory, or cannot be written to.
pub fn validate_custom_db_path(path: &Path, current: Option<&Path>) -> Result<(), DataLocationError> {
    if current == Some(path) {
        return Err(DataLocationError::SameAsCurrent(path.to_path_buf()));
    }
    if !path.exists() {
        return Err(DataLocationError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(DataLocationError::NotADirectory(path.to_path_buf()));
    }
    let probe = path.join(WRITE_PROBE);
    fs::write(&probe, b"").and_then(|()| fs::remove_file(&probe)).map_err(|source| {
        DataLocationError::NotWritable {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// What happens to the existing data when the folder changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbOperation {
    /// Start with whatever the new folder holds.
    #[default]
    None,
    /// Copy the database and images into the new folder.
    Copy,
}

impl DbOperation {
    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
        }
    }
}

impl fmt::Display for DbOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbOperation {
    type Err = DataLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "copy" => Ok(Self::Copy),
            _ => Err(DataLocationError::UnknownOperation(s.to_owned())),
        }
    }
}

/// Platform default data folder.
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("app.anothervision.pasteBar"))
}

/// Applies data folder changes to a [`SettingsStore`].
///
/// A successful change requires an application restart.
#[derive(Debug)]
pub struct DataLocationManager<'a> {
    store: &'a SettingsStore,
    default_dir: PathBuf,
}

impl<'a> DataLocationManager<'a> {
    /// Manager falling back to `default_dir` when no custom path is set.
    pub fn new(store: &'a SettingsStore, default_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            default_dir: default_dir.into(),
        }
    }

    /// Folder currently holding the data.
    #[must_use]
    pub fn current_data_dir(&self) -> PathBuf {
        self.store
            .snapshot()
            .custom_db_path
            .unwrap_or_else(|| self.default_dir.clone())
    }

    /// Switch the data folder to `new_path` after confirmation.
    ///
    /// Returns `Ok(false)` when the user cancels. When copying fails the
    /// settings revert to the default folder and the error is returned.
    ///
    /// # Errors
    /// Returns validation errors for `new_path` and any copy failure.
    pub fn apply(
        &self,
        new_path: &Path,
        operation: DbOperation,
        dialog: &mut impl Dialog,
    ) -> Result<bool, DataLocationError> {
        let current = self.store.snapshot().custom_db_path;
        validate_custom_db_path(new_path, current.as_deref())?;

        let question = match operation {
            DbOperation::None => format!(
                "Are you sure you want to set \"{}\" as the new data folder? The application will restart.",
                new_path.display()
            ),
            DbOperation::Copy => format!(
                "Are you sure you want to {operation} the database to \"{}\"? The application will restart.",
                new_path.display()
            ),
        };
        if !dialog.confirm(&question) {
            return Ok(false);
        }

        if let Err(err) = self.switch_to(new_path, operation) {
            warn!(error = %err, "failed to apply custom data folder, reverting to default");
            self.store.set_custom_db_path(None);
            return Err(err);
        }
        info!(path = %new_path.display(), %operation, "data folder changed");
        Ok(true)
    }

    /// Go back to the default data folder after confirmation.
    ///
    /// Returns `false` when the user cancels.
    pub fn revert_to_default(&self, dialog: &mut impl Dialog) -> bool {
        if !dialog.confirm(
            "Are you sure you want to revert to the default database location? The application will restart.",
        ) {
            return false;
        }
        self.store.set_custom_db_path(None);
        info!(path = %self.default_dir.display(), "data folder reverted to default");
        true
    }

    fn switch_to(&self, new_path: &Path, operation: DbOperation) -> Result<(), DataLocationError> {
        if operation == DbOperation::Copy {
            copy_data(&self.current_data_dir(), new_path)?;
        }
        self.store.set_custom_db_path(Some(new_path.to_path_buf()));
        Ok(())
    }
}

/// Copy the database file and image folders from `from` into `to`.
fn copy_data(from: &Path, to: &Path) -> Result<(), DataLocationError> {
    let db = from.join(DB_FILE_NAME);
    if db.is_file() {
        let target = to.join(DB_FILE_NAME);
        fs::copy(&db, &target).map_err(|source| DataLocationError::Copy {
            from: db.clone(),
            to: target.clone(),
            source,
        })?;
    }
    for folder in IMAGE_FOLDERS {
        let source_dir = from.join(folder);
        if source_dir.is_dir() {
            let target_dir = to.join(folder);
            copy_dir(&source_dir, &target_dir).map_err(|source| DataLocationError::Copy {
                from: source_dir.clone(),
                to: target_dir.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Default)]
    struct ScriptedDialog {
        answer: bool,
        messages: Vec<String>,
        questions: Vec<String>,
    }

    impl Dialog for ScriptedDialog {
        fn message(&mut self, text: &str) {
            self.messages.push(text.to_owned());
        }

        fn confirm(&mut self, text: &str) -> bool {
            self.questions.push(text.to_owned());
            self.answer
        }
    }

    #[test]
    fn path_status_classification() -> io::Result<()> {
        let dir = tempdir()?;
        assert_eq!(check_custom_data_path(dir.path()).ok(), Some(PathStatus::Empty));

        fs::write(dir.path().join("notes.txt"), "hello")?;
        assert_eq!(check_custom_data_path(dir.path()).ok(), Some(PathStatus::NotEmpty));

        fs::create_dir(dir.path().join(DATA_FOLDER_NAME))?;
        assert_eq!(
            check_custom_data_path(dir.path()).ok(),
            Some(PathStatus::HasPastebarDataSubfolder)
        );

        fs::write(dir.path().join(DB_FILE_NAME), "db")?;
        assert_eq!(
            check_custom_data_path(dir.path()).ok(),
            Some(PathStatus::IsPastebarDataAndNotEmpty)
        );

        let data = dir.path().join(DATA_FOLDER_NAME);
        fs::write(data.join("anything"), "x")?;
        assert_eq!(
            check_custom_data_path(&data).ok(),
            Some(PathStatus::IsPastebarDataAndNotEmpty)
        );
        Ok(())
    }

    #[test]
    fn missing_directory_cannot_be_inspected() {
        let Err(err) = check_custom_data_path(Path::new("/definitely/not/here")) else {
            panic!("missing directory should error");
        };
        assert!(matches!(err, DataLocationError::Inspect { .. }));
    }

    #[test]
    fn non_empty_folder_gets_a_data_subfolder() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("notes.txt"), "hello")?;

        let mut declined = ScriptedDialog::default();
        assert_eq!(resolve_data_folder(dir.path(), &mut declined)?, None);
        assert!(!dir.path().join(DATA_FOLDER_NAME).exists());

        let mut accepted = ScriptedDialog {
            answer: true,
            ..ScriptedDialog::default()
        };
        let folder = resolve_data_folder(dir.path(), &mut accepted)?;
        assert_eq!(folder, Some(dir.path().join(DATA_FOLDER_NAME)));
        assert!(dir.path().join(DATA_FOLDER_NAME).is_dir());
        assert_eq!(accepted.questions.len(), 1);
        Ok(())
    }

    #[test]
    fn existing_data_is_reused_with_a_message() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join(DATA_FOLDER_NAME))?;
        fs::write(dir.path().join("other"), "x")?;

        let mut dialog = ScriptedDialog::default();
        let folder = resolve_data_folder(dir.path(), &mut dialog)?;
        assert_eq!(folder, Some(dir.path().join(DATA_FOLDER_NAME)));
        assert_eq!(dialog.messages.len(), 1);
        assert!(dialog.questions.is_empty());

        let empty = tempdir()?;
        assert_eq!(
            resolve_data_folder(empty.path(), &mut dialog)?,
            Some(empty.path().to_path_buf())
        );
        Ok(())
    }

    #[test]
    fn validation_rules() -> io::Result<()> {
        let dir = tempdir()?;
        assert!(validate_custom_db_path(dir.path(), None).is_ok());
        assert!(!dir.path().join(WRITE_PROBE).exists());
        assert!(matches!(
            validate_custom_db_path(dir.path(), Some(dir.path())),
            Err(DataLocationError::SameAsCurrent(_))
        ));
        assert!(matches!(
            validate_custom_db_path(&dir.path().join("missing"), None),
            Err(DataLocationError::NotFound(_))
        ));
        let file = dir.path().join("file");
        fs::write(&file, "x")?;
        assert!(matches!(
            validate_custom_db_path(&file, None),
            Err(DataLocationError::NotADirectory(_))
        ));
        Ok(())
    }

    #[test]
    fn apply_with_copy_moves_data_and_updates_store() -> Result<(), Box<dyn std::error::Error>> {
        let default_dir = tempdir()?;
        fs::write(default_dir.path().join(DB_FILE_NAME), "db")?;
        fs::create_dir_all(default_dir.path().join("clip-images").join("2024"))?;
        fs::write(default_dir.path().join("clip-images").join("2024").join("a.png"), "png")?;
        let target = tempdir()?;

        let store = SettingsStore::default();
        let manager = DataLocationManager::new(&store, default_dir.path());
        let mut dialog = ScriptedDialog {
            answer: true,
            ..ScriptedDialog::default()
        };
        assert!(manager.apply(target.path(), DbOperation::Copy, &mut dialog)?);
        assert!(dialog.questions[0].contains("copy the database"));
        assert_eq!(store.snapshot().custom_db_path.as_deref(), Some(target.path()));
        assert!(target.path().join(DB_FILE_NAME).is_file());
        assert!(target.path().join("clip-images").join("2024").join("a.png").is_file());
        assert_eq!(manager.current_data_dir(), target.path());
        Ok(())
    }

    #[test]
    fn cancelled_apply_and_revert_change_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let default_dir = tempdir()?;
        let target = tempdir()?;
        let store = SettingsStore::default();
        let manager = DataLocationManager::new(&store, default_dir.path());
        let mut dialog = ScriptedDialog::default();

        assert!(!manager.apply(target.path(), DbOperation::None, &mut dialog)?);
        assert_eq!(store.snapshot().custom_db_path, None);

        store.set_custom_db_path(Some(target.path().to_path_buf()));
        assert!(!manager.revert_to_default(&mut dialog));
        assert!(store.snapshot().custom_db_path.is_some());

        dialog.answer = true;
        assert!(manager.revert_to_default(&mut dialog));
        assert_eq!(manager.current_data_dir(), default_dir.path());
        Ok(())
    }

    #[test]
    fn applying_the_current_folder_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let target = tempdir()?;
        let store = SettingsStore::default();
        store.set_custom_db_path(Some(target.path().to_path_buf()));
        let manager = DataLocationManager::new(&store, "/unused");
        let mut dialog = ScriptedDialog {
            answer: true,
            ..ScriptedDialog::default()
        };
        let Err(err) = manager.apply(target.path(), DbOperation::None, &mut dialog) else {
            panic!("current folder should be rejected");
        };
        assert!(matches!(err, DataLocationError::SameAsCurrent(_)));
        assert!(dialog.questions.is_empty());
        Ok(())
    }

    #[test]
    fn operation_parses() {
        assert_eq!("Copy".parse::<DbOperation>().ok(), Some(DbOperation::Copy));
        assert_eq!("none".parse::<DbOperation>().ok(), Some(DbOperation::None));
        assert!("move".parse::<DbOperation>().is_err());
    }
}
