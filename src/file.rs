//! Documents bound to a default location on disk.
//!
//! [`IniFile`] and [`JsonFile`] pair a parsed document with a [`FileLocation`] so
//! that `load()` and `save()` need no arguments. The [`FileContainer`] trait
//! provides the shared load/save flow; `load_from` and `save_to` work on another
//! location and can optionally make it the new default.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tagconf::file::{FileContainer, IniFile};
//!
//! let mut settings = IniFile::new("config", "settings.ini");
//! settings.load()?;
//! settings.set("Display", "width", "1024");
//! settings.save()?;
//! # Ok::<(), tagconf::Error>(())
//! ```

use crate::ini::{self, IniDocument, WriteMode};
use crate::json::{self, JsonDocument};
use crate::{IniOptions, JsonOptions, Result};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Splits a file name at its last `.` into name and extension.
///
/// The extension is returned without the dot. A name without a dot, or whose
/// only dot is the first character, has no extension.
///
/// ```rust
/// use tagconf::file::split_file_name;
///
/// assert_eq!(split_file_name("settings.ini"), ("settings", "ini"));
/// assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", "gz"));
/// assert_eq!(split_file_name("README"), ("README", ""));
/// assert_eq!(split_file_name(".profile"), (".profile", ""));
/// ```
#[must_use]
pub fn split_file_name(file: &str) -> (&str, &str) {
    match file.rfind('.') {
        Some(index) if index > 0 => (&file[..index], &file[index + 1..]),
        _ => (file, ""),
    }
}

/// Directory, base name and extension of a file.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FileLocation {
    pub directory: PathBuf,
    pub name: String,
    pub extension: String,
}

impl FileLocation {
    /// Creates a location from a directory and a full file name.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, file_name: &str) -> Self {
        let (name, extension) = split_file_name(file_name);
        Self::from_parts(directory, name, extension)
    }

    #[must_use]
    pub fn from_parts(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        FileLocation {
            directory: directory.into(),
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// `name.extension`, or just `name` when there is no extension.
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path().exists()
    }
}

/// A document with a default location on disk.
///
/// Implementors supply the format-specific `read_from`/`write_to`; the provided
/// methods handle location bookkeeping.
pub trait FileContainer {
    fn location(&self) -> &FileLocation;

    fn set_location(&mut self, location: FileLocation);

    /// Replaces the document with the content of `path`.
    ///
    /// On [`Error::FileCorrupt`](crate::Error::FileCorrupt) the document is left
    /// empty; on any other error it is unchanged.
    fn read_from(&mut self, path: &Path) -> Result<()>;

    /// Writes the document to `path`; `Ok(false)` when nothing was written.
    fn write_to(&self, path: &Path) -> Result<bool>;

    /// Loads from the default location.
    fn load(&mut self) -> Result<()> {
        let path = self.location().path();
        self.read_from(&path)
    }

    /// Loads from `directory`/`file`. With `make_default`, that location becomes
    /// the default once the load succeeds.
    fn load_from(&mut self, directory: &Path, file: &str, make_default: bool) -> Result<()> {
        let location = FileLocation::new(directory, file);
        self.read_from(&location.path())?;
        if make_default {
            self.set_location(location);
        }
        Ok(())
    }

    /// Saves to the default location.
    fn save(&self) -> Result<bool> {
        self.write_to(&self.location().path())
    }

    fn save_to(&mut self, directory: &Path, file: &str, make_default: bool) -> Result<bool> {
        let location = FileLocation::new(directory, file);
        let written = self.write_to(&location.path())?;
        if make_default {
            self.set_location(location);
        }
        Ok(written)
    }
}

/// An [`IniDocument`] bound to a file.
///
/// Dereferences to the document, so all [`IniDocument`] methods are available.
#[derive(Clone, Debug, Default)]
pub struct IniFile {
    location: FileLocation,
    document: IniDocument,
    options: IniOptions,
    mode: WriteMode,
}

impl IniFile {
    /// Creates an empty document bound to `directory`/`file`. Nothing is read.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, file: &str) -> Self {
        IniFile {
            location: FileLocation::new(directory, file),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: IniOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the mode used by [`save`](FileContainer::save) and
    /// [`save_to`](FileContainer::save_to). Default is [`WriteMode::Always`].
    #[must_use]
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn options(&self) -> &IniOptions {
        &self.options
    }

    #[must_use]
    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> IniDocument {
        self.document
    }

    /// Saves to the default location with an explicit write mode.
    pub fn save_with(&self, mode: WriteMode) -> Result<bool> {
        ini::write_file(&self.document, self.location.path(), mode, &self.options)
    }
}

impl FileContainer for IniFile {
    fn location(&self) -> &FileLocation {
        &self.location
    }

    fn set_location(&mut self, location: FileLocation) {
        debug!(path = %location.path().display(), "ini file location changed");
        self.location = location;
    }

    fn read_from(&mut self, path: &Path) -> Result<()> {
        match ini::from_file(path, &self.options) {
            Ok(document) => {
                self.document = document;
                Ok(())
            }
            Err(err) => {
                if err.is_corrupt() {
                    warn!(path = %path.display(), "clearing ini document after corrupt read");
                    self.document.clear();
                }
                Err(err)
            }
        }
    }

    fn write_to(&self, path: &Path) -> Result<bool> {
        ini::write_file(&self.document, path, self.mode, &self.options)
    }
}

impl Deref for IniFile {
    type Target = IniDocument;

    fn deref(&self) -> &IniDocument {
        &self.document
    }
}

impl DerefMut for IniFile {
    fn deref_mut(&mut self) -> &mut IniDocument {
        &mut self.document
    }
}

/// A [`JsonDocument`] bound to a file.
#[derive(Clone, Debug, Default)]
pub struct JsonFile {
    location: FileLocation,
    document: JsonDocument,
    options: JsonOptions,
}

impl JsonFile {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, file: &str) -> Self {
        JsonFile {
            location: FileLocation::new(directory, file),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    #[must_use]
    pub fn document(&self) -> &JsonDocument {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> JsonDocument {
        self.document
    }
}

impl FileContainer for JsonFile {
    fn location(&self) -> &FileLocation {
        &self.location
    }

    fn set_location(&mut self, location: FileLocation) {
        debug!(path = %location.path().display(), "json file location changed");
        self.location = location;
    }

    fn read_from(&mut self, path: &Path) -> Result<()> {
        match json::from_file(path, &self.options) {
            Ok(document) => {
                self.document = document;
                Ok(())
            }
            Err(err) => {
                // a truncated file leaves nothing trustworthy behind
                if err.is_corrupt() {
                    warn!(path = %path.display(), "clearing json document after corrupt read");
                    self.document = JsonDocument::default();
                }
                Err(err)
            }
        }
    }

    fn write_to(&self, path: &Path) -> Result<bool> {
        json::write_file(self.document.root(), path, &self.options)?;
        Ok(true)
    }
}

impl Deref for JsonFile {
    type Target = JsonDocument;

    fn deref(&self) -> &JsonDocument {
        &self.document
    }
}

impl DerefMut for JsonFile {
    fn deref_mut(&mut self) -> &mut JsonDocument {
        &mut self.document
    }
}
