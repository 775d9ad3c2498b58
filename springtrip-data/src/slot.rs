//! File-backed [`SlotStore`]: one JSON file per slot inside a directory.

use camino::{Utf8Path, Utf8PathBuf};
use springtrip_core::{PersistError, SlotStore};

/// Stores each slot as `<dir>/<slot>.json`.
///
/// The directory is created on first write. Writes replace the file
/// atomically, so a crash mid-save leaves the previous trip intact.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: Utf8PathBuf,
}

impl FileSlotStore {
    /// Keep slots under `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Path of the file backing `slot`.
    ///
    /// Slot names are plain file stems; separators and relative components
    /// are refused.
    pub fn slot_path(&self, slot: &str) -> Option<Utf8PathBuf> {
        let valid = !slot.is_empty()
            && !slot.starts_with('.')
            && !slot.contains(['/', '\\'])
            && slot != "..";
        valid.then(|| self.dir.join(format!("{slot}.json")))
    }

    fn resolve(&self, slot: &str) -> Result<Utf8PathBuf, String> {
        self.slot_path(slot)
            .ok_or_else(|| format!("{slot:?} is not a valid slot name"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, PersistError> {
        let read_error = |message: String| PersistError::Read {
            slot: slot.to_owned(),
            message,
        };
        let path = self.resolve(slot).map_err(read_error)?;
        springtrip_fs::read_to_string_if_exists(&path).map_err(|err| read_error(err.to_string()))
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), PersistError> {
        let write_error = |message: String| PersistError::Write {
            slot: slot.to_owned(),
            message,
        };
        let path = self.resolve(slot).map_err(write_error)?;
        springtrip_fs::write_atomic(&path, value).map_err(|err| write_error(err.to_string()))
    }

    fn remove(&self, slot: &str) -> Result<(), PersistError> {
        let write_error = |message: String| PersistError::Write {
            slot: slot.to_owned(),
            message,
        };
        let path = self.resolve(slot).map_err(write_error)?;
        springtrip_fs::remove_if_exists(&path).map_err(|err| write_error(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use springtrip_core::TRIP_SLOT;
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    fn store_in(dir: &TempDir) -> FileSlotStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("state")).expect("utf-8");
        FileSlotStore::new(path)
    }

    #[rstest]
    fn unwritten_slots_read_as_none(dir: TempDir) {
        assert_eq!(store_in(&dir).read(TRIP_SLOT).expect("read"), None);
    }

    #[rstest]
    fn writes_overwrite_and_remove_clears(dir: TempDir) {
        let store = store_in(&dir);
        store.write(TRIP_SLOT, "one").expect("write");
        store.write(TRIP_SLOT, "two").expect("overwrite");
        assert_eq!(store.read(TRIP_SLOT).expect("read").as_deref(), Some("two"));
        assert!(store.dir().join("springtrip.trip.json").is_file());

        store.remove(TRIP_SLOT).expect("remove");
        store.remove(TRIP_SLOT).expect("remove again");
        assert_eq!(store.read(TRIP_SLOT).expect("read"), None);
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("../escape")]
    #[case(".hidden")]
    fn unsafe_slot_names_are_refused(dir: TempDir, #[case] slot: &str) {
        let store = store_in(&dir);
        assert!(matches!(
            store.write(slot, "x"),
            Err(PersistError::Write { .. })
        ));
        assert!(matches!(store.read(slot), Err(PersistError::Read { .. })));
    }
}
