use tempfile::TempDir;
use vitrine_core::CollectionStore;
use vitrine_store::FileStore;

/// A collection backed by a fresh temporary directory.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub fn temp_collection() -> (CollectionStore<FileStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open_dir(dir.path()).unwrap();
    (CollectionStore::new(store), dir)
}

/// Reopen the collection stored in `dir`, as a new process would.
pub fn reopen(dir: &TempDir) -> CollectionStore<FileStore> {
    CollectionStore::new(FileStore::open_dir(dir.path()).unwrap())
}
