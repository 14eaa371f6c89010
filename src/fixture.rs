use std::path::{Path, PathBuf};

/// Root directory of the prerecorded network traffic used in place of live
/// requests. Each scenario family owns one subdirectory of recordings,
/// addressed by [`FixtureStore::scenario`].
#[derive(Debug, Clone)]
pub struct FixtureStore {
    base_dir: PathBuf,
}

impl FixtureStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn scenario(&self, name: &str) -> FixtureSource {
        FixtureSource {
            dir: self.base_dir.join(name),
        }
    }
}

/// Handle to one scenario's recordings. The harness treats it as opaque and
/// hands it to the extractor factory, which decides how to replay the
/// directory's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }
}
