use std::{io, env, fs, path::{Path, PathBuf}, ops::Deref, fmt::{self, Formatter, Display}};
use tempfile::TempDir;

pub const TEST_DATA_DIR: &str = "tests/test-data";

/// A copy of a `tests/test-data` file or directory, living within its own temporary directory.
pub struct Fixture {
    path    : PathBuf,
    source  : PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    /// Reserve a path named after `fixture_name` within a fresh temporary directory. Nothing is created.
    pub fn blank(fixture_name: &str) -> Self {
        let root_dir = env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR");
        let source = Path::new(&root_dir).join(TEST_DATA_DIR).join(fixture_name);

        let tempdir = tempfile::tempdir().expect("Failed to generate temp directory");
        let path = tempdir.path().join(fixture_name.trim_end_matches('/'));
        Self { path, source, _tempdir: tempdir }
    }

    /// Copy a test-data file or directory into a fresh temporary directory.
    pub fn copy(fixture_name: &str) -> Self {
        let fixture = Self::blank(fixture_name);
        if fixture.source.is_dir() {
            copy_dir_all(&fixture.source, &fixture.path).expect("Failed to copy directory");
        } else {
            fs::create_dir_all(fixture.path.parent().expect("No parent directory")).expect("Failed to create directory");
            fs::copy(&fixture.source, &fixture.path).expect("Failed to copy Fixture files.");
        }
        fixture
    }
}

fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> io::Result<()> {
    fs::create_dir_all(&dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        match entry.file_type()?.is_dir() {
            true  => copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?,
            false => {fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;},
        }
    }
    Ok(())
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
