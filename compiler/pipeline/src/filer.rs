//! Resource access for registry files.
//!
//! A [`Filer`] hands out scoped read and write handles for named resources in
//! the class output location. Handles close when dropped, so every exit path
//! from a merge releases them.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Access to named resources in the output location
pub trait Filer {
    /// Open an existing resource for reading.
    ///
    /// A resource that does not exist yields an error of kind
    /// [`io::ErrorKind::NotFound`].
    fn open_resource(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;

    /// Create (or truncate) a resource for writing.
    fn create_resource(&mut self, name: &str) -> io::Result<Box<dyn Write + '_>>;

    /// Human-readable location of a resource, used in log output.
    fn describe(&self, name: &str) -> String { name.to_string() }
}

/// Filer rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FsFiler {
    root: PathBuf,
}

impl FsFiler {
    /// Create a filer writing below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Output directory
    pub fn root(&self) -> &Path { &self.root }

    fn path_of(&self, name: &str) -> PathBuf { path::resource_path(&self.root, name) }
}

impl Filer for FsFiler {
    fn open_resource(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.path_of(name))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create_resource(&mut self, name: &str) -> io::Result<Box<dyn Write + '_>> {
        let path = self.path_of(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Box::new(File::create(path)?))
    }

    fn describe(&self, name: &str) -> String { self.path_of(name).display().to_string() }
}

#[cfg(feature = "test-utils")]
pub use memory::MemoryFiler;

#[cfg(feature = "test-utils")]
mod memory {
    use std::collections::{BTreeMap, BTreeSet};
    use std::io::{self, Cursor, Read, Write};

    use super::Filer;

    /// In-memory filer that counts writes and can fail on demand
    #[derive(Debug, Default, Clone)]
    pub struct MemoryFiler {
        resources: BTreeMap<String, Vec<u8>>,
        writes: usize,
        failing_reads: BTreeSet<String>,
        failing_writes: BTreeSet<String>,
    }

    impl MemoryFiler {
        /// Create an empty filer
        pub fn new() -> Self { Self::default() }

        /// Add a resource with the given contents
        pub fn with_resource(mut self, name: &str, contents: &str) -> Self {
            self.insert(name, contents);
            self
        }

        /// Store `contents` under `name`, replacing anything there
        pub fn insert(&mut self, name: &str, contents: &str) {
            self.resources.insert(name.to_string(), contents.as_bytes().to_vec());
        }

        /// Contents of a resource, if it exists
        pub fn contents(&self, name: &str) -> Option<String> {
            self.resources.get(name).map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }

        /// Names of all stored resources
        pub fn resource_names(&self) -> Vec<&str> { self.resources.keys().map(String::as_str).collect() }

        /// Number of resources created so far
        pub fn write_count(&self) -> usize { self.writes }

        /// Make every read of `name` fail
        pub fn fail_reads_of(&mut self, name: &str) { self.failing_reads.insert(name.to_string()); }

        /// Make every write of `name` fail
        pub fn fail_writes_of(&mut self, name: &str) { self.failing_writes.insert(name.to_string()); }
    }

    impl Filer for MemoryFiler {
        fn open_resource(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
            if self.failing_reads.contains(name) {
                return Err(io::Error::new(io::ErrorKind::Other, format!("cannot read {}", name)));
            }
            match self.resources.get(name) {
                Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
                None => Err(io::Error::new(io::ErrorKind::NotFound, format!("{} not found", name))),
            }
        }

        fn create_resource(&mut self, name: &str) -> io::Result<Box<dyn Write + '_>> {
            if self.failing_writes.contains(name) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("cannot write {}", name),
                ));
            }
            self.writes += 1;
            Ok(Box::new(MemoryWriter { filer: self, name: name.to_string(), buffer: Vec::new() }))
        }

        fn describe(&self, name: &str) -> String { format!("memory:{}", name) }
    }

    // Commits its buffer to the filer when dropped.
    struct MemoryWriter<'a> {
        filer: &'a mut MemoryFiler,
        name: String,
        buffer: Vec<u8>,
    }

    impl Write for MemoryWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    impl Drop for MemoryWriter<'_> {
        fn drop(&mut self) {
            let contents = std::mem::take(&mut self.buffer);
            self.filer.resources.insert(std::mem::take(&mut self.name), contents);
        }
    }
}
