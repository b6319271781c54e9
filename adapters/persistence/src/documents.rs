//! Sources and sinks of level documents.

use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

/// Resolves opaque document handles into byte streams.
///
/// This plays the role of a platform content resolver: the gateway never
/// learns where a document lives, only how to read it, write it and name it.
pub trait DocumentProvider {
    /// Opaque reference to a document.
    type Handle;
    /// Stream used to read a document.
    type Reader: Read;
    /// Stream used to replace a document's contents.
    type Writer: Write;

    /// Opens the document for reading.
    fn open_read(&self, handle: &Self::Handle) -> io::Result<Self::Reader>;

    /// Opens the document for writing, truncating any previous contents.
    fn open_write(&self, handle: &Self::Handle) -> io::Result<Self::Writer>;

    /// Name of the document as presented to the user, or an empty string.
    fn display_name(&self, handle: &Self::Handle) -> String;
}

/// Document provider backed by the local file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileDocuments;

impl DocumentProvider for FileDocuments {
    type Handle = PathBuf;
    type Reader = File;
    type Writer = File;

    fn open_read(&self, handle: &PathBuf) -> io::Result<File> {
        File::open(handle)
    }

    fn open_write(&self, handle: &PathBuf) -> io::Result<File> {
        File::create(handle)
    }

    fn display_name(&self, handle: &PathBuf) -> String {
        handle
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
