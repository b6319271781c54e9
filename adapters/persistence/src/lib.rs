#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence gateway that stores Marble Lab levels as JSON documents.
//!
//! The gateway is constructed with its collaborators, a
//! [`DocumentProvider`] that turns handles into streams and the
//! [`JsonStyle`] to emit, and exposes single-shot [`LevelGateway::save`] and
//! [`LevelGateway::load`] calls. The [`dispatch`] module runs those calls on a
//! worker thread between the session's begin and complete commands.

pub mod codec;
pub mod dispatch;
mod documents;

use std::io::{self, BufReader, BufWriter, Write};

use chrono::{DateTime, Utc};
use marble_lab_core::{LoadOutcome, SaveOutcome, Tile};

pub use codec::JsonStyle;
pub use documents::{DocumentProvider, FileDocuments};

/// Failures reported by the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The document does not exist.
    #[error("document '{0}' does not exist")]
    MissingDocument(String),
    /// Reading or writing the underlying stream failed.
    #[error("i/o failure on '{name}': {source}")]
    Io {
        /// Display name of the document involved.
        name: String,
        /// Underlying stream error.
        #[source]
        source: io::Error,
    },
    /// The document could not be encoded or decoded.
    #[error("malformed level document '{name}': {source}")]
    Json {
        /// Display name of the document involved.
        name: String,
        /// Underlying codec error.
        #[source]
        source: serde_json::Error,
    },
    /// The gateway panicked before finishing the transfer.
    #[error("level gateway panicked: {0}")]
    Panicked(String),
}

/// Level read back from a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedLevel {
    /// Name of the document as presented to the user.
    pub display_name: String,
    /// Tiles in row-major order.
    pub tiles: Vec<Tile>,
}

/// Stores and retrieves flat tile sequences.
pub trait LevelGateway {
    /// Opaque reference to a stored level.
    type Handle;

    /// Writes the tiles and returns the document's display name.
    fn save(&self, handle: &Self::Handle, tiles: &[Tile]) -> Result<String, GatewayError>;

    /// Reads a level and its display name.
    fn load(&self, handle: &Self::Handle) -> Result<LoadedLevel, GatewayError>;
}

/// Gateway that encodes levels as JSON through a [`DocumentProvider`].
#[derive(Clone, Debug, Default)]
pub struct JsonLevelGateway<P> {
    documents: P,
    style: JsonStyle,
}

impl<P: DocumentProvider> JsonLevelGateway<P> {
    /// Creates a gateway writing through the provided documents.
    #[must_use]
    pub const fn new(documents: P, style: JsonStyle) -> Self {
        Self { documents, style }
    }

    /// Document provider used by the gateway.
    #[must_use]
    pub const fn documents(&self) -> &P {
        &self.documents
    }
}

impl<P: DocumentProvider> LevelGateway for JsonLevelGateway<P> {
    type Handle = P::Handle;

    fn save(&self, handle: &P::Handle, tiles: &[Tile]) -> Result<String, GatewayError> {
        let name = self.documents.display_name(handle);
        let bytes = codec::encode_tiles(tiles, self.style).map_err(|source| GatewayError::Json {
            name: name.clone(),
            source,
        })?;

        let io_error = |source| GatewayError::Io {
            name: name.clone(),
            source,
        };
        let mut writer = BufWriter::new(self.documents.open_write(handle).map_err(io_error)?);
        writer.write_all(&bytes).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        drop(writer);

        log::debug!("wrote {} tiles ({} bytes) to '{name}'", tiles.len(), bytes.len());
        Ok(name)
    }

    fn load(&self, handle: &P::Handle) -> Result<LoadedLevel, GatewayError> {
        let name = self.documents.display_name(handle);
        let reader = self.documents.open_read(handle).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                GatewayError::MissingDocument(name.clone())
            } else {
                GatewayError::Io {
                    name: name.clone(),
                    source,
                }
            }
        })?;

        let tiles = codec::read_tiles(BufReader::new(reader)).map_err(|source| {
            if source.is_io() {
                GatewayError::Io {
                    name: name.clone(),
                    source: source.into(),
                }
            } else {
                GatewayError::Json {
                    name: name.clone(),
                    source,
                }
            }
        })?;

        log::debug!("read {} tiles from '{name}'", tiles.len());
        Ok(LoadedLevel {
            display_name: name,
            tiles,
        })
    }
}

/// Converts a gateway load result into the outcome consumed by the session.
#[must_use]
pub fn load_outcome(result: Result<LoadedLevel, GatewayError>) -> LoadOutcome {
    match result {
        Ok(level) => LoadOutcome::Loaded {
            display_name: level.display_name,
            tiles: level.tiles,
        },
        Err(error) => LoadOutcome::Failed {
            reason: error.to_string(),
        },
    }
}

/// Converts a gateway save result into the outcome consumed by the session.
#[must_use]
pub fn save_outcome(result: Result<String, GatewayError>) -> SaveOutcome {
    match result {
        Ok(display_name) => SaveOutcome::Saved { display_name },
        Err(error) => SaveOutcome::Failed {
            reason: error.to_string(),
        },
    }
}

/// File name suggested for a level saved at the provided instant.
#[must_use]
pub fn file_name_at(instant: DateTime<Utc>) -> String {
    format!("mbl_{}.json", instant.timestamp_millis())
}

/// File name suggested for a level saved now. Every save creates a new document.
#[must_use]
pub fn default_file_name() -> String {
    file_name_at(Utc::now())
}
