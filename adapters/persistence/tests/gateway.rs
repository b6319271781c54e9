use std::{
    collections::HashMap,
    fs,
    io::{self, Cursor, Write},
    sync::{Arc, Mutex},
};

use marble_lab_core::{CellCoord, Tile, TileType, WallMask};
use marble_lab_persistence::{
    DocumentProvider, FileDocuments, GatewayError, JsonLevelGateway, JsonStyle, LevelGateway,
};
use marble_lab_world::Grid;

/// In-memory documents keyed by name; writes become visible when the writer is dropped.
#[derive(Clone, Default)]
struct MemoryDocuments {
    store: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: bool,
}

struct MemoryWriter {
    name: String,
    buffer: Vec<u8>,
    store: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail: bool,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::Other, "device unplugged"));
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        if !self.fail {
            let _ = self
                .store
                .lock()
                .expect("store lock")
                .insert(self.name.clone(), std::mem::take(&mut self.buffer));
        }
    }
}

impl DocumentProvider for MemoryDocuments {
    type Handle = String;
    type Reader = Cursor<Vec<u8>>;
    type Writer = MemoryWriter;

    fn open_read(&self, handle: &String) -> io::Result<Self::Reader> {
        self.store
            .lock()
            .expect("store lock")
            .get(handle)
            .cloned()
            .map(Cursor::new)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, handle.clone()))
    }

    fn open_write(&self, handle: &String) -> io::Result<Self::Writer> {
        Ok(MemoryWriter {
            name: handle.clone(),
            buffer: Vec::new(),
            store: Arc::clone(&self.store),
            fail: self.fail_writes,
        })
    }

    fn display_name(&self, handle: &String) -> String {
        handle.clone()
    }
}

fn sample_tiles() -> Vec<Tile> {
    Grid::default()
        .set(CellCoord::new(0, 0), Tile::new(TileType::Marble, WallMask::LEFT))
        .and_then(|grid| grid.set(CellCoord::new(7, 7), Tile::new(TileType::Goal, WallMask::ALL)))
        .expect("cells in range")
        .to_flat_sequence()
}

#[test]
fn save_then_load_returns_same_tiles() {
    let gateway = JsonLevelGateway::new(MemoryDocuments::default(), JsonStyle::Compact);
    let handle = "level.json".to_owned();

    let name = gateway.save(&handle, &sample_tiles()).expect("save succeeds");
    let loaded = gateway.load(&handle).expect("load succeeds");

    assert_eq!(name, "level.json");
    assert_eq!(loaded.display_name, "level.json");
    assert_eq!(loaded.tiles, sample_tiles());
}

#[test]
fn loading_missing_document_reports_it() {
    let gateway = JsonLevelGateway::new(MemoryDocuments::default(), JsonStyle::Compact);
    let error = gateway
        .load(&"nowhere.json".to_owned())
        .expect_err("document is missing");
    assert!(matches!(error, GatewayError::MissingDocument(name) if name == "nowhere.json"));
}

#[test]
fn write_failure_is_reported_and_nothing_is_stored() {
    let documents = MemoryDocuments {
        fail_writes: true,
        ..MemoryDocuments::default()
    };
    let gateway = JsonLevelGateway::new(documents.clone(), JsonStyle::Compact);

    let error = gateway
        .save(&"broken.json".to_owned(), &sample_tiles())
        .expect_err("writes fail");

    assert!(matches!(error, GatewayError::Io { .. }));
    assert!(documents.store.lock().expect("store lock").is_empty());
}

#[test]
fn malformed_document_is_a_json_error() {
    let documents = MemoryDocuments::default();
    let _ = documents
        .store
        .lock()
        .expect("store lock")
        .insert("bad.json".to_owned(), b"[{\"type\":".to_vec());
    let gateway = JsonLevelGateway::new(documents, JsonStyle::Compact);

    let error = gateway.load(&"bad.json".to_owned()).expect_err("document is truncated");
    assert!(matches!(error, GatewayError::Json { .. }));
}

#[test]
fn file_documents_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("mbl_1.json");
    let gateway = JsonLevelGateway::new(FileDocuments, JsonStyle::Pretty);

    let name = gateway.save(&path, &sample_tiles()).expect("save succeeds");
    assert_eq!(name, "mbl_1.json");

    let text = fs::read_to_string(&path).expect("file written");
    assert!(text.contains("\"type\": \"Marble\""));
    assert!(text.contains("\"walls\": 0"));

    let loaded = gateway.load(&path).expect("load succeeds");
    assert_eq!(loaded.tiles, sample_tiles());
}

#[test]
fn file_documents_report_missing_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let gateway = JsonLevelGateway::new(FileDocuments, JsonStyle::Compact);
    let error = gateway
        .load(&dir.path().join("absent.json"))
        .expect_err("file is missing");
    assert!(matches!(error, GatewayError::MissingDocument(_)));
}

#[test]
fn saved_document_has_one_entry_per_cell() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("level.json");
    let gateway = JsonLevelGateway::new(FileDocuments, JsonStyle::Compact);

    let _ = gateway.save(&path, &sample_tiles()).expect("save succeeds");

    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(&path).expect("file written")).expect("valid json");
    let entries = value.as_array().expect("top-level array");
    assert_eq!(entries.len(), 64);
    assert_eq!(entries[0], serde_json::json!({"type": "Marble", "walls": 8}));
    assert_eq!(entries[63], serde_json::json!({"type": "Goal", "walls": 15}));
}
