//! Test helpers writing catalog and history files into a scratch directory.

use crate::files::{CatalogEntry, CatalogFile, HistoryEntry, HistoryFile, VisitEntry};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;
use tourguide_core::test_support::reference_attractions;
use tourguide_core::{PointOfInterest, Position};
use uuid::Uuid;

/// Points listed for every attraction in the reference catalog file.
pub(super) const ATTRACTION_POINTS: u32 = 100;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn attraction(name: &str) -> PointOfInterest {
    reference_attractions()
        .into_iter()
        .find(|poi| poi.name == name)
        .expect("attraction is in the reference catalog")
}

pub(super) fn reference_catalog_file() -> CatalogFile {
    CatalogFile {
        attractions: reference_attractions()
            .into_iter()
            .map(|poi| CatalogEntry {
                id: poi.id,
                name: poi.name,
                latitude: poi.position.latitude,
                longitude: poi.position.longitude,
                points: ATTRACTION_POINTS,
            })
            .collect(),
    }
}

pub(super) fn visit(position: Position, minute: u32) -> VisitEntry {
    VisitEntry {
        latitude: position.latitude,
        longitude: position.longitude,
        timestamp: Utc
            .with_ymd_and_hms(2024, 5, 1, 9, minute, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// A visitor who stopped at Fallingwater twice, one who stopped at the
/// Flatiron Building and one with no recorded visits.
pub(super) fn sample_history_file() -> HistoryFile {
    let fallingwater = attraction("Fallingwater").position;
    let flatiron = attraction("Flatiron Building").position;
    HistoryFile {
        users: vec![
            HistoryEntry {
                id: Uuid::from_u128(101),
                name: "internalUser0".to_owned(),
                visits: vec![visit(fallingwater, 0), visit(fallingwater, 30)],
            },
            HistoryEntry {
                id: Uuid::from_u128(102),
                name: "internalUser1".to_owned(),
                visits: vec![visit(flatiron, 5)],
            },
            HistoryEntry {
                id: Uuid::from_u128(103),
                name: "internalUser2".to_owned(),
                visits: Vec::new(),
            },
        ],
    }
}

/// Scratch directory holding the CLI's input files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn catalog_path(&self) -> Utf8PathBuf {
        self.root.join("catalog.json")
    }

    pub(super) fn history_path(&self) -> Utf8PathBuf {
        self.root.join("history.json")
    }

    pub(super) fn write_catalog(&self, catalog: &CatalogFile) -> Utf8PathBuf {
        let path = self.catalog_path();
        let payload = serde_json::to_vec_pretty(catalog).expect("serialize catalog");
        write_utf8(&path, &payload);
        path
    }

    pub(super) fn write_history(&self, history: &HistoryFile) -> Utf8PathBuf {
        let path = self.history_path();
        let payload = serde_json::to_vec_pretty(history).expect("serialize history");
        write_utf8(&path, &payload);
        path
    }
}
