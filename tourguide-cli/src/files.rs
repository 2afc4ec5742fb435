//! JSON input files and the providers backed by them.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourguide_core::{
    CatalogProvider, ContactInfo, PointOfInterest, PointsProvider, Position, ProviderError,
    UserRecord, VisitedPosition,
};
use uuid::Uuid;

use crate::CliError;

/// On-disk attraction catalog. Each entry carries the points granted for
/// visiting it, so the file doubles as the points provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct CatalogFile {
    pub(crate) attractions: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct CatalogEntry {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) points: u32,
}

/// On-disk visit history for a set of users.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct HistoryFile {
    pub(crate) users: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct HistoryEntry {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) visits: Vec<VisitEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct VisitEntry {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) timestamp: DateTime<Utc>,
}

/// Catalog and points provider serving a [`CatalogFile`].
///
/// The file records no live positions, so position lookups always fail with
/// [`ProviderError::UnknownUser`].
#[derive(Debug, Clone)]
pub(crate) struct FileCatalog {
    pois: Vec<PointOfInterest>,
    points: HashMap<Uuid, u32>,
}

impl FileCatalog {
    pub(crate) fn from_file(file: CatalogFile) -> Result<Self, CliError> {
        let mut pois = Vec::with_capacity(file.attractions.len());
        let mut points = HashMap::with_capacity(file.attractions.len());
        for entry in file.attractions {
            match points.entry(entry.id) {
                Entry::Occupied(_) => return Err(CliError::DuplicateAttraction { id: entry.id }),
                Entry::Vacant(slot) => {
                    slot.insert(entry.points);
                }
            }
            pois.push(PointOfInterest::new(
                entry.id,
                entry.name,
                Position::new(entry.latitude, entry.longitude),
            ));
        }
        Ok(Self { pois, points })
    }

    pub(crate) fn load(path: &Utf8Path, field: &'static str) -> Result<Self, CliError> {
        let file: CatalogFile = tourguide_fs::read_json(path)
            .map_err(|source| CliError::ReadInput { field, source })?;
        Self::from_file(file)
    }

    pub(crate) fn len(&self) -> usize {
        self.pois.len()
    }
}

impl CatalogProvider for FileCatalog {
    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, ProviderError> {
        Ok(self.pois.clone())
    }

    fn last_known_position(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        Err(ProviderError::UnknownUser {
            provider: "catalog file",
            user_id,
        })
    }
}

impl PointsProvider for FileCatalog {
    fn reward_points(&self, poi_id: Uuid, _user_id: Uuid) -> Result<u32, ProviderError> {
        self.points.get(&poi_id).copied().ok_or_else(|| {
            ProviderError::unavailable("points", format!("no points listed for attraction {poi_id}"))
        })
    }
}

impl HistoryFile {
    pub(crate) fn load(path: &Utf8Path, field: &'static str) -> Result<Self, CliError> {
        tourguide_fs::read_json(path).map_err(|source| CliError::ReadInput { field, source })
    }

    /// Build one user record per entry with its visits in file order.
    pub(crate) fn into_users(self) -> Vec<Arc<UserRecord>> {
        self.users
            .into_iter()
            .map(|entry| {
                let user = UserRecord::new(entry.id, entry.name, ContactInfo::default());
                for visit in entry.visits {
                    user.record_position(VisitedPosition::new(
                        entry.id,
                        Position::new(visit.latitude, visit.longitude),
                        visit.timestamp,
                    ));
                }
                Arc::new(user)
            })
            .collect()
    }
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match tourguide_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}
