//! On-disk track store connecting the two pipeline stages.
//!
//! Tracks go into a small binary container (magic, format version, bincode
//! body) so a stale or foreign file fails loudly instead of decoding into
//! garbage. Run metadata travels in a JSON sidecar next to the track file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ExtractionConfig;
use crate::error::{DomeffError, Result};
use crate::extract::ExtractionStats;
use crate::model::Track;

const MAGIC: [u8; 8] = *b"DOMEFFTK";
const VERSION: u32 = 1;

/// Write tracks to `path`, overwriting any existing file.
pub fn save_tracks(path: &Path, tracks: &[Track]) -> Result<()> {
    let body = bincode::serde::encode_to_vec(tracks, bincode::config::standard())?;
    let mut bytes = Vec::with_capacity(MAGIC.len() + 4 + body.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    fs::write(path, bytes)?;
    Ok(())
}

/// Read a track file written by [`save_tracks`].
pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let bytes = fs::read(path)?;
    if bytes.len() < MAGIC.len() + 4 || bytes[..MAGIC.len()] != MAGIC {
        return Err(DomeffError::BadHeader {
            path: path.to_path_buf(),
        });
    }
    let found = u32::from_le_bytes(bytes[MAGIC.len()..MAGIC.len() + 4].try_into().unwrap());
    if found != VERSION {
        return Err(DomeffError::Version {
            path: path.to_path_buf(),
            found,
            expected: VERSION,
        });
    }
    let (tracks, _) =
        bincode::serde::decode_from_slice(&bytes[MAGIC.len() + 4..], bincode::config::standard())?;
    Ok(tracks)
}

/// Provenance record written next to every track file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub version: String,
    /// Unique id of this extraction run.
    pub id: String,
    pub created_unix_secs: u64,
    pub stats: ExtractionStats,
    pub config: ExtractionConfig,
}

impl RunMeta {
    pub fn new(stats: ExtractionStats, config: ExtractionConfig) -> Self {
        let created_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            version: crate::VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            created_unix_secs,
            stats,
            config,
        }
    }
}

/// Sidecar path for a track file: `tracks.bin` -> `tracks.meta.json`.
pub fn meta_path(tracks_path: &Path) -> PathBuf {
    tracks_path.with_extension("meta.json")
}

pub fn save_meta(path: &Path, meta: &RunMeta) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_meta(path: &Path) -> Result<RunMeta> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Emission, Loss};

    fn sample_tracks() -> Vec<Track> {
        let mut a = Track::new(750.0);
        a.emissions.push(Emission {
            track_distance: 120.0,
            intensity: 3.5,
        });
        a.emissions.push(Emission {
            track_distance: 40.0,
            intensity: 0.0,
        });
        a.losses.push(Loss {
            track_distance: 200.0,
            energy: 42.0,
        });
        let b = Track::new(0.0);
        vec![a, b]
    }

    #[test]
    fn test_tracks_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tracks.bin");
        let tracks = sample_tracks();
        save_tracks(&path, &tracks).unwrap();
        let loaded = load_tracks(&path).unwrap();
        assert_eq!(loaded, tracks);
    }

    #[test]
    fn test_save_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.bin");
        let b = tmp.path().join("b.bin");
        let tracks = sample_tracks();
        save_tracks(&a, &tracks).unwrap();
        save_tracks(&b, &tracks).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tracks.bin");
        fs::write(&path, b"NOTTRACKS___").unwrap();
        match load_tracks(&path) {
            Err(DomeffError::BadHeader { path: p }) => assert_eq!(p, path),
            other => panic!("expected BadHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_file_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tracks.bin");
        fs::write(&path, &MAGIC[..4]).unwrap();
        assert!(matches!(
            load_tracks(&path),
            Err(DomeffError::BadHeader { .. })
        ));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tracks.bin");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&99u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();
        match load_tracks(&path) {
            Err(DomeffError::Version {
                found, expected, ..
            }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, VERSION);
            }
            other => panic!("expected Version, got {other:?}"),
        }
    }

    #[test]
    fn test_meta_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let tracks_path = tmp.path().join("tracks.bin");
        let path = meta_path(&tracks_path);
        assert_eq!(path, tmp.path().join("tracks.meta.json"));
        let meta = RunMeta::new(
            ExtractionStats {
                events: 10,
                no_candidate: 3,
                ambiguous: 1,
                tracks: 6,
            },
            ExtractionConfig::default(),
        );
        save_meta(&path, &meta).unwrap();
        let loaded = load_meta(&path).unwrap();
        assert_eq!(loaded, meta);
        assert_eq!(loaded.version, crate::VERSION);
    }
}
