//! Muon-track sensor-efficiency analysis.
//!
//! Two batch stages connected by a track file on disk:
//!
//! 1. **Extraction** ([`extract`]) turns simulated detector events into
//!    [`model::Track`]s: per-sensor Cherenkov light-yield records along the
//!    track plus the stochastic energy losses of the particle.
//! 2. **Analysis** ([`window`]) corrects the per-track intensity rate for
//!    bright stochastic bursts by removing the peak sliding window, swept
//!    over a grid of detection thresholds.

pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod geometry;
pub mod model;
pub mod physics;
pub mod response;
pub mod store;
pub mod window;

pub use config::{AnalysisConfig, ExtractionConfig, SweepConfig};
pub use error::{DomeffError, Result};
pub use event::{DetectorGeometry, EventRecord, JsonlEventReader, SensorGeometry, SensorId};
pub use extract::{ExtractionStats, Extractor};
pub use geometry::{Cylinder, DustLayer, is_defined};
pub use model::{Emission, Loss, Track};
pub use physics::{CherenkovModel, StandardIce, TrackGeometry};
pub use store::{RunMeta, load_meta, load_tracks, meta_path, save_meta, save_tracks};
pub use window::{Correction, SweepReport, ThresholdPoint, assess, peak_window, threshold_sweep};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
