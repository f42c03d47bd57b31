use std::path::Path;
use std::process;

use domeff_core::{
    DetectorGeometry, ExtractionConfig, Extractor, JsonlEventReader, RunMeta, StandardIce,
    meta_path, save_meta, save_tracks,
};

pub fn run(events: &Path, geometry_path: &Path, output: &Path, config_path: Option<&Path>) {
    let config: ExtractionConfig = super::load_config(config_path);

    let geometry = match DetectorGeometry::load(geometry_path) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let reader = match JsonlEventReader::open(events) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: cannot open events {}: {e}", events.display());
            process::exit(1);
        }
    };

    let extractor = Extractor::new(&geometry, StandardIce::default(), config.clone());
    let (tracks, stats) = extractor.run(reader);

    if let Err(e) = save_tracks(output, &tracks) {
        eprintln!("Error: cannot write {}: {e}", output.display());
        process::exit(1);
    }
    let meta = RunMeta::new(stats, config);
    let meta_file = meta_path(output);
    if let Err(e) = save_meta(&meta_file, &meta) {
        eprintln!("Error: cannot write {}: {e}", meta_file.display());
        process::exit(1);
    }

    println!("Sensors:          {}", geometry.sensors.len());
    println!("Events processed: {}", stats.events);
    println!("  no candidate:   {}", stats.no_candidate);
    println!("  ambiguous:      {}", stats.ambiguous);
    println!("Tracks extracted: {}", stats.tracks);
    println!();
    println!("Wrote {} (+ {})", output.display(), meta_file.display());
}
