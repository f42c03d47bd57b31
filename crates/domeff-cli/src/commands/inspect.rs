use std::path::Path;
use std::process;

use domeff_core::{load_meta, load_tracks, meta_path};

pub fn run(tracks_path: &Path) {
    let tracks = match load_tracks(tracks_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    println!("{}", tracks_path.display());
    println!("Tracks: {}", tracks.len());
    if !tracks.is_empty() {
        let n = tracks.len() as f64;
        let mut min_len = f64::INFINITY;
        let mut max_len = f64::NEG_INFINITY;
        let mut sum_len = 0.0;
        let mut emissions = 0usize;
        let mut losses = 0usize;
        for track in &tracks {
            min_len = min_len.min(track.length);
            max_len = max_len.max(track.length);
            sum_len += track.length;
            emissions += track.emissions.len();
            losses += track.losses.len();
        }
        println!(
            "Length [m]: min {:.1}  mean {:.1}  max {:.1}",
            min_len,
            sum_len / n,
            max_len
        );
        println!(
            "Emissions: {} total ({:.1} per track)",
            emissions,
            emissions as f64 / n
        );
        println!(
            "Losses:    {} total ({:.1} per track)",
            losses,
            losses as f64 / n
        );
    }

    let meta_file = meta_path(tracks_path);
    match load_meta(&meta_file) {
        Ok(meta) => {
            println!();
            println!("Run {} (domeff {})", meta.id, meta.version);
            println!("Created: {} (unix)", meta.created_unix_secs);
            println!(
                "Events: {} ({} without candidate, {} ambiguous)",
                meta.stats.events, meta.stats.no_candidate, meta.stats.ambiguous
            );
        }
        Err(_) => println!("No run metadata at {}", meta_file.display()),
    }
}
