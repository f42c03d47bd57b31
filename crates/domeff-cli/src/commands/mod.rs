pub mod analyze;
pub mod extract;
pub mod inspect;

use std::path::Path;
use std::process;

use serde::de::DeserializeOwned;

/// Read a JSON parameter file, or the reference defaults when no path is
/// given. Config problems are user errors; bail immediately.
pub fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> T {
    let Some(path) = path else {
        return T::default();
    };
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: cannot read config {}: {e}", path.display());
            process::exit(1);
        }
    };
    match serde_json::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: bad config {}: {e}", path.display());
            process::exit(1);
        }
    }
}
