//! Staging manifest persistence.
//!
//! Each CLI invocation is its own process, so the staging set is carried
//! between `add` and `commit` in a JSON file. A missing file is an empty set.

use std::fs;
use std::io;
use std::path::Path;
use filestage::StagingSet;

pub fn load(path: &Path) -> Result<StagingSet, String> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| format!("Manifest {} is not valid: {}", path.display(), e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no manifest yet, starting empty");
            Ok(StagingSet::new())
        }
        Err(e) => Err(format!("Cannot read manifest {}: {}", path.display(), e)),
    }
}

pub fn save(path: &Path, set: &StagingSet) -> Result<(), String> {
    let json = serde_json::to_string_pretty(set)
        .map_err(|e| format!("Cannot serialize manifest: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Cannot write manifest {}: {}", path.display(), e))
}
