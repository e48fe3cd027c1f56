pub mod check;
pub mod play;

use std::path::Path;

use verne_core::World;

use crate::diagnostics::{self, Diagnostic};

/// A parsed world together with its source text.
pub struct LoadedWorld {
    pub world: World,
    pub source: String,
}

/// Read and parse a world file, printing diagnostics to stderr on failure.
pub fn load_world(path: &Path) -> Result<LoadedWorld, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    match World::from_json(&source) {
        Ok(world) => Ok(LoadedWorld { world, source }),
        Err(err) => {
            let diag = Diagnostic::from_error(&source, &err);
            let filename = path.display().to_string();
            eprint!("{}", diagnostics::render(&source, &filename, &[diag]));
            Err(format!("{} failed to load", path.display()))
        }
    }
}
