pub mod detect;
pub mod play;
pub mod roll;

use std::path::Path;

use sl_core::Roster;

/// Load a roster file, mapping errors to a printable message.
fn load_roster(path: &Path) -> Result<Roster, String> {
    Roster::from_path(path).map_err(|e| format!("failed to load {}: {e}", path.display()))
}
