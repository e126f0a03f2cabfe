pub mod analyze;
pub mod query;

use crate::error::{CliError, Result};
use phasehull::core::io::entries::EntrySet;
use phasehull::core::models::entry::Entry;
use std::path::Path;
use tracing::info;

pub(crate) fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    info!("Loading entries from {:?}", path);
    let set = EntrySet::load(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!("Loaded {} entries.", set.len());
    Ok(set.into_entries())
}
