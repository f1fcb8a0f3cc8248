use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::domain::RuleDefinition;

/// Error raised while loading rule definitions.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionsError {
    #[error("failed to read rule definitions: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rule definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load an ordered list of rule definitions from a JSON file.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RuleDefinition>, DefinitionsError> {
    let file = File::open(path)?;
    load_from_reader(BufReader::new(file))
}

/// Load rule definitions from any reader producing the JSON definition list.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<RuleDefinition>, DefinitionsError> {
    let definitions = serde_json::from_reader(reader)?;
    Ok(definitions)
}
