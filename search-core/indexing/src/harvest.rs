//! Reading harvested library entries.
//!
//! A harvest file is a JSON array of `(qualified path, external type)`
//! records produced by the host-toolchain harvester.

use std::fs;

use serde::{Deserialize, Serialize};
use terms::{Path, SourceType};

use crate::IndexError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestEntry {
    pub path: Path,
    #[serde(rename = "type")]
    pub ty: SourceType,
}

pub fn read_harvest(path: &std::path::Path) -> Result<Vec<HarvestEntry>, IndexError> {
    let source = fs::read_to_string(path)
        .map_err(|source| IndexError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&source)
        .map_err(|source| IndexError::Codec { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::HarvestEntry;

    #[test]
    fn test_harvest_record_shape() {
        let record = r#"
            {
                "path": "Base.List.map",
                "type": {
                    "kind": "function",
                    "argument": { "kind": "variable", "name": "a" },
                    "result": { "kind": "variable", "name": "b" }
                }
            }
        "#;
        let entry: HarvestEntry = serde_json::from_str(record).unwrap();
        assert_eq!(entry.path.to_string(), "Base.List.map");
    }
}
