use crate::error::ConvertError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The mapping configuration document (`config.json`).
///
/// Built once per run and passed explicitly through the pipeline; the maps
/// preserve document order so generated custom-type aliases come out in a
/// stable, author-controlled order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    /// Scalar type-name mapping table: source scalar -> target scalar
    pub type_mapping: IndexMap<String, String>,
    /// Custom type overrides: name -> pre-bound alias definition
    pub custom_types: IndexMap<String, CustomType>,
    /// Enum metadata: name -> permitted values + base scalar type
    pub enum_types: IndexMap<String, EnumType>,
    /// Header/import lines prepended verbatim to the output
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputConfig {
    /// Directory holding the declaration files, relative to the config file
    pub type_dir: String,
    /// Ordered list of declaration file names within `type_dir`
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub dir: String,
    pub filename: String,
}

/// A configured name that bypasses scalar mapping and instead binds to a
/// pre-rendered alias carrying a field-wrapper expression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomType {
    /// Target scalar type the alias is bound to
    pub python_type: String,
    /// Field-wrapper expression, e.g. `Field(..., description='...')`
    pub field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumType {
    pub values: Vec<String>,
    pub base_type: String,
}

impl Default for EnumType {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            base_type: "str".to_string(),
        }
    }
}

impl Config {
    /// Load and deserialize the configuration document. Any failure here is
    /// fatal for the run.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ConvertError::Config(format!("invalid JSON in {}: {}", path.display(), e))
        })
    }
}
