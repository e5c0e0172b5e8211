//! TypeScript declaration -> Pydantic model transpiler.
//!
//! The pipeline is a pure, synchronous batch transform: load configuration,
//! extract declarations from the listed files, render the Pydantic source,
//! hand the text back to the caller. Writing the artifact to disk is the
//! binary's job.

pub mod ast;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod model;
pub mod parser;
pub mod resolve;

pub use config::Config;
pub use error::{ConvertError, ParseError};
pub use generate::PydanticGenerator;
pub use model::{DeclKind, Declaration, Property};

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// Result of one conversion run
#[derive(Debug)]
pub struct ConvertResult {
    /// Rendered model source, without the generated-file banner
    pub code: String,
    /// The Type Model the code was generated from
    pub declarations: Vec<Declaration>,
    /// Recoverable diagnostics (missing files, multi-base heritage)
    pub warnings: Vec<String>,
}

/// Runs the extract + generate pipeline for one configuration
pub struct Converter {
    config: Config,
    /// Directory the config document's relative paths resolve against
    root: PathBuf,
}

impl Converter {
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        Self { config, root: root.into() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configured declaration files, resolved against the root
    pub fn input_files(&self) -> Vec<PathBuf> {
        let type_dir = self.root.join(&self.config.input.type_dir);
        self.config
            .input
            .files
            .iter()
            .map(|name| type_dir.join(name))
            .collect()
    }

    /// Destination of the rendered artifact, resolved against the root
    pub fn output_path(&self) -> PathBuf {
        self.root
            .join(&self.config.output.dir)
            .join(&self.config.output.filename)
    }

    pub fn run(&self) -> Result<ConvertResult, ConvertError> {
        let extraction = extract::extract_files(&self.input_files())?;
        let code = PydanticGenerator::new(&self.config).generate(&extraction.declarations);

        Ok(ConvertResult {
            code,
            declarations: extraction.declarations,
            warnings: extraction.warnings,
        })
    }
}

/// Convert in-memory sources with the given configuration. This is the same
/// pipeline as `Converter::run`, minus the file system.
pub fn convert_sources(
    config: &Config,
    sources: &[(&str, &str)],
) -> Result<ConvertResult, ConvertError> {
    let extraction = extract::extract_sources(sources)?;
    let code = PydanticGenerator::new(config).generate(&extraction.declarations);

    Ok(ConvertResult {
        code,
        declarations: extraction.declarations,
        warnings: extraction.warnings,
    })
}

/// Prepend the generated-file banner: tool name, generation timestamp, and
/// an editability warning pointing changes back at the declarations.
pub fn with_banner(code: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "# -*- coding: utf-8 -*-\n\
         \"\"\"\n\
         Auto-generated Pydantic models, converted from TypeScript type declarations.\n\
         \n\
         Generated: {}\n\
         Generator: ts2pydantic\n\
         \n\
         WARNING: this file is generated; do not edit it by hand.\n\
         Edit the TypeScript declaration files and re-run the converter instead.\n\
         \"\"\"\n\
         \n\
         {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        code
    )
}

/// Convenience wrapper: load a configuration document and run the pipeline,
/// resolving paths against the document's parent directory.
pub fn convert_with_config(config_path: &Path) -> Result<ConvertResult, ConvertError> {
    let config = Config::load(config_path)?;
    let root = config_path.parent().unwrap_or_else(|| Path::new("."));
    Converter::new(config, root).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomType;
    use chrono::TimeZone;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.imports = vec![
            "from pydantic import BaseModel, Field".to_string(),
            "from enum import Enum".to_string(),
            "from typing import Optional, List, Dict, Union, Annotated".to_string(),
            "from datetime import datetime".to_string(),
        ];
        for (k, v) in [("string", "str"), ("number", "float"), ("boolean", "bool"), ("Date", "datetime")] {
            config.type_mapping.insert(k.into(), v.into());
        }
        config.custom_types.insert(
            "MdContent".into(),
            CustomType {
                python_type: "str".into(),
                field: "Field(..., description='markdown content')".into(),
            },
        );
        config
    }

    #[test]
    fn test_end_to_end() {
        let config = test_config();
        let result = convert_sources(
            &config,
            &[(
                "assigment.d.ts",
                "export type AssigData = {\n  title: string\n  description: MdContent\n  submit?: Submit\n}\n\nexport type Submit = {\n  time: Date\n  score: number | null\n}\n",
            )],
        )
        .unwrap();

        assert!(result.code.contains("class AssigData(BaseModel):"));
        assert!(result.code.contains("    title: str = Field(...)"));
        assert!(result.code.contains("    description: MdContent"));
        assert!(result.code.contains("    submit: Optional[Submit] = None"));
        assert!(result.code.contains("    score: Union[float, null] = Field(...)"));
        assert_eq!(result.declarations.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_banner_contains_warning_and_timestamp() {
        let stamp = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
        let banner = with_banner("x = 1", stamp);
        assert!(banner.starts_with("# -*- coding: utf-8 -*-"));
        assert!(banner.contains("2026-08-27T12:00:00.000Z"));
        assert!(banner.contains("do not edit it by hand"));
        assert!(banner.ends_with("x = 1\n"));
    }

    #[test]
    fn test_output_idempotent_for_same_inputs() {
        let config = test_config();
        let source = "interface A {\n  x: string\n}\n";
        let first = convert_sources(&config, &[("a.d.ts", source)]).unwrap();
        let second = convert_sources(&config, &[("a.d.ts", source)]).unwrap();
        assert_eq!(first.code, second.code);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let config = test_config();
        let result = convert_sources(
            &config,
            &[("a.d.ts", "interface B {\n  x: string\n}\ninterface A {\n  y: string\n}\n")],
        )
        .unwrap();
        let b = result.code.find("class B(").unwrap();
        let a = result.code.find("class A(").unwrap();
        assert!(b < a);
    }
}
