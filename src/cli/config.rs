use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::TargetExtension;

/// Optional tool configuration loaded from `repath.toml` in the project
/// root. Command-line flags override every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Path to tsconfig.json, relative to the project root.
    pub project: Option<String>,
    /// Output directory for rewritten files.
    pub out: Option<String>,
    /// Target extension for rewritten specifiers.
    pub ext: Option<TargetExtension>,
    /// Glob patterns to include.
    pub include: Vec<String>,
    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

impl ToolConfig {
    /// Load `repath.toml` from the project root if present; absence is not
    /// an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("repath.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = ToolConfig::load(dir.path()).unwrap();
        assert!(config.project.is_none());
        assert!(config.out.is_none());
        assert!(config.ext.is_none());
        assert!(config.include.is_empty());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("repath.toml"),
            r#"
project = "tsconfig.build.json"
out = "dist/module"
ext = "mjs"
include = ["src/**/*.ts"]
exclude = ["src/**/*.spec.ts"]
"#,
        )
        .unwrap();

        let config = ToolConfig::load(dir.path()).unwrap();
        assert_eq!(config.project.as_deref(), Some("tsconfig.build.json"));
        assert_eq!(config.out.as_deref(), Some("dist/module"));
        assert_eq!(config.ext, Some(TargetExtension::Mjs));
        assert_eq!(config.include, vec!["src/**/*.ts".to_string()]);
        assert_eq!(config.exclude, vec!["src/**/*.spec.ts".to_string()]);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("repath.toml"), "outt = \"dist\"\n").unwrap();
        let err = ToolConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("repath.toml"));
    }
}
