use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// Compiler options relevant to specifier rewriting, parsed from tsconfig.json.
///
/// Owned by a `Converter` and read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// The directory containing the tsconfig.json file.
    pub config_dir: PathBuf,
    /// The `target` language-version token. The tree-sitter grammar accepts
    /// all ECMAScript versions, so this is carried as a diagnostic hint only.
    pub target: Option<String>,
    /// The baseUrl alias substitutions are resolved against.
    pub base_url: Option<PathBuf>,
    /// Raw `compilerOptions.paths` mapping, consumed by the alias table.
    pub paths: BTreeMap<String, Vec<String>>,
}

impl ResolvedConfig {
    /// Load and parse a tsconfig.json file.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse_from_str(&content, path)
    }

    /// Parse tsconfig.json content from a string.
    /// `config_path` is used to resolve relative paths.
    pub fn parse_from_str(content: &str, config_path: &Path) -> Result<Self, ConvertError> {
        let config_dir = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let json: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConvertError::Config {
                path: config_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let compiler_options = json.get("compilerOptions");

        let target = compiler_options
            .and_then(|co| co.get("target"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let base_url = compiler_options
            .and_then(|co| co.get("baseUrl"))
            .and_then(|v| v.as_str())
            .map(|url| config_dir.join(url));

        let mut paths = BTreeMap::new();
        if let Some(obj) = compiler_options
            .and_then(|co| co.get("paths"))
            .and_then(|p| p.as_object())
        {
            for (pattern, targets) in obj {
                let targets: Vec<String> = targets
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|t| t.as_str())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                paths.insert(pattern.clone(), targets);
            }
        }

        Ok(ResolvedConfig {
            config_dir,
            target,
            base_url,
            paths,
        })
    }

    /// The base directory alias substitutions are resolved against:
    /// explicit baseUrl if present, else the config file's own directory.
    pub fn resolution_base(&self) -> &Path {
        self.base_url.as_deref().unwrap_or(&self.config_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_tsconfig() {
        let content = r#"{
            "compilerOptions": {
                "baseUrl": ".",
                "paths": {
                    "@utils/*": ["src/utils/*"],
                    "@models/*": ["src/models/*"]
                }
            }
        }"#;

        let config =
            ResolvedConfig::parse_from_str(content, Path::new("/project/tsconfig.json")).unwrap();
        assert_eq!(config.base_url, Some(PathBuf::from("/project")));
        assert_eq!(config.paths.len(), 2);
        assert_eq!(
            config.paths.get("@utils/*").unwrap(),
            &vec!["src/utils/*".to_string()]
        );
    }

    #[test]
    fn test_parse_tsconfig_without_paths() {
        let content = r#"{
            "compilerOptions": {
                "target": "ES2020",
                "strict": true
            }
        }"#;

        let config =
            ResolvedConfig::parse_from_str(content, Path::new("/project/tsconfig.json")).unwrap();
        assert!(config.paths.is_empty());
        assert!(config.base_url.is_none());
        assert_eq!(config.target.as_deref(), Some("ES2020"));
    }

    #[test]
    fn test_parse_tsconfig_with_base_url() {
        let content = r#"{
            "compilerOptions": {
                "baseUrl": "./src"
            }
        }"#;

        let config =
            ResolvedConfig::parse_from_str(content, Path::new("/project/tsconfig.json")).unwrap();
        assert_eq!(config.base_url, Some(PathBuf::from("/project/src")));
        assert_eq!(config.resolution_base(), Path::new("/project/src"));
    }

    #[test]
    fn test_resolution_base_defaults_to_config_dir() {
        let config =
            ResolvedConfig::parse_from_str("{}", Path::new("/project/tsconfig.json")).unwrap();
        assert_eq!(config.resolution_base(), Path::new("/project"));
    }

    #[test]
    fn test_malformed_json_names_parse_error() {
        let err = ResolvedConfig::parse_from_str("{ nope", Path::new("/project/tsconfig.json"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("tsconfig.json"), "got: {}", message);
        assert!(message.contains("key"), "should carry serde detail: {}", message);
    }

    #[test]
    fn test_paths_with_non_array_value_become_empty() {
        let content = r#"{
            "compilerOptions": {
                "paths": { "@broken": "src/broken" }
            }
        }"#;

        let config =
            ResolvedConfig::parse_from_str(content, Path::new("/project/tsconfig.json")).unwrap();
        assert_eq!(config.paths.get("@broken").unwrap().len(), 0);
    }
}
