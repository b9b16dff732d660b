//! CLI configuration handling.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ddlgen_codegen::{
    CallingConvention, DataAccessStyle, GenerationOptions, LogicalDelete, Targets, TimeRounding,
};

use crate::error::{CliError, CliResult};

/// Default config file name (lives in the working directory)
pub const CONFIG_FILE_NAME: &str = "ddlgen.toml";

/// ddlgen CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generator configuration
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `explicit` if given, else `ddlgen.toml` in `dir` when it exists.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> CliResult<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load(path),
            None => {
                let path = dir.join(CONFIG_FILE_NAME);
                if path.exists() {
                    tracing::debug!(path = %path.display(), "loading config");
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Go package of the model and data access files
    pub package: String,

    /// Go module path used to import generated packages
    pub module: Option<String>,

    /// Name of the service file and type
    pub service_name: String,

    /// Output directory; stdout when unset
    pub output: Option<PathBuf>,

    /// Put a generation banner on every file
    pub banner: bool,

    /// Artifacts to render
    pub targets: Targets,

    /// Columns with ascending list queries
    pub order_asc: Vec<String>,

    /// Columns with descending list queries
    pub order_desc: Vec<String>,

    /// Logical delete as `column=value`
    pub logical_delete: Option<LogicalDelete>,

    /// Truncation of time arguments
    pub round: Option<TimeRounding>,

    /// `plain` or `orm`
    pub style: DataAccessStyle,

    /// `error` or `panic`
    pub convention: CallingConvention,

    /// Run gofmt on written files
    pub format: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            package: options.package,
            module: None,
            service_name: options.service_name,
            output: None,
            banner: options.banner,
            targets: options.targets,
            order_asc: Vec::new(),
            order_desc: Vec::new(),
            logical_delete: None,
            round: None,
            style: options.style,
            convention: options.convention,
            format: true,
        }
    }
}

impl GeneratorConfig {
    /// Generation options described by this section.
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            package: self.package.clone(),
            module: self.module.clone(),
            service_name: self.service_name.clone(),
            banner: self.banner,
            targets: self.targets,
            order_asc: self.order_asc.clone(),
            order_desc: self.order_desc.clone(),
            logical_delete: self.logical_delete.clone(),
            rounding: self.round,
            style: self.style,
            convention: self.convention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_matches_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.generator.options(), GenerationOptions::default());
        assert!(config.generator.format);
        assert_eq!(config.generator.output, None);
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r#"
            [generator]
            package = "entity"
            module = "github.com/acme/shop"
            service_name = "shop"
            output = "gen"
            banner = false
            order_asc = ["name"]
            order_desc = ["id", "name"]
            logical_delete = "deleted='1'"
            round = "ms"
            style = "orm"
            convention = "panic"
            format = false

            [generator.targets]
            router = true
            doc = true
            "#,
        )
        .unwrap();

        let options = config.generator.options();
        assert_eq!(options.package, "entity");
        assert_eq!(options.module.as_deref(), Some("github.com/acme/shop"));
        assert_eq!(options.service_type(), "ShopService");
        assert!(!options.banner);
        assert_eq!(
            options.targets,
            Targets {
                model: true,
                crud: true,
                router: true,
                service: false,
                doc: true,
            }
        );
        assert_eq!(options.order_desc, vec!["id", "name"]);
        assert_eq!(options.logical_delete, Some(LogicalDelete::new("deleted", "1")));
        assert_eq!(options.rounding, Some(TimeRounding::Millisecond));
        assert_eq!(options.style, DataAccessStyle::Orm);
        assert_eq!(options.convention, CallingConvention::Panic);
        assert_eq!(config.generator.output, Some(PathBuf::from("gen")));
        assert!(!config.generator.format);
    }

    #[test]
    fn test_invalid_round_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[generator]\nround = \"hours\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.generator.package, "model");

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[generator]\npackage = \"dao\"\n",
        )
        .unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.generator.package, "dao");

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::discover(Some(&missing), dir.path()),
            Err(CliError::Config(_))
        ));
    }
}
