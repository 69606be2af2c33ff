//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agentic-rag";
const PROJECT_FILES: [&str; 2] = ["agentic-rag.toml", ".agentic-rag.toml"];
const ENV_PREFIX: &str = "AGENTIC_RAG_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AGENTIC_RAG_*` environment variables (`__` separates sections,
    ///    e.g. `AGENTIC_RAG_ORCHESTRATION__MAX_ITERATIONS=2`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./agentic-rag.toml` or `./.agentic-rag.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/agentic-rag/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Self::explicit_and_env(config_path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only the explicit file (if any) over the defaults, ignoring
    /// discovered files and the environment.
    pub fn load_file(config_path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(config_path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn explicit_and_env(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agentic-rag/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./agentic-rag.toml or ./.agentic-rag.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_domain::OutputFormat;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.orchestration.max_iterations, 3);
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("agentic-rag"));
    }

    #[test]
    fn test_load_file_merges_over_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[orchestration]\nmax_iterations = 1\n\n[output]\nformat = \"full\""
        )
        .unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(config.orchestration.max_iterations, 1);
        assert_eq!(config.orchestration.confidence_threshold, 0.8);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
    }

    #[test]
    fn test_load_file_rejects_bad_types() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[orchestration]\nmax_iterations = \"many\"").unwrap();
        assert!(ConfigLoader::load_file(file.path()).is_err());
    }

    #[test]
    fn test_project_config_discovery() {
        let dir = tempdir().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        std::fs::write(dir.path().join(".agentic-rag.toml"), "").unwrap();
        let found = ConfigLoader::project_config_in(dir.path()).unwrap();
        assert!(found.ends_with(".agentic-rag.toml"));

        std::fs::write(dir.path().join("agentic-rag.toml"), "").unwrap();
        let found = ConfigLoader::project_config_in(dir.path()).unwrap();
        assert!(found.ends_with("agentic-rag.toml"));
        assert!(!found.to_string_lossy().ends_with(".agentic-rag.toml"));
    }
}
