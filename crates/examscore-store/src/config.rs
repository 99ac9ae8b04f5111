//! examscore configuration and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examscore_core::evaluator::EvaluationOptions;
use examscore_core::report::ReportConfig;
use examscore_core::skills::{SkillCategoryRule, SkillCategoryTable};
use examscore_core::traits::ExamDataStore;

use crate::json::JsonStore;

/// Environment variable that overrides the configured store path.
pub const DATA_ENV_VAR: &str = "EXAMSCORE_DATA";

/// Where exam records are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// A single JSON document with every table.
    Json { path: PathBuf },
    /// A directory with one JSON file per table.
    JsonDir { path: PathBuf },
}

impl StoreConfig {
    pub fn path(&self) -> &Path {
        match self {
            StoreConfig::Json { path } | StoreConfig::JsonDir { path } => path,
        }
    }

    fn set_path(&mut self, new_path: PathBuf) {
        match self {
            StoreConfig::Json { path } | StoreConfig::JsonDir { path } => *path = new_path,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            path: PathBuf::from("data/exam-data.json"),
        }
    }
}

/// Top-level examscore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamscoreConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub evaluation: EvaluationOptions,
    #[serde(default)]
    pub report: ReportConfig,
    /// Extra skill rules, consulted before the built-in ones.
    #[serde(default)]
    pub skills: Vec<SkillCategoryRule>,
    /// Max reports generated concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./examscore-reports")
}

impl Default for ExamscoreConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            evaluation: EvaluationOptions::default(),
            report: ReportConfig::default(),
            skills: Vec::new(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

impl ExamscoreConfig {
    /// Skill table with the configured rules ahead of the defaults.
    pub fn skill_table(&self) -> SkillCategoryTable {
        SkillCategoryTable::with_overrides(self.skills.clone())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        cursor = start + value.len();
    }
    result
}

fn apply_overrides(config: &mut ExamscoreConfig, data_override: Option<String>) {
    if let Some(path) = data_override.filter(|p| !p.is_empty()) {
        config.store.set_path(PathBuf::from(path));
    }
    let resolved = resolve_env_vars(&config.store.path().to_string_lossy());
    config.store.set_path(PathBuf::from(resolved));
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examscore.toml` in the current directory
/// 2. `~/.config/examscore/config.toml`
///
/// `EXAMSCORE_DATA` overrides the store path.
pub fn load_config() -> Result<ExamscoreConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamscoreConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examscore.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamscoreConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamscoreConfig::default(),
    };

    apply_overrides(&mut config, std::env::var(DATA_ENV_VAR).ok());
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examscore"))
}

/// Open the JSON store described by `config`. Nothing is read until the
/// first fetch.
pub fn open_json_store(config: &StoreConfig) -> Result<JsonStore> {
    match config {
        StoreConfig::Json { path } => {
            if path.is_dir() {
                anyhow::bail!(
                    "store type \"json\" expects a file but {} is a directory; use type = \"json_dir\"",
                    path.display()
                );
            }
            Ok(JsonStore::file(path.clone()))
        }
        StoreConfig::JsonDir { path } => Ok(JsonStore::directory(path.clone())),
    }
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ExamDataStore>> {
    Ok(Arc::new(open_json_store(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use examscore_core::model::QuestionCategory;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMSCORE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMSCORE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMSCORE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${OOPS"), "unterminated ${OOPS");
        std::env::remove_var("_EXAMSCORE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_EXAMSCORE_TEST_SELF", "${_EXAMSCORE_TEST_SELF}");
        std::env::set_var("_EXAMSCORE_TEST_DIR", "/data");
        assert_eq!(
            resolve_env_vars("${_EXAMSCORE_TEST_SELF}/${_EXAMSCORE_TEST_DIR}/x.json"),
            "${_EXAMSCORE_TEST_SELF}//data/x.json"
        );
        std::env::remove_var("_EXAMSCORE_TEST_SELF");
        std::env::remove_var("_EXAMSCORE_TEST_DIR");
    }

    #[test]
    fn default_config() {
        let config = ExamscoreConfig::default();
        assert_eq!(config.store.path(), Path::new("data/exam-data.json"));
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.report.required_level, 70);
        assert!(!config.evaluation.enable_fuzzy_matching);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
parallelism = 2

[store]
type = "json_dir"
path = "exports/"

[evaluation]
enable_fuzzy_matching = true
fuzzy_threshold = 0.85

[report]
required_level = 60

[[skills]]
keywords = ["logical reasoning"]
category = "technical"
"#;
        let config: ExamscoreConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(config.store, StoreConfig::JsonDir { .. }));
        assert_eq!(config.parallelism, 2);
        assert!(config.evaluation.enable_fuzzy_matching);
        assert_eq!(config.evaluation.fuzzy_threshold, 0.85);
        assert!(!config.evaluation.case_sensitive);
        assert_eq!(config.report.required_level, 60);
        assert_eq!(config.report.strength_threshold, 80);

        let table = config.skill_table();
        assert_eq!(table.categorize("Logical reasoning"), QuestionCategory::Technical);
        assert_eq!(table.categorize("React"), QuestionCategory::Technical);
    }

    #[test]
    fn data_override_and_env_resolution() {
        std::env::set_var("_EXAMSCORE_TEST_ROOT", "/srv/exams");
        let mut config = ExamscoreConfig {
            store: StoreConfig::Json {
                path: PathBuf::from("${_EXAMSCORE_TEST_ROOT}/data.json"),
            },
            ..Default::default()
        };
        apply_overrides(&mut config, None);
        assert_eq!(config.store.path(), Path::new("/srv/exams/data.json"));

        apply_overrides(&mut config, Some("/tmp/other.json".into()));
        assert_eq!(config.store.path(), Path::new("/tmp/other.json"));

        apply_overrides(&mut config, Some(String::new()));
        assert_eq!(config.store.path(), Path::new("/tmp/other.json"));
        std::env::remove_var("_EXAMSCORE_TEST_ROOT");
    }

    #[test]
    fn explicit_missing_config_errors() {
        let err = load_config_from(Some(Path::new("/nonexistent/examscore.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examscore.toml");
        std::fs::write(&path, "[report]\nhire_threshold = 80.0\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.report.hire_threshold, 80.0);
    }

    #[tokio::test]
    async fn listing_and_fetching_share_one_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam-data.json");
        std::fs::write(&path, crate::dataset::SAMPLE_DATASET).unwrap();

        let store = open_json_store(&StoreConfig::Json { path: path.clone() }).unwrap();
        assert_eq!(store.session_ids().await.unwrap(), ["s1"]);

        std::fs::remove_file(&path).unwrap();
        let store: Arc<dyn ExamDataStore> = Arc::new(store);
        assert_eq!(store.fetch_candidate("s1").await.unwrap().name, "Ada");
    }

    #[test]
    fn create_store_rejects_directory_for_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::Json {
            path: dir.path().to_path_buf(),
        };
        assert!(create_store(&config).is_err());

        let config = StoreConfig::JsonDir {
            path: dir.path().to_path_buf(),
        };
        assert_eq!(create_store(&config).unwrap().name(), "json_dir");
    }
}
