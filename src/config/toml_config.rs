use crate::domain::{TournamentId, MAX_GROUPS};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub tournament: TournamentSection,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    pub storage: Option<StorageConfig>,
    pub export: Option<ExportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSection {
    pub name: String,
    /// 未指定時由大會名稱推導，同名大會每次執行都得到相同 ID
    pub id: Option<TournamentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub number: u8,
    pub label: Option<String>,
    /// 報名 CSV，相對路徑以設定檔所在目錄為準
    pub participants: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub in_memory: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TournamentConfig {
    /// 從 TOML 檔案載入配置，報名 CSV 路徑改為相對於設定檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.as_ref().parent() {
            for group in &mut config.groups {
                if let Some(csv) = group.participants.as_mut() {
                    if csv.is_relative() {
                        *csv = base.join(&*csv);
                    }
                }
            }
        }
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| RosterError::config("env_substitution", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament.id.unwrap_or_else(|| {
            TournamentId::from_uuid(Uuid::new_v5(
                &Uuid::NAMESPACE_OID,
                self.tournament.name.as_bytes(),
            ))
        })
    }

    pub fn data_dir(&self) -> &str {
        self.storage
            .as_ref()
            .map(|storage| storage.data_dir.as_str())
            .unwrap_or("./data")
    }

    pub fn in_memory(&self) -> bool {
        self.storage
            .as_ref()
            .and_then(|storage| storage.in_memory)
            .unwrap_or(false)
    }

    pub fn output_path(&self) -> &str {
        self.export
            .as_ref()
            .map(|export| export.output_path.as_str())
            .unwrap_or("./export")
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|logging| logging.json)
            .unwrap_or(false)
    }
}

impl Validate for TournamentConfig {
    fn validate(&self) -> Result<()> {
        if self.tournament.name.trim().is_empty() {
            return Err(RosterError::config("tournament.name", "Name cannot be empty"));
        }

        if self.groups.len() > usize::from(MAX_GROUPS) {
            return Err(RosterError::config(
                "groups",
                format!("At most {} groups are allowed, got {}", MAX_GROUPS, self.groups.len()),
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.number < 1 || group.number > MAX_GROUPS {
                return Err(RosterError::config(
                    "groups.number",
                    format!("Group number must be between 1 and {}: got {}", MAX_GROUPS, group.number),
                ));
            }
            if !seen.insert(group.number) {
                return Err(RosterError::config(
                    "groups.number",
                    format!("Group {} is defined more than once", group.number),
                ));
            }
        }

        validate_path("storage.data_dir", self.data_dir())?;
        validate_path("export.output_path", self.output_path())?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level()) {
            return Err(RosterError::config(
                "logging.level",
                format!(
                    "Unsupported level '{}'. Valid levels: {}",
                    self.log_level(),
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const BASIC: &str = r#"
[tournament]
name = "春季大会"

[[groups]]
number = 1
label = "有段者の部"
participants = "group1.csv"

[[groups]]
number = 2

[storage]
data_dir = "./data"

[export]
output_path = "./out"
"#;

    #[test]
    fn test_parse_basic_config() {
        let config = TournamentConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.tournament.name, "春季大会");
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[0].label.as_deref(), Some("有段者の部"));
        assert_eq!(config.output_path(), "./out");
        assert_eq!(config.log_level(), "info");
        assert!(!config.in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tournament_id_is_stable_per_name() {
        let a = TournamentConfig::from_toml_str(BASIC).unwrap();
        let b = TournamentConfig::from_toml_str(BASIC).unwrap();
        assert_eq!(a.tournament_id(), b.tournament_id());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SWISS_ROSTER_TEST_DATA_DIR", "/tmp/roster-data");

        let content = r#"
[tournament]
name = "test"

[storage]
data_dir = "${SWISS_ROSTER_TEST_DATA_DIR}"
"#;
        let config = TournamentConfig::from_toml_str(content).unwrap();
        assert_eq!(config.data_dir(), "/tmp/roster-data");

        std::env::remove_var("SWISS_ROSTER_TEST_DATA_DIR");
    }

    #[test]
    fn test_validation_rejects_bad_groups() {
        let duplicate = r#"
[tournament]
name = "test"

[[groups]]
number = 1

[[groups]]
number = 1
"#;
        let config = TournamentConfig::from_toml_str(duplicate).unwrap();
        assert!(config.validate().is_err());

        let out_of_range = r#"
[tournament]
name = "test"

[[groups]]
number = 9
"#;
        let config = TournamentConfig::from_toml_str(out_of_range).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RosterError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file_resolves_csv_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tournament.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(BASIC.as_bytes()).unwrap();

        let config = TournamentConfig::from_file(&path).unwrap();
        assert_eq!(
            config.groups[0].participants.as_deref(),
            Some(dir.path().join("group1.csv").as_path())
        );
    }
}
