use crate::config::TournamentConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "swiss-roster")]
#[command(about = "Build group rosters and seeding orders for a tournament")]
pub struct CliArgs {
    /// Path to the tournament TOML file
    #[arg(short, long, default_value = "tournament.toml")]
    pub config: String,

    /// Override the data directory from the config
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Override the export directory from the config
    #[arg(long)]
    pub output_path: Option<String>,

    /// Keep everything in memory instead of writing JSON snapshots
    #[arg(long)]
    pub in_memory: bool,

    /// Only show what would be imported
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TournamentConfig) {
        if let Some(data_dir) = &self.data_dir {
            let storage = config.storage.get_or_insert_with(|| {
                crate::config::toml_config::StorageConfig {
                    data_dir: data_dir.clone(),
                    in_memory: None,
                }
            });
            storage.data_dir = data_dir.clone();
        }

        if self.in_memory {
            let storage = config.storage.get_or_insert_with(|| {
                crate::config::toml_config::StorageConfig {
                    data_dir: "./data".to_string(),
                    in_memory: None,
                }
            });
            storage.in_memory = Some(true);
        }

        if let Some(output_path) = &self.output_path {
            config.export = Some(crate::config::toml_config::ExportConfig {
                output_path: output_path.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = TournamentConfig::from_toml_str(
            r#"
[tournament]
name = "test"

[storage]
data_dir = "./data"
"#,
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "swiss-roster",
            "--data-dir",
            "/var/lib/roster",
            "--output-path",
            "/tmp/export",
            "--in-memory",
        ]);
        args.apply_overrides(&mut config);

        assert_eq!(config.data_dir(), "/var/lib/roster");
        assert_eq!(config.output_path(), "/tmp/export");
        assert!(config.in_memory());
    }
}
