use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use swiss_roster::adapters::{csv as roster_csv, InMemoryStore, JsonFileStore};
use swiss_roster::utils::{logger, validation::Validate};
use swiss_roster::{
    CliArgs, GroupIdentity, GroupRepository, ParticipantRecord, RosterRepository, RosterService,
    TournamentConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = TournamentConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;
    args.apply_overrides(&mut config);

    // 初始化日誌
    let log_level = if args.verbose { "debug" } else { config.log_level() };
    if config.json_logs() {
        logger::init_json_logger(log_level);
    } else {
        logger::init_cli_logger(log_level);
    }

    tracing::info!("🚀 Starting swiss-roster for '{}'", config.tournament.name);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if args.dry_run {
        display_plan(&config);
        return Ok(());
    }

    let result = if config.in_memory() {
        tracing::info!("🧠 Using in-memory storage");
        let store = InMemoryStore::new();
        run(RosterService::new(store.clone(), store), &config).await
    } else {
        tracing::info!("💾 Using JSON storage at {}", config.data_dir());
        let store = JsonFileStore::new(config.data_dir());
        run(RosterService::new(store.clone(), store), &config).await
    };

    match result {
        Ok(exported) => {
            tracing::info!("✅ Rosters built for {} group(s)", exported);
            println!("✅ Rosters built for {} group(s)", exported);
            println!("📁 Exports saved to: {}", config.output_path());
        }
        Err(e) => {
            tracing::error!(
                "❌ Roster build failed: {} (Severity: {:?})",
                e,
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

async fn run<R: RosterRepository, G: GroupRepository>(
    service: RosterService<R, G>,
    config: &TournamentConfig,
) -> swiss_roster::Result<usize> {
    let tournament_id = config.tournament_id();
    let output_dir = Path::new(config.output_path());
    tokio::fs::create_dir_all(output_dir).await?;

    let mut built = 0;
    for group_config in &config.groups {
        // 每次執行都重建組別，同一份設定重跑結果一致
        let existing = service.list_groups(tournament_id).await?;
        if existing
            .iter()
            .any(|group| group.group_number() == group_config.number)
        {
            service
                .delete_group(tournament_id, group_config.number)
                .await?;
        }

        let group = service
            .create_group(tournament_id, group_config.number, group_config.label.clone())
            .await?;

        if let Some(csv_path) = &group_config.participants {
            tracing::info!("📥 Importing {}", csv_path.display());
            let content = tokio::fs::read(csv_path).await?;
            let participants = roster_csv::read_participants(content.as_slice())?;
            service
                .import_participants(tournament_id, group.group_number(), participants)
                .await?;
        }

        let seeding = service
            .seeding_order(tournament_id, group.group_number())
            .await?;
        print_seeding(&group, &seeding);

        let roster = service.roster(tournament_id, group.group_number()).await?;
        let export_path = output_dir.join(roster_csv::export_file_name(&group, Utc::now()));
        let mut buffer = Vec::new();
        let written = roster_csv::write_roster(&mut buffer, &roster)?;
        tokio::fs::write(&export_path, buffer).await?;
        tracing::info!(
            "📁 Exported {} participant(s) of {} to {}",
            written,
            group.display_label(),
            export_path.display()
        );

        built += 1;
    }

    Ok(built)
}

fn print_seeding(group: &GroupIdentity, seeding: &[ParticipantRecord]) {
    println!("\n== {} ==", group.display_label());
    for (position, record) in seeding.iter().enumerate() {
        let rank = record.rank().map(|rank| rank.label()).unwrap_or("-");
        match record.affiliation() {
            Some(affiliation) => println!(
                "{:>3}. {:<4} {} ({})",
                position + 1,
                rank,
                record.name(),
                affiliation
            ),
            None => println!("{:>3}. {:<4} {}", position + 1, rank, record.name()),
        }
    }
}

fn display_plan(config: &TournamentConfig) {
    tracing::info!("🔍 DRY RUN MODE - No rosters will be written");
    println!("Tournament: {} ({})", config.tournament.name, config.tournament_id());
    println!(
        "Storage:    {}",
        if config.in_memory() {
            "in-memory"
        } else {
            config.data_dir()
        }
    );
    println!("Export:     {}", config.output_path());
    for group in &config.groups {
        let label = group
            .label
            .clone()
            .unwrap_or_else(|| format!("GROUP {}", group.number));
        match &group.participants {
            Some(path) => println!("  - {} <- {}", label, path.display()),
            None => println!("  - {} (no participants file)", label),
        }
    }
}
