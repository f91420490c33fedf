use anyhow::Result;
use chrono::Utc;
use clap::{Arg, Command};
use reflecta::db::{get_db_pool, kv, migrations::run_migrations, DatabaseConfig};
use reflecta::utils::init_logging;
use reflecta::SqlitePool;
use std::fs;
use std::io::Write;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("backup-store")
        .about("Backup and optionally wipe the session key-value store")
        .arg(
            Arg::new("backup-only")
                .long("backup-only")
                .help("Only create backup, don't wipe the store")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("confirm-wipe")
                .long("confirm-wipe")
                .help("Confirm that you want to wipe the store (required for wipe)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory the backup is written to")
                .default_value("./store_backups"),
        )
        .get_matches();

    let backup_only = matches.get_flag("backup-only");
    let confirm_wipe = matches.get_flag("confirm-wipe");
    let output_dir = matches
        .get_one::<String>("output-dir")
        .cloned()
        .unwrap_or_else(|| "./store_backups".to_string());

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    run_migrations(&pool).await?;
    info!("Connected to {}", db_config.database_url);

    // Step 1: Create backup
    info!("🔄 Creating backup of key-value store...");
    let backup_file = create_backup(&pool, &output_dir).await?;
    info!("✅ Backup created successfully: {}", backup_file);

    if backup_only {
        info!("Backup-only mode. Store was not modified.");
        return Ok(());
    }

    // Step 2: Wipe (only if confirmed)
    if !confirm_wipe {
        warn!("⚠️  Wipe not confirmed. Use --confirm-wipe to proceed with wiping the store.");
        info!("Backup created: {}", backup_file);
        return Ok(());
    }

    info!("🔄 Wiping key-value store...");
    let deleted_count = wipe_store(&pool).await?;

    info!("🎉 Operation complete!");
    info!("📁 Backup: {}", backup_file);
    info!("🗑️  Deleted: {} records", deleted_count);

    Ok(())
}

async fn create_backup(pool: &SqlitePool, output_dir: &str) -> Result<String> {
    fs::create_dir_all(output_dir)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let backup_file = format!("{}/kv_store_backup_{}.json", output_dir, timestamp);

    let entries = kv::list(pool).await?;
    info!("Found {} entries to backup", entries.len());

    let records: Vec<serde_json::Value> = entries
        .into_iter()
        .map(|entry| {
            serde_json::json!({
                "key": entry.key,
                "value": entry.value,
                "updated_at": entry.updated_at,
            })
        })
        .collect();

    let json_data = serde_json::to_string_pretty(&records)?;
    let mut file = fs::File::create(&backup_file)?;
    file.write_all(json_data.as_bytes())?;

    Ok(backup_file)
}

async fn wipe_store(pool: &SqlitePool) -> Result<u64> {
    let count_before = kv::count(pool).await?;
    info!("Records before deletion: {}", count_before);

    let deleted_count = kv::clear(pool).await?;

    let count_after = kv::count(pool).await?;
    info!("Records after deletion: {}", count_after);

    if count_after != 0 {
        error!("Warning: {} records still remain in the store", count_after);
    }

    Ok(deleted_count)
}
