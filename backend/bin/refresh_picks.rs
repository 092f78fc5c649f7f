use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use worldate::{
    db::{get_db_pool, users, DatabaseConfig},
    services::recommendations,
    utils::{dates, init_logging, config::Config},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("refresh-picks")
        .about("Regenerate today's daily picks for selected users")
        .arg(
            Arg::new("user-id")
                .long("user-id")
                .help("User to refresh (repeatable)")
                .value_parser(clap::value_parser!(i32))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .help("Refresh every user")
                .action(ArgAction::SetTrue)
                .conflicts_with("user-id"),
        )
        .get_matches();

    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    let user_ids: Vec<i32> = if matches.get_flag("all") {
        users::list_user_ids(&pool).await?
    } else {
        matches
            .get_many::<i32>("user-id")
            .map(|ids| ids.copied().collect())
            .unwrap_or_default()
    };

    if user_ids.is_empty() {
        info!("No users selected. Pass --user-id <ID> or --all.");
        return Ok(());
    }

    // One date for the whole run so a batch spanning midnight stays consistent
    let picked_for_date = dates::today(config.picks_timezone);
    info!("🔄 Refreshing daily picks for {} users on {}", user_ids.len(), picked_for_date);

    let mut refreshed = 0;
    let mut failed = 0;
    for user_id in user_ids {
        match recommendations::refresh_daily_picks_for_date(&pool, user_id, picked_for_date).await {
            Ok(outcome) => {
                refreshed += 1;
                info!("✅ User {}: {} picks", user_id, outcome.count);
            }
            Err(e) => {
                failed += 1;
                error!("❌ Failed to refresh picks for user {}: {}", user_id, e);
            }
        }
    }

    info!("🎉 Refresh complete: {} succeeded, {} failed", refreshed, failed);
    if failed > 0 {
        anyhow::bail!("{} refreshes failed", failed);
    }

    Ok(())
}
