use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use rand::seq::{IndexedRandom, SliceRandom};
use sqlx::PgPool;
use tracing::{info, warn};
use worldate::{
    db::{get_db_pool, interests, likes, DatabaseConfig},
    models::NewUser,
    services::profiles,
    utils::init_logging,
};

const INTEREST_VOCABULARY: &[&str] = &[
    "Travel", "Music", "Coffee", "Dancing", "Hiking", "Tech", "Movies", "Fitness",
    "Art", "Cooking", "Books", "Gaming", "Yoga", "Photography", "Pets",
];

const DEMO_PROFILES: &[(&str, i32, &str)] = &[
    ("John", 28, "NYC"),
    ("Sarah", 25, "SF"),
    ("Mike", 32, "LA"),
    ("Emma", 27, "Chicago"),
    ("Alex", 30, "Austin"),
    ("Olivia", 24, "Seattle"),
    ("David", 35, "Boston"),
    ("Sophia", 29, "Miami"),
    ("James", 31, "Denver"),
    ("Mia", 26, "Portland"),
    ("Daniel", 33, "Atlanta"),
    ("Ava", 23, "Nashville"),
];

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("seed")
        .about("Seed the interest vocabulary and optional demo data")
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Also create demo users with random interests and likes")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    let mut added = 0;
    for name in INTEREST_VOCABULARY {
        if interests::ensure_interest(&pool, name).await? {
            added += 1;
        }
    }
    info!("✅ Interest vocabulary seeded ({} new of {})", added, INTEREST_VOCABULARY.len());

    if matches.get_flag("demo") {
        seed_demo_users(&pool).await?;
    }

    Ok(())
}

async fn seed_demo_users(pool: &PgPool) -> Result<()> {
    let interest_ids: Vec<i32> = interests::list_interests(pool)
        .await?
        .into_iter()
        .map(|interest| interest.id)
        .collect();

    let mut user_ids = Vec::new();
    for (name, age, location) in DEMO_PROFILES {
        let new_user = NewUser {
            name: name.to_string(),
            age: *age,
            location: location.to_string(),
            bio: None,
            avatar_url: None,
            world_username: None,
        };
        let user = profiles::create_user(pool, &new_user).await?;
        user_ids.push(user.id);
    }
    info!("👥 Created {} demo users", user_ids.len());

    let mut like_count = 0;
    for &user_id in &user_ids {
        // Rngs are rebuilt per user so none is held across an await
        let (chosen, targets) = {
            let mut rng = rand::rng();
            let chosen: Vec<i32> = interest_ids.choose_multiple(&mut rng, 3).copied().collect();
            let mut others: Vec<i32> = user_ids.iter().copied().filter(|id| *id != user_id).collect();
            others.shuffle(&mut rng);
            others.truncate(3);
            (chosen, others)
        };

        if chosen.is_empty() {
            warn!("No interests available; run without --demo first");
        } else {
            profiles::replace_user_interests(pool, user_id, &chosen).await?;
        }

        for target in targets {
            if likes::insert_like(pool, user_id, target).await? {
                like_count += 1;
            }
        }
    }
    info!("💘 Recorded {} demo likes", like_count);

    Ok(())
}
