//! Usage: set_activity_status <activity-id> <nao-iniciada|em-andamento|concluida|atrasada>

use std::env;

use dotenv::dotenv;
use opsboard::activities::{ActivityField, ActivityStatus};
use opsboard::Opsboard;
use opsboard_optimistic::Outcome;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(id), Some(column)) = (args.next(), args.next()) else {
        eprintln!("usage: set_activity_status <activity-id> <status-column>");
        std::process::exit(2);
    };
    let Some(status) = ActivityStatus::from_column_id(&column) else {
        eprintln!("unknown status column '{}'", column);
        std::process::exit(2);
    };

    let opsboard = Opsboard::from_env()?;
    opsboard.verify_session().await?;

    let activities = opsboard.activities();
    activities.load().await?;

    match activities.set_status(&id, status).await {
        Outcome::Saved => println!("{} is now '{}'", id, status),
        Outcome::Failed(message) => println!("Save failed, status kept: {}", message),
        Outcome::UnknownRecord => println!("No activity with id {}", id),
        Outcome::Superseded => println!("A newer edit took over"),
    }
    println!(
        "Badge: {:?}",
        activities.status(&id, ActivityField::Status).await
    );

    Ok(())
}
