use dotenv::dotenv;
use log::warn;
use opsboard::activities::{group_by_status, ActivityFilter};
use opsboard::api::NotificationQuery;
use opsboard::Opsboard;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load OPSBOARD_API_URL / OPSBOARD_API_TOKEN from .env
    dotenv().ok();
    pretty_env_logger::init();

    let opsboard = Opsboard::from_env()?;

    let user = opsboard.verify_session().await?;
    println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);

    println!("\n1. Sales funnel");
    let funnel = opsboard.funnel();
    funnel.load().await?;
    for toast in funnel.take_toasts().await {
        warn!("{}: {}", toast.title, toast.description);
    }
    let board = funnel.snapshot().await;
    println!("  Backlog: {} leads", board.backlog.len());
    for column in &board.columns {
        println!("  [{}] {}: {} leads", column.order, column.title, column.leads.len());
        for lead in &column.leads {
            println!("    - {} ({:?})", lead.nome, lead.status);
        }
    }

    println!("\n2. Activities");
    let activities = opsboard.activities();
    activities.load().await?;
    let list = activities.activities().await;
    let all = ActivityFilter::default().apply(list.as_slice());
    for column in group_by_status(&all) {
        println!("  {}: {}", column.title(), column.activities.len());
    }

    println!("\n3. Notifications");
    let inbox = opsboard.inbox();
    match inbox.refresh(&NotificationQuery::unread().with_limit(10)).await {
        Ok(()) => {
            let counts = inbox.counts().await;
            println!(
                "  {} total, {} unread, {} urgent",
                counts.total, counts.unread, counts.urgent
            );
            for n in inbox.notifications().await {
                println!("    - {}: {}", n.titulo, n.mensagem);
            }
        }
        Err(e) => println!("  Could not load notifications: {}", e),
    }

    Ok(())
}
