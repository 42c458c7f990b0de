use outlay::config::Config;
use outlay::sort_utils::SortCriterion;
use outlay::state::Workspace;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outlay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "outlay {} connecting to payments service at {}",
        outlay::VERSION,
        config.api_url
    );

    let mut workspace = Workspace::new(&config).expect("Failed to create API client");
    if let Err(e) = workspace.load().await {
        tracing::error!("Failed to load collections: {}", e);
        std::process::exit(1);
    }

    let summary = workspace.spending_summary();
    println!("Total spending: ${:.2}", summary.grand_total);
    println!("Spending by category:");
    for bucket in &summary.buckets {
        println!(
            "  {:<24} ${:>10.2}  {:>5.1}%  {}",
            bucket.name, bucket.total, bucket.percentage, bucket.color
        );
    }

    println!("Payments:");
    for payment in workspace.listing(SortCriterion::Alphabetical) {
        println!(
            "  {}  {:<28} ${:>10.2}",
            payment.date,
            payment.display_name(),
            payment.value
        );
    }
}
