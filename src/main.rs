//! A small CLI for smoke-testing a deployed API: logs the session profile,
//! fetches the active month's transactions, and prints the first page the
//! way the transactions screen would render it.

use std::sync::Arc;

use clap::Parser;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use ledgerview::{
    Error, Month, PaginationConfig, PaginationIndicator, Session, http::HttpApi,
    transaction::TransactionsScreen,
};

#[derive(Parser)]
#[command(name = "ledgerview", about = "Smoke-test a ledgerview API deployment")]
struct Args {
    /// The base URL of the remote API.
    #[arg(long, env = "LEDGERVIEW_API_URL")]
    api_url: String,

    /// The bearer token to authenticate with.
    #[arg(long, env = "LEDGERVIEW_API_TOKEN")]
    token: String,

    /// The month to fetch, e.g. "2026-08". Defaults to the current month.
    #[arg(long)]
    month: Option<Month>,

    /// Transactions to show per page.
    #[arg(long, default_value_t = 20)]
    per_page: u64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let month = args
        .month
        .unwrap_or_else(|| Month::containing(OffsetDateTime::now_utc().date()));

    let api = Arc::new(HttpApi::new(&args.api_url, &args.token));
    let session = Session::start(api.clone(), month).await?;

    println!(
        "logged in as {} <{}>, month {}",
        session.user().name,
        session.user().email,
        session.active_month()
    );

    let config = PaginationConfig {
        page_size: args.per_page,
        ..PaginationConfig::default()
    };
    let mut screen = TransactionsScreen::new(api, config, month);
    screen.reload().await;

    let (transactions, window) = screen.page();

    for transaction in &transactions {
        println!(
            "{}  {:>10.2}  {:<8}  {}",
            transaction.date,
            transaction.amount,
            transaction.kind.as_str(),
            transaction.description
        );
    }

    let mut controls = Vec::new();
    for indicator in &window.indicators {
        match indicator {
            PaginationIndicator::Page(page) => controls.push(page.to_string()),
            PaginationIndicator::CurrPage(page) => controls.push(format!("[{page}]")),
            PaginationIndicator::Ellipsis => controls.push("...".to_owned()),
        }
    }
    println!("pages: {}", controls.join(" "));

    Ok(())
}
