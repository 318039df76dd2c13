use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    save_user, session::JWT_KEY, FileStorage, HttpStore, KeyValueStorage, StorageSession, Store,
};
use frontend::{
    dom::{test_ids, Document, FileInput, HeadlessModal, NewBillForm, SelectedFile},
    load_settings, Route, Router, Screen,
};
use shared::domain::User;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Billed employee pages from the terminal")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Overrides the configured session file.
    #[arg(long)]
    session_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stores an employee session.
    Login {
        #[arg(long)]
        email: String,
        /// Bearer token sent with every API call.
        #[arg(long)]
        token: Option<String>,
    },
    Logout,
    /// Lists the employee's bills, most recent first.
    List,
    /// Opens the receipt of the bill at `index` in the list.
    Preview {
        index: usize,
        #[arg(long, default_value_t = 800)]
        modal_width: u32,
    },
    /// Uploads a receipt and submits a new bill.
    New(NewBillArgs),
}

#[derive(Args, Debug)]
struct NewBillArgs {
    #[arg(long = "type")]
    expense_type: String,
    #[arg(long, default_value = "")]
    name: String,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    date: String,
    #[arg(long)]
    amount: String,
    #[arg(long, default_value = "")]
    vat: String,
    #[arg(long, default_value = "")]
    pct: String,
    #[arg(long, default_value = "")]
    commentary: String,
    #[arg(long)]
    receipt: PathBuf,
    /// Time left to the background update before the process exits.
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(path) = cli.session_path {
        settings.session_path = path.display().to_string();
    }

    let storage: Arc<dyn KeyValueStorage> = Arc::new(
        FileStorage::open(&settings.session_path)
            .with_context(|| format!("opening session file {}", settings.session_path))?,
    );

    let modal_width = match &cli.command {
        Command::Preview { modal_width, .. } => *modal_width,
        _ => 800,
    };
    let modal = Arc::new(HeadlessModal::new(modal_width));
    let store: Arc<dyn Store> = Arc::new(HttpStore::with_token_storage(
        &settings.api_url,
        Some(storage.clone()),
    )?);
    let router = Router::new(
        Arc::new(Document::new(modal.clone())),
        Some(store),
        Arc::new(StorageSession::new(storage.clone())),
        settings.upload.clone(),
    );

    match cli.command {
        Command::Login { email, token } => {
            save_user(storage.as_ref(), &User::employee(email.clone()))?;
            if let Some(token) = token {
                storage.set_item(JWT_KEY, &token)?;
            }
            info!(email = %email, "session stored");
            println!("Logged in as {email}");
        }
        Command::Logout => {
            storage.clear()?;
            println!("Logged out");
        }
        Command::List => {
            router.on_navigate(Route::Bills).await;
            print_screen(&router).await?;
        }
        Command::Preview { index, .. } => {
            router.on_navigate(Route::Bills).await;
            let Screen::Bills { page, container } = router.screen().await else {
                return print_screen(&router).await;
            };
            let icon = page
                .eye_icons
                .get(index)
                .ok_or_else(|| anyhow!("no bill at index {index}; {} listed", page.rows.len()))?;
            container.handle_click_icon_eye(icon);
            println!("{}", modal.content().unwrap_or_default());
        }
        Command::New(args) => submit_new_bill(&router, args).await?,
    }

    Ok(())
}

async fn submit_new_bill(router: &Router, args: NewBillArgs) -> Result<()> {
    router.on_navigate(Route::NewBill).await;
    let Screen::NewBill { container, .. } = router.screen().await else {
        return print_screen(router).await;
    };

    let content = tokio::fs::read(&args.receipt)
        .await
        .with_context(|| format!("reading receipt {}", args.receipt.display()))?;
    let file_name = args
        .receipt
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("receipt")
        .to_string();
    let mime_type = mime_guess::from_path(&args.receipt)
        .first_raw()
        .unwrap_or("application/octet-stream");
    let mut input = FileInput::with_file(SelectedFile::new(file_name, mime_type, content));

    if let Err(err) = container.handle_change_file(&mut input).await {
        if let Some(message) = input.error() {
            eprintln!("{message}");
        }
        bail!(err);
    }

    let mut form = NewBillForm::default();
    for (id, value) in [
        (test_ids::EXPENSE_TYPE, args.expense_type),
        (test_ids::EXPENSE_NAME, args.name),
        (test_ids::DATEPICKER, args.date),
        (test_ids::AMOUNT, args.amount),
        (test_ids::VAT, args.vat),
        (test_ids::PCT, args.pct),
        (test_ids::COMMENTARY, args.commentary),
    ] {
        form.set_field(id, value);
    }
    container.handle_submit(&form).await?;

    if router.process_pending().await == 0 {
        warn!("submission did not request a navigation");
    }
    print_screen(router).await?;
    tokio::time::sleep(Duration::from_millis(args.settle_ms)).await;
    Ok(())
}

async fn print_screen(router: &Router) -> Result<()> {
    match router.screen().await {
        Screen::Bills { page, .. } => {
            if page.rows.is_empty() {
                println!("No bills.");
            }
            for (index, row) in page.rows.iter().enumerate() {
                println!(
                    "{index:>3}  {:<12} {:<22} {:<24} {:>6} €  {}",
                    row.date,
                    row.bill.expense_type,
                    row.bill.name,
                    row.bill.amount,
                    row.status,
                );
            }
            Ok(())
        }
        Screen::Login => bail!("no employee session; run `login --email <address>` first"),
        Screen::Error { message } => bail!("{message}"),
        other => bail!("unexpected screen '{}'", other.name()),
    }
}
