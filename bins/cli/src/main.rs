//! Vaultra banking CLI.
//!
//! A text-menu front end over the ledger engine. Pure I/O: every piece
//! of business logic (ownership, sufficiency, atomicity) lives behind
//! the engine boundary. The only policy implemented here is retrying
//! `StoreUnavailable` failures with the configured backoff.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaultra_core::{LedgerEngine, Session};
use vaultra_shared::config::RetryConfig;
use vaultra_shared::{AccountId, AppConfig, AppResult, Money, UserId};
use vaultra_store::{MemoryAuthenticator, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vaultra=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Open the store
    let store = vaultra_store::open(&config.store)?;
    info!(url = %config.store.url, "store opened");

    let engine = LedgerEngine::new(store);
    let auth = MemoryAuthenticator::new();

    println!("=== Welcome to Vaultra ===");
    run(&engine, &auth, &config.retry).await;
    Ok(())
}

/// Drives the menu loop until the user exits.
async fn run(
    engine: &LedgerEngine<MemoryStore>,
    auth: &MemoryAuthenticator,
    retry: &RetryConfig,
) {
    let mut session = Session::anonymous();
    loop {
        let outcome = if session.is_authenticated() {
            main_menu(engine, retry, &mut session).await
        } else {
            auth_menu(auth, &mut session).await
        };

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return,
            Err(err) => println!("{}: {err}", err.error_code()),
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

async fn auth_menu(auth: &MemoryAuthenticator, session: &mut Session) -> AppResult<Flow> {
    println!("\n1. Login\n2. Register\n3. Exit");
    let choice = prompt("Choice: ");

    match choice.as_str() {
        "1" => {
            let user = UserId::new(prompt("UserID: "));
            let secret = prompt("Password: ");
            if session.login(auth, user.clone(), &secret).await? {
                println!("Login successful! Welcome, {user}");
            } else {
                println!("Invalid credentials.");
            }
        }
        "2" => {
            let user = UserId::new(prompt("UserID: "));
            let secret = prompt("Password: ");
            auth.register(user.clone(), &secret)?;
            println!("Registered {user}. You can log in now.");
        }
        "3" => return Ok(Flow::Exit),
        _ => println!("Invalid choice."),
    }
    Ok(Flow::Continue)
}

async fn main_menu(
    engine: &LedgerEngine<MemoryStore>,
    retry: &RetryConfig,
    session: &mut Session,
) -> AppResult<Flow> {
    println!("\n--- MAIN MENU ---");
    println!("1. View My Accounts");
    println!("2. Open New Account");
    println!("3. View Balance");
    println!("4. Deposit Money");
    println!("5. Withdraw Money");
    println!("6. Transfer Money");
    println!("7. Account History");
    println!("8. Logout");

    let choice = prompt("Selection: ");
    if choice == "8" {
        session.logout();
        println!("Logged out successfully.");
        return Ok(Flow::Continue);
    }

    let session: &Session = session;
    match choice.as_str() {
        "1" => {
            let accounts = with_retry(retry, || engine.my_accounts(session)).await?;
            if accounts.is_empty() {
                println!("You have no active accounts.");
            } else {
                println!("\nID\t| Balance");
                println!("------------------");
                for account in accounts {
                    println!("{}\t| ${}", account.id, account.balance);
                }
            }
        }
        "2" => {
            let amount = prompt_money("Enter initial deposit amount: ")?;
            let account = with_retry(retry, || engine.open_account(session, amount)).await?;
            println!("Account {} created successfully.", account.id);
        }
        "3" => {
            let id = prompt_account_id("Enter Account ID: ")?;
            let balance = with_retry(retry, || engine.balance(session, id)).await?;
            println!("Current Balance: ${balance}");
        }
        "4" => {
            let id = prompt_account_id("Enter Account ID: ")?;
            let amount = prompt_money("Amount to deposit: ")?;
            with_retry(retry, || engine.deposit(session, id, amount)).await?;
            println!("Deposit complete.");
        }
        "5" => {
            let id = prompt_account_id("Enter Account ID: ")?;
            let amount = prompt_money("Amount to withdraw: ")?;
            with_retry(retry, || engine.withdraw(session, id, amount)).await?;
            println!("Withdrawal complete.");
        }
        "6" => {
            let from = prompt_account_id("From Account ID: ")?;
            let to = prompt_account_id("To Account ID: ")?;
            let amount = prompt_money("Transfer Amount: ")?;
            with_retry(retry, || engine.transfer(session, from, to, amount)).await?;
            println!("Transfer successful.");
        }
        "7" => {
            let id = prompt_account_id("Enter Account ID: ")?;
            let records = with_retry(retry, || engine.history(session, id)).await?;
            if records.is_empty() {
                println!("No movements yet.");
            } else {
                for record in records {
                    let from = endpoint(record.from_account);
                    let to = endpoint(record.to_account);
                    println!(
                        "{}  {}  {} -> {}  ${}",
                        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        record.kind(),
                        from,
                        to,
                        record.amount
                    );
                }
            }
        }
        _ => println!("Invalid option."),
    }
    Ok(Flow::Continue)
}

/// Retries a retryable failure with the configured backoff; everything
/// else is returned verbatim.
async fn with_retry<T, F, Fut>(retry: &RetryConfig, mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_retryable() && attempt < retry.max_attempts => {
                warn!(attempt, %err, "retrying after transient store failure");
                tokio::time::sleep(Duration::from_millis(retry.backoff_ms)).await;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}

fn endpoint(id: Option<AccountId>) -> String {
    id.map_or_else(|| "external".to_string(), |id| format!("#{id}"))
}

fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);
    line.trim().to_string()
}

fn prompt_account_id(message: &str) -> AppResult<AccountId> {
    prompt(message)
        .parse()
        .map_err(|_| vaultra_shared::AppError::InvalidArgument("not an account id".to_string()))
}

fn prompt_money(message: &str) -> AppResult<Money> {
    prompt(message)
        .parse()
        .map_err(|_| vaultra_shared::AppError::InvalidArgument("not a valid amount".to_string()))
}
