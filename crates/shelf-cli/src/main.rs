use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_core::token::{Claims, TokenError};
use shelf_core::validation::Registration;
use shelf_core::{Account, AccountStore, PasswordHasher, TokenConfig, TokenIssuer, register_account};
use shelf_db::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "shelf", version, about = "Operator tools for the Shelf account service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create an account directly, e.g. to bootstrap the first librarian
    CreateAccount {
        /// Username (3-50 characters, stored lowercased)
        #[arg(short, long)]
        username: String,

        /// Password (reads from SHELF_ACCOUNT_PASSWORD if not provided)
        #[arg(short, long, env = "SHELF_ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,

        /// Role: member or librarian
        #[arg(short, long, default_value = "librarian")]
        role: String,
    },

    /// List all accounts, newest first
    ListAccounts,

    /// Check a token against the configured JWT_SECRET and print its claims
    VerifyToken {
        /// The bearer token, without the "Bearer " prefix
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("shelf=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => {
            connect_db().await?;
            println!("Migrations applied");
        }
        Commands::CreateAccount {
            username,
            password,
            role,
        } => {
            let repo = connect_db().await?.account_repo();
            let account = cmd_create_account(&repo, &username, &password, &role).await?;
            println!(
                "Created {} account '{}' (id {})",
                account.role, account.username, account.id
            );
        }
        Commands::ListAccounts => {
            let repo = connect_db().await?.account_repo();
            cmd_list_accounts(&repo).await?;
        }
        Commands::VerifyToken { token } => {
            let claims = cmd_verify_token(&token_issuer()?, &token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and apply migrations.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    Ok(db)
}

fn token_issuer() -> Result<TokenIssuer> {
    let config = TokenConfig::from_env()?;
    Ok(TokenIssuer::new(&config))
}

async fn cmd_create_account<S: AccountStore>(
    store: &S,
    username: &str,
    password: &str,
    role: &str,
) -> Result<Account> {
    let registration = Registration::parse(Some(username), Some(password), Some(role))?;
    let account = register_account(store, &PasswordHasher::new(), registration).await?;
    Ok(account)
}

async fn cmd_list_accounts<S: AccountStore>(store: &S) -> Result<()> {
    let accounts = store.list().await?;

    if accounts.is_empty() {
        println!("No accounts found");
        return Ok(());
    }

    for account in &accounts {
        println!(
            "  {:>6}  {:<50}  {:<9}  {}",
            account.id,
            account.username,
            account.role,
            account.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );
    }

    println!("\nTotal: {} accounts", accounts.len());
    Ok(())
}

/// Accepts the token as pasted from an `Authorization` header.
fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    token.strip_prefix("Bearer ").unwrap_or(token).trim()
}

fn cmd_verify_token(issuer: &TokenIssuer, token: &str) -> Result<Claims> {
    match issuer.verify(strip_bearer(token)) {
        Ok(claims) => Ok(claims),
        Err(TokenError::Expired) => anyhow::bail!("Token has expired"),
        Err(TokenError::Malformed) => anyhow::bail!("Token is invalid"),
    }
}
