// ============================================================================
// paydash-admin - back-office CLI
// ============================================================================
// CRUD over the four administrable resources (users, admins, cryptodetails,
// status) plus login and user block/unblock. Records print as pretty JSON;
// list output is one summary line per record.
// ============================================================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use paydash::api::admin::{AdminClient, Resource};
use paydash::config::{self, DEFAULT_API_BASE};

/// Token file name under the config directory, separate from the user
/// session token.
const ADMIN_TOKEN_FILE: &str = "admin-token";

#[derive(Parser)]
#[command(name = "paydash-admin", about = "Back-office administration for the payments backend", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Backend API base URL.
    #[arg(long, env = "PAYDASH_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Admin bearer token (falls back to the saved token from `login`).
    #[arg(long, env = "PAYDASH_ADMIN_TOKEN")]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in as an operator and persist the admin token.
    Login {
        #[arg(long, env = "PAYDASH_ADMIN_EMAIL")]
        email: String,

        #[arg(long, env = "PAYDASH_ADMIN_PASSWORD")]
        password: String,
    },

    /// Manage user accounts.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage operator accounts.
    Admins {
        #[command(subcommand)]
        action: CrudAction,
    },

    /// Manage crypto asset metadata (deposit addresses, icons).
    Crypto {
        #[command(subcommand)]
        action: CrudAction,
    },

    /// Manage transaction status labels.
    Status {
        #[command(subcommand)]
        action: CrudAction,
    },
}

#[derive(Subcommand)]
enum CrudAction {
    /// List every record.
    List,

    /// Fetch one record by id.
    Get { id: String },

    /// Create a record from a JSON body.
    Create {
        /// JSON object, e.g. '{"label": "USDT", "network": "TRC20"}'.
        #[arg(long)]
        data: String,
    },

    /// Update a record from a JSON body (partial updates allowed).
    Update {
        id: String,

        #[arg(long)]
        data: String,
    },

    /// Delete a record by id.
    Delete { id: String },
}

#[derive(Subcommand)]
enum UserAction {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,

        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },

    /// Block a user (they keep their data but cannot transact).
    Block { id: String },

    /// Lift a user's block.
    Unblock { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paydash=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let token = cli
        .global
        .token
        .clone()
        .or_else(|| config::read_saved_token(ADMIN_TOKEN_FILE));

    let mut client = AdminClient::new(&cli.global.api_base, token)?;

    match cli.command {
        Command::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            config::save_token(ADMIN_TOKEN_FILE, &response.token)?;
            info!(role = %response.admin.role, "Token saved");
            println!("Logged in as {} (role: {})", email, response.admin.role);
        }

        Command::Users { action } => run_user_action(&client, action).await?,
        Command::Admins { action } => run_crud(&client, Resource::Admins, action).await?,
        Command::Crypto { action } => run_crud(&client, Resource::CryptoDetails, action).await?,
        Command::Status { action } => run_crud(&client, Resource::Status, action).await?,
    }

    Ok(())
}

async fn run_user_action(client: &AdminClient, action: UserAction) -> Result<()> {
    match action {
        UserAction::List => {
            let users = client.list_users().await?;
            for user in &users {
                println!(
                    "{}  #{:<12} {:<32} {}",
                    user.id,
                    user.account_id,
                    user.email,
                    if user.blocked { "BLOCKED" } else { "active" },
                );
            }
            println!("{} user(s)", users.len());
        }
        UserAction::Get { id } => {
            let record: Value = client.get(Resource::Users, &id).await?;
            print_record(&record)?;
        }
        UserAction::Create { data } => {
            let body = parse_body(&data)?;
            let record: Value = client.create(Resource::Users, &body).await?;
            print_record(&record)?;
        }
        UserAction::Update { id, data } => {
            let body = parse_body(&data)?;
            let record: Value = client.update(Resource::Users, &id, &body).await?;
            print_record(&record)?;
        }
        UserAction::Delete { id } => {
            client.delete(Resource::Users, &id).await?;
            println!("Deleted user {}", id);
        }
        UserAction::Block { id } => {
            let user = client.set_user_blocked(&id, true).await?;
            println!("Blocked {} ({})", user.email, user.id);
        }
        UserAction::Unblock { id } => {
            let user = client.set_user_blocked(&id, false).await?;
            println!("Unblocked {} ({})", user.email, user.id);
        }
    }

    Ok(())
}

async fn run_crud(client: &AdminClient, resource: Resource, action: CrudAction) -> Result<()> {
    match action {
        CrudAction::List => match resource {
            Resource::Admins => {
                let admins = client.list_admins().await?;
                for admin in &admins {
                    println!(
                        "{}  {:<24} {:<32} {}",
                        admin.id,
                        format!("{} {}", admin.name, admin.last_name),
                        admin.email,
                        admin.role,
                    );
                }
                println!("{} admin(s)", admins.len());
            }
            Resource::CryptoDetails => {
                let details = client.list_crypto_details().await?;
                for detail in &details {
                    println!(
                        "{}  {:<8} {:<10} {}",
                        detail.id, detail.label, detail.network, detail.address,
                    );
                }
                println!("{} record(s)", details.len());
            }
            Resource::Status => {
                let records = client.list_status_records().await?;
                for record in &records {
                    println!(
                        "{}  {:<12} {:<12} {}",
                        record.id, record.name, record.value, record.label,
                    );
                }
                println!("{} record(s)", records.len());
            }
            Resource::Users => {
                // Handled by run_user_action; kept for exhaustiveness.
                let records: Vec<Value> = client.list(resource).await?;
                println!("{} record(s)", records.len());
            }
        },
        CrudAction::Get { id } => {
            let record: Value = client.get(resource, &id).await?;
            print_record(&record)?;
        }
        CrudAction::Create { data } => {
            let body = parse_body(&data)?;
            let record: Value = client.create(resource, &body).await?;
            print_record(&record)?;
        }
        CrudAction::Update { id, data } => {
            let body = parse_body(&data)?;
            let record: Value = client.update(resource, &id, &body).await?;
            print_record(&record)?;
        }
        CrudAction::Delete { id } => {
            client.delete(resource, &id).await?;
            println!("Deleted {}/{}", resource.path(), id);
        }
    }

    Ok(())
}

fn parse_body(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("--data must be a valid JSON object")
}

fn print_record(record: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
