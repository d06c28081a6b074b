//! CeyCan CLI - Database migrations and provisioning tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ceycan-cli migrate
//!
//! # Provision the first super admin (idempotent: no-op if one exists)
//! ceycan-cli bootstrap super-admin
//!
//! # Create an admin user directly
//! ceycan-cli admin create -e admin@example.com -n "Admin Name" -p <password> -r super_admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `bootstrap super-admin` - Create the first super admin if none exists
//! - `admin create` - Create admin users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ceycan-cli")]
#[command(author, version, about = "CeyCan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// One-time provisioning operations
    Bootstrap {
        #[command(subcommand)]
        target: BootstrapTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum BootstrapTarget {
    /// Create the first super admin, unless one already exists
    SuperAdmin {
        /// Super admin email address
        #[arg(short, long, default_value = "superadmin@ceycanagro.com")]
        email: String,

        /// Super admin display name
        #[arg(short, long, default_value = "Super Admin")]
        name: String,

        /// Initial password (change it after first login)
        #[arg(short, long, default_value = "superadmin123")]
        password: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Admin role (`super_admin` or `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Bootstrap { target } => match target {
            BootstrapTarget::SuperAdmin {
                email,
                name,
                password,
            } => {
                commands::bootstrap::super_admin(&email, &name, &password).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                role,
            } => {
                commands::admin::create_user(&email, &name, &password, &role).await?;
            }
        },
    }
    Ok(())
}
