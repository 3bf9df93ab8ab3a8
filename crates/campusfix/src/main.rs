// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CampusFix - order lifecycle manager for a campus phone repair service.
//!
//! This is the binary entry point. Customer-facing commands (`intake`,
//! `track`) work without a session; everything that mutates lifecycle
//! state or reads the whole dataset requires `campusfix admin login`.

mod admin;
mod backup;
mod tracker;
mod views;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use campusfix_config::{CampusfixConfig, ConfigError};
use campusfix_core::order::{CustomerIntake, OrderFilter};
use campusfix_core::traits::DocumentBackend;
use campusfix_core::types::{TransitionAction, UrgencyLevel};
use campusfix_core::CampusfixError;
use campusfix_notify::{compose, LifecycleEvent, OperatorProfile};
use campusfix_remote::RemoteStore;
use campusfix_store::{LocalStore, OrderStore};

/// CampusFix - order lifecycle manager for a campus phone repair service.
#[derive(Parser, Debug)]
#[command(name = "campusfix", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new repair order.
    Intake(IntakeArgs),
    /// Show the tracking view for an order.
    Track {
        /// Order code, e.g. CF-2026-2581. Case-insensitive.
        code: String,
        /// Keep polling and re-rendering until the order is ready.
        #[arg(long)]
        follow: bool,
    },
    /// List orders, newest first (admin).
    Orders {
        /// Filter by status substring, e.g. "diagnosis".
        #[arg(long)]
        status: Option<String>,
        /// Free-text match across code, customer, device, and repair type.
        #[arg(long)]
        search: Option<String>,
        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show full detail for one order (admin).
    Show { code: String },
    /// Advance an order through its lifecycle (admin).
    Advance {
        code: String,
        /// One of: completeDiagnosis, startRepair, completeRepair,
        /// markReadyForPickup.
        action: String,
    },
    /// Show dashboard counters (admin).
    Stats {
        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Push unsynced local changes to the remote store.
    Sync,
    /// Manage the admin session.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Export all order data as JSON (admin).
    Export {
        /// Destination file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import order data from a JSON export (admin).
    Import { input: PathBuf },
    /// Delete all order data and reset the code counter (admin).
    Reset {
        /// Confirm the wipe.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Start an admin session on this machine.
    Login,
    /// End the admin session.
    Logout,
    /// Show whether an admin session is active.
    Status,
}

/// Fields of the intake form.
#[derive(Args, Debug)]
struct IntakeArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    hostel: Option<String>,
    #[arg(long)]
    brand: String,
    #[arg(long)]
    model: String,
    /// Requested repair, e.g. "Screen Replacement".
    #[arg(long)]
    repair: String,
    /// Standard (72h), Express (24h), or Emergency (6h).
    #[arg(long, default_value = "Standard")]
    urgency: UrgencyLevel,
    /// Free-text issue description, at least 10 characters.
    #[arg(long)]
    issue: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            campusfix_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.service.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("{} {e}", "error:".red());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CampusfixConfig) -> Result<(), CampusfixError> {
    let data_dir = PathBuf::from(&config.storage.data_dir);
    let store = build_store(config)?;
    let profile = OperatorProfile::from_config(&config.service);

    match command {
        Commands::Intake(args) => {
            let intake = CustomerIntake {
                customer_name: args.name,
                customer_phone: args.phone,
                customer_email: args.email,
                customer_hostel: args.hostel,
                device_brand: args.brand,
                device_model: args.model,
                repair_type: args.repair,
                urgency_level: args.urgency,
                issue_description: args.issue,
            };
            let order = store.create_order(&intake).await?;
            let note = compose(&order, LifecycleEvent::Created, &profile);

            println!("Order {} created.\n", order.order_code.bold());
            println!("{}", views::render_tracker(&order));
            println!("Send to customer ({}):", note.customer_phone);
            println!("  {}", note.customer_text);
        }

        Commands::Track { code, follow } => {
            if follow {
                tracker::follow(
                    &store,
                    &code,
                    Duration::from_secs(config.tracker.poll_interval_secs),
                )
                .await?;
            } else {
                let order = store.get_order(&code).await?;
                println!("{}", views::render_tracker(&order));
            }
        }

        Commands::Orders { status, search, json } => {
            admin::require(&data_dir)?;
            let orders = store.list_orders(&OrderFilter { status, search }).await?;
            if json {
                println!("{}", to_json(&orders)?);
            } else {
                print!("{}", views::render_order_table(&orders));
            }
        }

        Commands::Show { code } => {
            admin::require(&data_dir)?;
            let order = store.get_order(&code).await?;
            print!("{}", views::render_detail(&order));
        }

        Commands::Advance { code, action } => {
            admin::require(&data_dir)?;
            let action: TransitionAction = action.parse().map_err(|_| {
                CampusfixError::Config(format!(
                    "unknown action `{action}`; expected one of completeDiagnosis, \
                     startRepair, completeRepair, markReadyForPickup"
                ))
            })?;
            let order = store.apply_transition(&code, action).await?;
            let note = compose(&order, LifecycleEvent::Transition(action), &profile);

            print!("{}", views::render_detail(&order));
            println!("\nSend to customer ({}):", note.customer_phone);
            println!("  {}", note.customer_text);
            println!("Log: {}", note.operator_text);
        }

        Commands::Stats { json } => {
            admin::require(&data_dir)?;
            let stats = store.stats().await?;
            if json {
                println!("{}", to_json(&stats)?);
            } else {
                print!("{}", views::render_stats(&stats));
            }
        }

        Commands::Sync => {
            if store.sync_pending().await? {
                println!("Queued changes pushed to the remote store.");
            } else {
                println!("Nothing to sync.");
            }
        }

        Commands::Admin { command } => match command {
            AdminCommand::Login => {
                admin::login(&data_dir)?;
                println!("Admin session started.");
            }
            AdminCommand::Logout => {
                if admin::logout(&data_dir)? {
                    println!("Admin session ended.");
                } else {
                    println!("No admin session was active.");
                }
            }
            AdminCommand::Status => {
                if admin::is_authenticated(&data_dir) {
                    println!("Admin session active.");
                } else {
                    println!("No admin session.");
                }
            }
        },

        Commands::Export { output } => {
            admin::require(&data_dir)?;
            backup::run_export(&store, output.as_deref()).await?;
        }

        Commands::Import { input } => {
            admin::require(&data_dir)?;
            backup::run_import(&store, &input).await?;
        }

        Commands::Reset { yes } => {
            admin::require(&data_dir)?;
            backup::run_reset(&store, yes).await?;
        }
    }

    Ok(())
}

fn build_store(config: &CampusfixConfig) -> Result<OrderStore, CampusfixError> {
    let remote = RemoteStore::from_config(&config.remote)?
        .map(|store| Arc::new(store) as Arc<dyn DocumentBackend>);
    Ok(OrderStore::new(
        LocalStore::new(&config.storage.data_dir),
        remote,
        config.storage.max_update_entries,
        config.storage.optimistic_lock,
    ))
}

fn load_config(path: Option<&Path>) -> Result<CampusfixConfig, Vec<ConfigError>> {
    match path {
        None => campusfix_config::load_and_validate(),
        Some(path) => match campusfix_config::load_config_from_path(path) {
            Ok(config) => {
                campusfix_config::validation::validate_config(&config)?;
                Ok(config)
            }
            Err(err) => {
                let sources = std::fs::read_to_string(path)
                    .map(|content| vec![(path.display().to_string(), content)])
                    .unwrap_or_default();
                Err(campusfix_config::diagnostic::figment_to_config_errors(
                    err, &sources,
                ))
            }
        },
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CampusfixError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CampusfixError::Internal(format!("failed to serialize output: {e}")))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("campusfix={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
