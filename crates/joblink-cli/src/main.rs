//! JobLink CLI — command-line client for the JobLink marketplace API.
//!
//! Set JOBLINK_API_URL (or API_URL) and JOBLINK_DATA_DIR. Mutations can
//! be queued offline with --offline and drained later with `sync`.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use joblink_cli::{format_pending_summary, init_tracing};
use joblink_core::models::{
    BidDraft, BookingDraft, Collection, MessageDraft, ServiceFilters,
};
use joblink_sync::Services;

#[derive(Parser)]
#[command(name = "joblink", about = "JobLink marketplace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        email: String,
        password: String,
    },
    /// Drop the local session
    Logout,
    /// Show the user profile
    Profile,
    /// List catalog services
    Services {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Free-text search
        #[arg(long)]
        query: Option<String>,
        /// Maximum number of items
        #[arg(long, default_value = "20")]
        limit: u32,
        /// Offset for pagination
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Place a bid on a service
    Bid {
        /// Service UUID
        service_id: Uuid,
        /// Offered amount
        amount: f64,
        /// Optional note to the provider
        #[arg(long)]
        message: Option<String>,
        /// Queue locally instead of sending now
        #[arg(long)]
        offline: bool,
    },
    /// Book a service
    Book {
        /// Service UUID
        service_id: Uuid,
        /// Scheduled time, RFC 3339 (e.g. 2026-09-01T10:00:00Z)
        scheduled_for: DateTime<Utc>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Queue locally instead of sending now
        #[arg(long)]
        offline: bool,
    },
    /// Send a message to another user
    Message {
        /// Recipient UUID
        recipient_id: Uuid,
        body: String,
        /// Queue locally instead of sending now
        #[arg(long)]
        offline: bool,
    },
    /// Show pending offline mutations
    Queue,
    /// Clear one pending collection (queued mutations are lost)
    ClearQueue {
        /// bids, bookings, or messages
        collection: String,
    },
    /// Upload pending mutations
    Upload,
    /// Run a full sync: upload pending, download profile and catalog
    Sync,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let services = Services::from_env().await?;

    match cli.command {
        Commands::Login { email, password } => {
            let envelope = services.client.login(&email, &password).await?;
            if envelope.success {
                println!("Logged in as {}", email);
            } else {
                anyhow::bail!("Login failed: {}", envelope.message);
            }
        }
        Commands::Logout => {
            services.client.logout().await?;
            println!("Logged out");
        }
        Commands::Profile => {
            let envelope = services.client.fetch_profile().await?;
            match envelope.data.value() {
                Some(profile) if envelope.success => {
                    println!("{}", serde_json::to_string_pretty(profile)?);
                }
                _ => anyhow::bail!("Failed to fetch profile: {}", envelope.message),
            }
        }
        Commands::Services {
            category,
            query,
            limit,
            offset,
        } => {
            let filters = ServiceFilters {
                category,
                query,
                limit: Some(limit),
                offset: Some(offset),
            };
            let snapshot = services.sync.download_services(&filters).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot.services)?);
        }
        Commands::Bid {
            service_id,
            amount,
            message,
            offline,
        } => {
            let draft = BidDraft {
                service_id,
                amount,
                message,
            };
            if offline {
                let id = services.queue.enqueue_bid(draft).await?;
                println!("Bid queued ({})", id);
            } else {
                let envelope = services.client.place_bid(&draft).await?;
                match envelope.data.value() {
                    Some(bid) if envelope.success => {
                        println!("{}", serde_json::to_string_pretty(bid)?)
                    }
                    _ => anyhow::bail!("Bid failed: {}", envelope.message),
                }
            }
        }
        Commands::Book {
            service_id,
            scheduled_for,
            address,
            notes,
            offline,
        } => {
            let draft = BookingDraft {
                service_id,
                scheduled_for,
                address,
                notes,
            };
            if offline {
                let id = services.queue.enqueue_booking(draft).await?;
                println!("Booking queued ({})", id);
            } else {
                let envelope = services.client.create_booking(&draft).await?;
                match envelope.data.value() {
                    Some(booking) if envelope.success => {
                        println!("{}", serde_json::to_string_pretty(booking)?)
                    }
                    _ => anyhow::bail!("Booking failed: {}", envelope.message),
                }
            }
        }
        Commands::Message {
            recipient_id,
            body,
            offline,
        } => {
            let draft = MessageDraft { recipient_id, body };
            if offline {
                let id = services.queue.enqueue_message(draft).await?;
                println!("Message queued ({})", id);
            } else {
                let envelope = services.client.send_message(&draft).await?;
                match envelope.data.value() {
                    Some(message) if envelope.success => {
                        println!("{}", serde_json::to_string_pretty(message)?)
                    }
                    _ => anyhow::bail!("Message failed: {}", envelope.message),
                }
            }
        }
        Commands::Queue => {
            let counts = services.queue.counts().await?;
            println!("{}", format_pending_summary(&counts));
        }
        Commands::ClearQueue { collection } => {
            let collection = parse_collection(&collection)?;
            services.queue.clear(collection).await?;
            println!("Cleared {}", collection);
        }
        Commands::Upload => {
            let outcome = services.sync.upload_pending().await?;
            println!(
                "Processed {}, {} error(s)",
                outcome.processed.processed_count(),
                outcome.processed.errors.len()
            );
            for error in &outcome.processed.errors {
                println!("  {}: {}", error.client_temp_id, error.error);
            }
        }
        Commands::Sync => {
            let report = services.sync.perform_full_sync().await;
            match &report.upload {
                Ok(outcome) => println!(
                    "Upload: {} processed, {} error(s)",
                    outcome.processed.processed_count(),
                    outcome.processed.errors.len()
                ),
                Err(e) => println!("Upload: failed ({})", e),
            }
            match &report.profile {
                Ok(profile) => println!("Profile: {}", profile.email),
                Err(e) => println!("Profile: failed ({})", e),
            }
            match &report.catalog {
                Ok(snapshot) => println!("Catalog: {} service(s)", snapshot.services.len()),
                Err(e) => println!("Catalog: failed ({})", e),
            }
            if !report.success() {
                anyhow::bail!("Sync finished with failures");
            }
        }
    }

    Ok(())
}

fn parse_collection(value: &str) -> anyhow::Result<Collection> {
    match value.to_lowercase().as_str() {
        "bids" => Ok(Collection::Bids),
        "bookings" => Ok(Collection::Bookings),
        "messages" => Ok(Collection::Messages),
        other => anyhow::bail!(
            "Unknown collection: {} (expected bids, bookings, or messages)",
            other
        ),
    }
}
