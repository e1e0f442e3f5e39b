use std::io::{self, Write};

use clap::Subcommand;

use chanlog_access::{AllowListStore, IdKind};

#[derive(Subcommand)]
pub enum AccessAction {
    /// List allowed users and channels.
    List {
        /// List only allowed users.
        #[arg(long, conflicts_with = "channels_only")]
        users_only: bool,
        /// List only allowed channels.
        #[arg(long)]
        channels_only: bool,
    },
    /// Add a user ID to the allowed list.
    AddUser { user_id: String },
    /// Remove a user ID from the allowed list.
    RemoveUser { user_id: String },
    /// Add a channel ID to the allowed list.
    AddChannel { channel_id: String },
    /// Remove a channel ID from the allowed list.
    RemoveChannel { channel_id: String },
    /// Clear all allowed users.
    ClearUsers {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Clear all allowed channels.
    ClearChannels {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Operate on the same on-disk records the gateway reads. Safe against a
/// live server: writers take the record's advisory lock.
pub async fn handle_access(action: AccessAction) -> anyhow::Result<()> {
    let config = chanlog_config::discover_and_load();
    let store = AllowListStore::open(config.access_dir())?;

    match action {
        AccessAction::List {
            users_only,
            channels_only,
        } => {
            if users_only {
                print_list(&store, IdKind::User).await?;
            } else if channels_only {
                print_list(&store, IdKind::Channel).await?;
            } else {
                println!("🔧 Chanlog Access Control Status");
                println!("{}", "=".repeat(40));
                print_list(&store, IdKind::User).await?;
                println!();
                print_list(&store, IdKind::Channel).await?;
            }
        },
        AccessAction::AddUser { user_id } => add(&store, IdKind::User, &user_id).await?,
        AccessAction::RemoveUser { user_id } => remove(&store, IdKind::User, &user_id).await?,
        AccessAction::AddChannel { channel_id } => add(&store, IdKind::Channel, &channel_id).await?,
        AccessAction::RemoveChannel { channel_id } => {
            remove(&store, IdKind::Channel, &channel_id).await?;
        },
        AccessAction::ClearUsers { yes } => clear(&store, IdKind::User, yes).await?,
        AccessAction::ClearChannels { yes } => clear(&store, IdKind::Channel, yes).await?,
    }
    Ok(())
}

const fn noun(kind: IdKind) -> &'static str {
    match kind {
        IdKind::User => "User",
        IdKind::Channel => "Channel",
    }
}

const fn plural(kind: IdKind) -> &'static str {
    match kind {
        IdKind::User => "users",
        IdKind::Channel => "channels",
    }
}

async fn print_list(store: &AllowListStore, kind: IdKind) -> anyhow::Result<()> {
    let items = store.list(kind).await?;
    if items.is_empty() {
        println!("❌ No {} are currently allowed", plural(kind));
    } else {
        let heading = match kind {
            IdKind::User => "Users",
            IdKind::Channel => "Channels",
        };
        println!("✅ Allowed {heading}:");
        for item in &items {
            println!("  - {item}");
        }
        println!("Total: {} {}", items.len(), plural(kind));
    }
    Ok(())
}

async fn add(store: &AllowListStore, kind: IdKind, id: &str) -> anyhow::Result<()> {
    match store.add(kind, id).await {
        Ok(()) => {
            println!("✅ {} {id} added successfully", noun(kind));
            print_list(store, kind).await
        },
        Err(e) => {
            eprintln!("❌ Failed to add {} {id}: {e}", noun(kind).to_lowercase());
            std::process::exit(1);
        },
    }
}

async fn remove(store: &AllowListStore, kind: IdKind, id: &str) -> anyhow::Result<()> {
    match store.remove(kind, id).await {
        Ok(()) => {
            println!("✅ {} {id} removed successfully", noun(kind));
            print_list(store, kind).await
        },
        Err(e) => {
            eprintln!("❌ Failed to remove {} {id}: {e}", noun(kind).to_lowercase());
            std::process::exit(1);
        },
    }
}

async fn clear(store: &AllowListStore, kind: IdKind, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let prompt = format!(
            "Are you sure you want to clear all allowed {}? (y/N): ",
            plural(kind)
        );
        if !confirm(&prompt)? {
            println!("Operation cancelled");
            return Ok(());
        }
    }
    store.clear(kind).await?;
    println!("✅ All {} cleared successfully", plural(kind));
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
