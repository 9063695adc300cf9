use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use banter_core::models::Draft;
use banter_core::{ApiClient, ClientConfig, Messenger, SyncConfig};

#[derive(Parser)]
#[command(name = "banter")]
#[command(about = "Polling chat client for the banter backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, default_value = banter_core::constants::DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token for authenticated endpoints
    #[arg(long)]
    token: Option<String>,

    /// Our user id (used to reconcile optimistic sends)
    #[arg(long, default_value = "me")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversations with their last-message previews
    Conversations,

    /// Follow a conversation, printing messages as they arrive
    Watch {
        /// Conversation id; defaults to the first one in the list
        conversation_id: Option<String>,
    },

    /// Send a message to a conversation
    Send {
        conversation_id: String,
        text: String,
    },

    /// Show the notification feed and unread count
    Notifications,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::new(&cli.base_url);
    if let Some(token) = &cli.token {
        config = config.with_token(token);
    }
    let gateway = Arc::new(ApiClient::new(config));
    let messenger = Messenger::new(gateway, cli.user.clone(), SyncConfig::default());

    match cli.command {
        Commands::Conversations => {
            messenger.directory.refresh().await?;
            let conversations = messenger.directory.conversations();
            let ids: Vec<String> = conversations.iter().map(|c| c.id.clone()).collect();
            messenger.previews.refresh_all(&ids).await?;

            for conversation in &conversations {
                let preview = messenger
                    .previews
                    .last_message(&conversation.id)
                    .map(|m| m.text)
                    .unwrap_or_else(|| "(no messages)".to_string());
                println!(
                    "{}  {} [{} members]  {}",
                    conversation.id, conversation.name, conversation.member_count, preview
                );
            }
        }

        Commands::Watch { conversation_id } => {
            messenger.start();
            if let Some(id) = conversation_id {
                messenger.select_conversation(id).await?;
            }

            let mut printed: HashSet<String> = HashSet::new();
            let mut header_for: Option<String> = None;
            let mut ticker = tokio::time::interval(Duration::from_millis(500));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snap = messenger.window.snapshot();
                        if let Some(id) = &snap.conversation_id {
                            if header_for.as_deref() != Some(id.as_str()) {
                                if let Some(conversation) = messenger.directory.get(id) {
                                    println!("== {} [{} members]", conversation.name, conversation.member_count);
                                    header_for = Some(id.clone());
                                }
                            }
                        }
                        for message in &snap.messages {
                            if printed.insert(message.id.clone()) {
                                println!("[{}] {}: {}", message.created_at, message.sender_name, message.text);
                            }
                        }
                        for pending in &snap.pending {
                            if printed.insert(pending.local_id.clone()) {
                                println!("[sending] {}", pending.text);
                            }
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            messenger.shutdown();
        }

        Commands::Send {
            conversation_id,
            text,
        } => {
            messenger.select_conversation(conversation_id).await?;
            if let Err(err) = messenger.send(Draft::text(text)).await {
                // The draft is handed back so nothing the user typed is lost.
                eprintln!("send failed: {} (draft kept: {:?})", err, err.draft.text);
                std::process::exit(1);
            }
        }

        Commands::Notifications => {
            messenger.notifications.poll_once().await?;
            for item in messenger.notifications.items() {
                let marker = if item.read { " " } else { "*" };
                println!("{} [{}] {}", marker, item.created_at, item.text);
            }
            println!("{} unread", messenger.notifications.unread_count());
        }
    }

    Ok(())
}
