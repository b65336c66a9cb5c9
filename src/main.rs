use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use inbox_intel::chat::DialogueExecutor;
use inbox_intel::collab::HttpCollaborators;
use inbox_intel::config::TriageConfig;
use inbox_intel::inbox::InboxStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = TriageConfig::from_env().context("failed to load configuration")?;

    eprintln!("📬 Inbox Intel v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base);

    let collaborators = Arc::new(
        HttpCollaborators::new(&config).context("failed to build dashboard API client")?,
    );

    let store = Arc::new(InboxStore::new(
        collaborators.clone() as Arc<dyn inbox_intel::collab::InboxFetcher>,
        collaborators.clone() as Arc<dyn inbox_intel::collab::InboxAnalyzer>,
    ));

    // Probe the mailbox once so the banner reflects reality.
    let status = store.check_connection().await;
    if status.connected {
        eprintln!(
            "   Mailbox: {} ({})",
            status.connected_account.as_deref().unwrap_or("unknown"),
            status.provider.as_deref().unwrap_or("unknown"),
        );
    } else {
        eprintln!(
            "   Mailbox: not connected{}",
            status
                .message
                .as_deref()
                .map(|m| format!(" — {m}"))
                .unwrap_or_default()
        );
    }
    eprintln!("   Try \"scan inbox\". /quit to exit.\n");

    let executor = DialogueExecutor::new(
        store,
        collaborators.clone() as Arc<dyn inbox_intel::collab::ReplyDrafter>,
        collaborators as Arc<dyn inbox_intel::collab::DraftSender>,
        config.user_context.clone(),
    );

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }
        if line == "/quit" {
            break;
        }

        match executor.handle_utterance(line).await {
            Some(response) => println!("\n{response}\n"),
            // Not an inbox intent — a full dashboard routes this to its
            // general chat handler; the REPL just points at what it knows.
            None => println!(
                "\nThat's not an inbox request I recognize. Try \"scan inbox\", \
                 \"show emails\", or \"draft reply to #1\".\n"
            ),
        }
        eprint!("> ");
    }

    Ok(())
}
