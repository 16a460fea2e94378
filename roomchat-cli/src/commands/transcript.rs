use anyhow::{Context, Result, bail};
use chrono::Local;
use futures_util::StreamExt;
use shared::collab::AuthProvider;
use shared::config::client::Config;
use shared::conversation::{self, Conversation};

use super::session::restored_auth;
use crate::http::HttpStore;
use crate::render::TranscriptPrinter;

/// Print the conversation as of the first snapshot and exit.
pub async fn print_transcript(config: &Config) -> Result<()> {
    let auth = restored_auth(config).await?;
    if auth.current_user().is_none() {
        bail!("no active session; run `roomchat session login` first");
    }

    let client = crate::http::build_client().context("failed to build HTTP client")?;
    let store = HttpStore::new(config, client, auth.token());
    let mut snapshots = conversation::subscribe(&store, &config.collection);

    let messages = snapshots
        .next()
        .await
        .context("live query ended before the first snapshot")?
        .context("failed to load the conversation")?;

    if messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }
    let mut conversation = Conversation::new();
    conversation.apply_snapshot(messages);
    for line in TranscriptPrinter::new().render_new(&conversation, &Local::now()) {
        println!("{line}");
    }
    Ok(())
}
