use std::cell::RefCell;

use anyhow::{Context, Result, bail};
use chrono::Local;
use futures::channel::mpsc::unbounded;
use futures_util::StreamExt;
use shared::chat::{find_by_id, reply_banner};
use shared::collab::{Navigator, SnapshotStream, StoreError, StoreResult};
use shared::config::client::Config;
use shared::conversation::{self, Conversation, SendOutcome};
use shared::models::{Identity, Message};
use shared::session::{self, CHAT_ROUTE, SIGN_IN_ROUTE, SessionGate, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use super::session::session_path;
use crate::http::{HttpStore, TokenAuth, build_client};
use crate::render::TranscriptPrinter;

const HELP: &str = "Type a message and press Enter to send.\n  /reply <id>  reply to a message\n  /cancel      stop replying\n  /logout      sign out\n  /help        show this list\n  /quit        leave the room";

/// A line typed at the chat prompt. Anything that is not one of the commands,
/// including other `/` text, is a message.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Quit,
    Logout,
    Cancel,
    Help,
    Reply(&'a str),
    Text(&'a str),
}

pub fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some(("/reply", id)) => Input::Reply(id.trim()),
        _ => match trimmed {
            "/quit" | "/exit" => Input::Quit,
            "/logout" => Input::Logout,
            "/cancel" => Input::Cancel,
            "/reply" => Input::Reply(""),
            "/help" => Input::Help,
            _ => Input::Text(line),
        },
    }
}

/// Tracks the route the session gate wants the terminal on.
#[derive(Debug)]
pub struct TerminalNavigator {
    route: RefCell<String>,
}

impl TerminalNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            route: RefCell::new(path.to_string()),
        }
    }

    pub fn current(&self) -> String {
        self.route.borrow().clone()
    }
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        debug!(to = path, "route changed");
        *self.route.borrow_mut() = path.to_string();
    }
}

async fn next_snapshot(
    snapshots: &mut Option<SnapshotStream>,
) -> Option<StoreResult<Vec<Message>>> {
    match snapshots {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// Join the room: follow the session, print every snapshot's new messages,
/// and send what is typed.
pub async fn run_chat(config: &Config) -> Result<()> {
    let auth = TokenAuth::new(config, session_path()).context("failed to load session")?;
    let store = HttpStore::new(
        config,
        build_client().context("failed to build HTTP client")?,
        auth.token(),
    );
    let navigator = TerminalNavigator::at(CHAT_ROUTE);
    let (state_tx, mut state_rx) = unbounded::<SessionState>();

    let mut gate = SessionGate::new();
    let follow = gate.follow(&auth, &navigator, || navigator.current(), |state| {
        let _ = state_tx.unbounded_send(state.clone());
    });
    tokio::pin!(follow);

    auth.restore()
        .await
        .context("failed to reach the auth service")?;

    let mut conversation = Conversation::new();
    let mut printer = TranscriptPrinter::new();
    let mut viewer: Option<Identity> = None;
    let mut snapshots: Option<SnapshotStream> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            () = &mut follow => bail!("auth session stream ended"),

            Some(state) = state_rx.next() => {
                if let SessionState::SignedIn(identity) = state {
                    if viewer.is_none() {
                        println!("Signed in as {}.\n{HELP}", identity.label());
                    }
                    viewer = Some(identity);
                    if snapshots.is_none() {
                        snapshots = Some(conversation::subscribe(&store, &config.collection));
                    }
                } else {
                    viewer = None;
                    snapshots = None;
                }

                if navigator.current() == SIGN_IN_ROUTE {
                    println!("Signed out. Run `roomchat session login` to sign in.");
                    return Ok(());
                }
            }

            snapshot = next_snapshot(&mut snapshots) => match snapshot {
                Some(Ok(messages)) => {
                    conversation.apply_snapshot(messages);
                    for line in printer.render_new(&conversation, &Local::now()) {
                        println!("{line}");
                    }
                }
                Some(Err(StoreError::Closed)) | None => bail!("live query closed by the store"),
                Some(Err(err)) => {
                    error!(error = %err, "live query failed");
                    eprintln!("Live query error: {err}");
                }
            },

            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    return Ok(());
                };
                match parse_input(&line) {
                    Input::Quit => return Ok(()),
                    Input::Logout => {
                        if let Err(err) = session::sign_out(&auth).await {
                            eprintln!("Sign-out failed: {err}");
                        }
                    }
                    Input::Cancel => {
                        conversation.clear_reply_target();
                        println!("Reply cancelled.");
                    }
                    Input::Help => println!("{HELP}"),
                    Input::Reply(id) => match find_by_id(conversation.messages(), id).cloned() {
                        Some(target) => {
                            println!("{}", reply_banner(&target));
                            conversation.select_reply_target(target);
                        }
                        None => println!("No loaded message with id '{id}'."),
                    },
                    Input::Text(text) => {
                        conversation.set_text(text);
                        match conversation
                            .send_message(&store, &config.collection, viewer.as_ref())
                            .await
                        {
                            Ok(SendOutcome::Sent { id }) => debug!(id = %id, "sent"),
                            Ok(SendOutcome::Skipped) => {}
                            Err(err) => {
                                error!(error = %err, "send failed");
                                eprintln!("Send failed: {err}");
                            }
                        }
                    }
                }
            }
        }
    }
}
