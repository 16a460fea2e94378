use std::{env, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use directories::BaseDirs;
use shared::collab::AuthProvider;
use shared::config::client::Config;
use shared::models::Identity;
use shared::session;

use crate::http::TokenAuth;

/// Overrides where the session token is kept.
pub const SESSION_FILE_ENV: &str = "ROOMCHAT_SESSION_FILE";

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Sign in through the identity provider and save the session token
    Login(LoginArgs),
    /// Show the signed-in identity
    Me,
    /// Sign out and remove the saved session token
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Identity provider to sign in with (defaults to the configured provider)
    #[arg(long)]
    pub provider: Option<String>,
}

pub fn session_path() -> PathBuf {
    if let Ok(path) = env::var(SESSION_FILE_ENV)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    BaseDirs::new().map_or_else(
        || PathBuf::from("./session.token"),
        |dirs| dirs.config_dir().join("roomchat").join("session.token"),
    )
}

/// Auth client for the saved session, already verified with the auth service.
pub async fn restored_auth(config: &Config) -> Result<TokenAuth> {
    let auth = TokenAuth::new(config, session_path()).context("failed to load session")?;
    auth.restore()
        .await
        .context("failed to reach the auth service")?;
    Ok(auth)
}

pub async fn login(config: &Config) -> Result<()> {
    let auth = TokenAuth::new(config, session_path()).context("failed to load session")?;
    let identity = session::sign_in(&auth).await.context("sign-in failed")?;
    print_identity(&identity);
    println!("session token stored at {}", auth.token_path().display());
    Ok(())
}

pub async fn me(config: &Config) -> Result<()> {
    let auth = restored_auth(config).await?;
    let Some(identity) = auth.current_user() else {
        bail!("no active session; run `roomchat session login` first");
    };
    print_identity(&identity);
    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let auth = TokenAuth::new(config, session_path()).context("failed to load session")?;
    if !auth.has_token() {
        println!("No session token found at {}", auth.token_path().display());
        return Ok(());
    }
    session::sign_out(&auth).await.context("sign-out failed")?;
    println!("Removed session token at {}", auth.token_path().display());
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("Signed in as {}", identity.label());
    println!("uid: {}", identity.uid);
    if let Some(email) = &identity.email {
        println!("email: {email}");
    }
}
