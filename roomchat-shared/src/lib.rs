#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]

pub mod chat;
pub mod collab;
pub mod config;
pub mod conversation;
pub mod models;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
