#![forbid(unsafe_code)]

//! Driver for the otopi Machine Dialog Protocol (MDP).
//!
//! The [`mdp`] module holds the protocol core: tokenizer, event classifier,
//! reply encoder and the [`MachineDialog`] driver. [`commands`], [`spawner`]
//! and [`session`] build installer automation on top of it; [`decode`]
//! renders a recorded dialog as NDJSON.

pub mod commands;
pub mod config;
pub mod decode;
pub mod errors;
pub mod mdp;
pub mod session;
pub mod spawner;

pub use config::DriverConfig;
pub use errors::{AppError, Result};
pub use mdp::{Event, EventKind, MachineDialog, ReplyRequest, ReplyValue};
