//! # world-core
//!
//! Core types and traits for the world bot: [`Bot`], [`Handler`], message and user types, reply
//! keyboards, and tracing initialization. Transport-agnostic; used by world-telegram, handler-chain
//! and the flows in world-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{Bot, ReplyKeyboard};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};
