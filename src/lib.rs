//! immo-assist — French real-estate Telegram assistant.

pub mod channels;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod server;
