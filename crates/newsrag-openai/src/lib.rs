//! OpenAI-compatible chat completion and embedding client for newsrag
//!
//! This crate provides the hosted implementations of the ChatProvider and
//! Embedder traits.

mod client;
mod config;


pub use client::OpenAIClient;
pub use config::OpenAIConfig;

// Re-export core types for convenience
pub use newsrag_core::{ChatConfig, ChatMessage, ChatProvider, ChatResult, Embedder, Error, Result};
