//! Anthropic Messages API adapter.
//!
//! [`AnthropicProvider`] implements
//! [`ContentProvider`](shopgen_core::llm::provider::ContentProvider) over
//! `POST /v1/messages`, sending image attachments as content blocks.

pub mod client;
pub mod types;

pub use client::AnthropicProvider;
