//! Grammars built on `lexkit`, and the consumers that turn their items into
//! output.
//!
//! - [`template`]: flat `{name}` templates rendered as `>>name<<`.
//! - [`brackets`]: nested braces, built into a [`brackets::tree::Tree`]
//!   before rendering.
//! - [`proto`]: a protocol-buffer schema tokenizer over bytes.
//!
//! Every state function here is generic over the buffer, so each grammar
//! runs unchanged on materialized and streamed input.

pub mod brackets;
pub mod proto;
pub mod template;
mod token;

pub use brackets::BracketError;
pub use proto::{ProtoKeywords, ProtoToken};
pub use template::TemplateError;
pub use token::TextToken;
