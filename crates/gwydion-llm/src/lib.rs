//! Language-model boundary for Gwydion.
//!
//! The reasoning controller needs exactly one capability from a language
//! model: prompt in, free-form text out. This crate defines that boundary as
//! the [`LlmBackend`] trait so any provider (or a scripted mock) can stand
//! behind it.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  LlmBackend trait                       │
//! │  - complete(request) -> response text   │
//! └─────────────────────────────────────────┘
//!                    │
//!          ┌─────────┴─────────┐
//!          ▼                   ▼
//!   ┌─────────────┐    ┌──────────────┐
//!   │ provider    │    │ MockBackend  │
//!   │ adapters    │    │ (tests)      │
//!   └─────────────┘    └──────────────┘
//! ```
//!
//! Provider adapters live with the experiment harness, outside this core.

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{LlmBackend, MockBackend, SharedBackend};
pub use error::{LlmError, Result};
pub use types::{CompletionRequest, CompletionResponse};
