//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port and the fallback-first rewrite
//! layer built on top of it.
//!
//! ## Available Adapters
//!
//! - `OpenRouterProvider` - OpenRouter chat completions with model fallback
//! - `MockAIProvider` - Configurable mock for testing
//! - `NarrativeWriter` - Guarded LLM rewriting of deterministic texts

mod mock_provider;
mod narrative_writer;
mod openrouter_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use narrative_writer::NarrativeWriter;
pub use openrouter_provider::{OpenRouterConfig, OpenRouterProvider};
