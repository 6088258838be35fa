//! LLM Analyzer: the judgment layer for relationships the cheap parsers and
//! clusterer can't resolve on their own.

pub mod analyzer;
mod anthropic;
mod openai;

use async_trait::async_trait;

use crate::error::Result;

pub use analyzer::Analyzer;
pub use anthropic::AnthropicLlm;
pub use openai::OpenAiLlm;

/// A chat-completion client. Both providers speak the same minimal
/// contract: one prompt in, one text completion out.
#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &'static str;
    async fn complete(&self, prompt: &str) -> Result<String>;
}
