//! Article enrichment for the stock news aggregator.
//!
//! Every article gets two independent model calls: a one-word market
//! sentiment label and a short rewritten headline. Calls fan out per item,
//! a failed item falls back to `neutral` / no headline, and results stay
//! positionally aligned with the input page.

pub mod batch;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod parse;
pub mod prompts;

#[cfg(test)]
mod test_support;

pub use batch::{classify_sentiment_batch, summarize_headline_batch, FanOut, WorkerPool};
pub use error::EnrichError;
pub use model::{GeminiClient, TextModel};
pub use orchestrator::Enricher;
pub use parse::{clean_headline, parse_sentiment};
