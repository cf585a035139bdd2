//! Scripted [`TextModel`] for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use stocknews_core::ArticleText;

use crate::error::EnrichError;
use crate::model::TextModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    Sentiment,
    Headline,
}

type Respond = dyn Fn(Task, &str) -> Result<String, EnrichError> + Send + Sync;

/// Answers each prompt by calling `respond(task, title)`, and records call
/// count and peak concurrency.
pub(crate) struct ScriptedModel {
    respond: Box<Respond>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedModel {
    pub(crate) fn new(
        respond: impl Fn(Task, &str) -> Result<String, EnrichError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl TextModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let task = if prompt.starts_with("Analyze the sentiment") {
            Task::Sentiment
        } else {
            Task::Headline
        };
        let result = (self.respond)(task, title_of(prompt));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn title_of(prompt: &str) -> &str {
    prompt
        .lines()
        .find_map(|line| {
            line.strip_prefix("Title: ")
                .or_else(|| line.strip_prefix("Original Title: "))
        })
        .unwrap_or_default()
}

pub(crate) fn items(titles: &[&str]) -> Vec<ArticleText> {
    titles
        .iter()
        .map(|title| ArticleText {
            title: (*title).to_string(),
            description: format!("About {title}"),
        })
        .collect()
}
