//! Prompt templates for the two enrichment tasks.

use stocknews_core::ArticleText;

#[must_use]
pub fn sentiment_prompt(item: &ArticleText) -> String {
    format!(
        "Analyze the sentiment of this news article for stock trading.

Title: {title}
Description: {description}

Respond with ONLY ONE WORD: bullish, bearish, or neutral.

- bullish: positive news that could increase stock value
- bearish: negative news that could decrease stock value
- neutral: news with no clear impact on stock value

Response:",
        title = item.title,
        description = item.description,
    )
}

#[must_use]
pub fn headline_prompt(item: &ArticleText) -> String {
    format!(
        "Rewrite a concise, factual headline for the following article.

Constraints:
- Max 8 words
- Prefer <= 60 characters
- No quotes, emojis, or punctuation at start/end
- Avoid clickbait; keep key company/ticker if helpful

Original Title: {title}
Description: {description}

Output ONLY the rewritten headline:",
        title = item.title,
        description = item.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ArticleText {
        ArticleText {
            title: "Acme beats earnings".to_string(),
            description: "Revenue up 20%".to_string(),
        }
    }

    #[test]
    fn sentiment_prompt_embeds_article_and_labels() {
        let prompt = sentiment_prompt(&item());
        assert!(prompt.contains("Title: Acme beats earnings"));
        assert!(prompt.contains("Description: Revenue up 20%"));
        for label in ["bullish", "bearish", "neutral"] {
            assert!(prompt.contains(&format!("- {label}:")), "missing {label}");
        }
    }

    #[test]
    fn headline_prompt_embeds_constraints() {
        let prompt = headline_prompt(&item());
        assert!(prompt.contains("Original Title: Acme beats earnings"));
        assert!(prompt.contains("Max 8 words"));
        assert!(prompt.ends_with("Output ONLY the rewritten headline:"));
    }
}
