use crate::error::{other_error, AppResult};
use scraper::{Html, Selector};
use tracing::{info, warn};

use super::summarizer::Summarizer;

/// Collapse article HTML to its paragraph text. Feeds ship the body as
/// `content:encoded` HTML full of `<p>`, `<img>` and `<br>` noise.
pub fn extract_main_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let Ok(paragraphs) = Selector::parse("p") else {
        return String::new();
    };

    fragment
        .select(&paragraphs)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Fetch a feed and produce a briefing of short AI summaries for its first
/// `limit` articles. Articles with no extractable body or a failed summary
/// are skipped, not fatal.
pub async fn fetch_and_summarize(
    http: &reqwest::Client,
    summarizer: &Summarizer,
    feed_url: &str,
    limit: usize,
) -> AppResult<String> {
    let bytes = http
        .get(feed_url)
        .send()
        .await
        .map_err(|e| other_error(&format!("Failed to fetch feed: {}", e)))?
        .bytes()
        .await
        .map_err(|e| other_error(&format!("Failed to read feed body: {}", e)))?;

    let feed = feed_rs::parser::parse(&bytes[..])
        .map_err(|e| other_error(&format!("Failed to parse feed: {}", e)))?;

    info!("Feed {} has {} entries", feed_url, feed.entries.len());

    let mut sections = Vec::new();

    for entry in feed.entries.into_iter().take(limit) {
        let title = entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "(untitled)".to_string());
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        // Prefer the full content body over the summary excerpt
        let html = entry
            .content
            .and_then(|c| c.body)
            .or_else(|| entry.summary.map(|s| s.content))
            .unwrap_or_default();

        let text = extract_main_text(&html);
        if text.is_empty() {
            warn!("No article body for '{}', skipping", title);
            continue;
        }

        match summarizer.summarize_article(&text).await {
            Ok(summary) => {
                sections.push(format!("📰 {}\n{}\n🔗 {}\n", title, summary, link));
            }
            Err(e) => {
                warn!("Failed to summarize '{}': {}", title, e);
            }
        }
    }

    Ok(sections.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_main_text() {
        let html = "<p>First paragraph.</p><img src=\"x.png\"><p>Second <b>bold</b> bit.</p>";
        assert_eq!(extract_main_text(html), "First paragraph.\nSecond bold bit.");
    }

    #[test]
    fn test_extract_main_text_no_paragraphs() {
        assert_eq!(extract_main_text("plain text, no markup"), "");
        assert_eq!(extract_main_text(""), "");
    }

    #[test]
    fn test_extract_main_text_trims_whitespace() {
        let html = "<p>  padded  </p>";
        assert_eq!(extract_main_text(html), "padded");
    }
}
