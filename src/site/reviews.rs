//! Review cards and rating summary shown in the testimonials section.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Longest excerpt shown before a "more..." toggle.
pub const DEFAULT_EXCERPT_WORDS: usize = 25;
/// Cards taken from a provider response.
pub const DEFAULT_MAX_REVIEWS: usize = 3;

/// One review as returned by a reviews provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "author_name")]
    pub author: String,
    /// 0 to 5, fractional values allowed.
    pub rating: f32,
    #[serde(default)]
    pub text: String,
    /// Unix timestamp in seconds.
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub text: String,
    /// Full text when `text` was shortened.
    pub full: Option<String>,
}

impl Excerpt {
    pub fn is_truncated(&self) -> bool {
        self.full.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
    pub author: String,
    pub stars: String,
    pub age: String,
    pub excerpt: Excerpt,
    /// Whether the full text is currently expanded.
    pub expanded: bool,
}

impl ReviewCard {
    pub fn from_record(record: &ReviewRecord, now: DateTime<Utc>, max_words: usize) -> Self {
        Self {
            author: record.author.clone(),
            stars: star_string(record.rating),
            age: relative_age(record.time, now),
            excerpt: excerpt(&record.text, max_words),
            expanded: false,
        }
    }

    /// "more..." / "back" toggle. No-op for untruncated text.
    pub fn toggle_expanded(&mut self) {
        if self.excerpt.is_truncated() {
            self.expanded = !self.expanded;
        }
    }

    pub fn visible_text(&self) -> &str {
        match (&self.excerpt.full, self.expanded) {
            (Some(full), true) => full,
            _ => &self.excerpt.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSummary {
    pub score: Option<String>,
    pub text: Option<String>,
}

impl RatingSummary {
    pub fn new(rating: Option<f32>, total: Option<u32>) -> Self {
        Self {
            score: rating.filter(|r| *r > 0.0).map(|r| format!("{r:.1}")),
            text: total
                .filter(|t| *t > 0)
                .map(|t| format!("Based on {t} Google Reviews")),
        }
    }
}

/// Five-character star string: filled stars for the whole part, an outline
/// star for any fractional part, then outline padding.
pub fn star_string(rating: f32) -> String {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let has_half = rating.fract() != 0.0;
    let mut stars = "★".repeat(full);
    if has_half {
        stars.push('☆');
    }
    let used = full + usize::from(has_half);
    stars.push_str(&"☆".repeat(5usize.saturating_sub(used)));
    stars
}

pub fn relative_age(timestamp: i64, now: DateTime<Utc>) -> String {
    let days = (now.timestamp() - timestamp).div_euclid(86_400);
    let weeks = days / 7;
    let months = days / 30;
    if days < 7 {
        if days <= 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        }
    } else if weeks < 4 {
        if weeks == 1 {
            "1 week ago".to_string()
        } else {
            format!("{weeks} weeks ago")
        }
    } else if months == 1 {
        "1 month ago".to_string()
    } else {
        format!("{months} months ago")
    }
}

pub fn excerpt(text: &str, max_words: usize) -> Excerpt {
    let words: Vec<&str> = text.split(' ').collect();
    if words.len() <= max_words {
        return Excerpt {
            text: text.to_string(),
            full: None,
        };
    }
    Excerpt {
        text: words[..max_words].join(" "),
        full: Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(d: i64) -> i64 {
        now().timestamp() - d * 86_400
    }

    #[test]
    fn stars() {
        assert_eq!(star_string(5.0), "★★★★★");
        assert_eq!(star_string(4.0), "★★★★☆");
        assert_eq!(star_string(3.5), "★★★☆☆");
        assert_eq!(star_string(0.0), "☆☆☆☆☆");
    }

    #[test]
    fn ages() {
        assert_eq!(relative_age(days_ago(0), now()), "1 day ago");
        assert_eq!(relative_age(days_ago(1), now()), "1 day ago");
        assert_eq!(relative_age(days_ago(3), now()), "3 days ago");
        assert_eq!(relative_age(days_ago(7), now()), "1 week ago");
        assert_eq!(relative_age(days_ago(20), now()), "2 weeks ago");
        assert_eq!(relative_age(days_ago(28), now()), "0 months ago");
        assert_eq!(relative_age(days_ago(45), now()), "1 month ago");
        assert_eq!(relative_age(days_ago(400), now()), "13 months ago");
    }

    #[test]
    fn long_text_is_cut_at_word_limit() {
        let text = (1..=30).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let e = excerpt(&text, 25);
        assert!(e.is_truncated());
        assert!(e.text.ends_with(" 25"));
        assert_eq!(e.full.as_deref(), Some(text.as_str()));

        let short = excerpt("Passed first time!", 25);
        assert!(!short.is_truncated());
    }

    #[test]
    fn card_toggle_switches_visible_text() {
        let record = ReviewRecord {
            author: "Amira".into(),
            rating: 5.0,
            text: "word ".repeat(30).trim_end().to_string(),
            time: days_ago(2),
        };
        let mut card = ReviewCard::from_record(&record, now(), 25);
        assert_eq!(card.visible_text().split(' ').count(), 25);
        card.toggle_expanded();
        assert_eq!(card.visible_text().split(' ').count(), 30);
        card.toggle_expanded();
        assert!(!card.expanded);
    }

    #[test]
    fn summary_formats_score() {
        let s = RatingSummary::new(Some(4.94), Some(87));
        assert_eq!(s.score.as_deref(), Some("4.9"));
        assert_eq!(s.text.as_deref(), Some("Based on 87 Google Reviews"));
        assert_eq!(RatingSummary::new(None, None).score, None);
    }
}
