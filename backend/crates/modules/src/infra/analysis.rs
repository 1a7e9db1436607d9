//! Text Analysis Stub
//!
//! Stand-in for an external NLP service: keyword-based topic scoring of
//! free text in an Islamic context. Deterministic so results are cacheable
//! by content hash.

use serde::{Deserialize, Serialize};

/// One scored topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicScore {
    pub topic: String,
    /// Share of keyword hits attributed to this topic, 0.0..=1.0
    pub score: f32,
}

/// Keyword table per topic; matching is case-insensitive on word stems
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "prayer",
        &["prayer", "salah", "namaz", "fajr", "dhuhr", "asr", "maghrib", "isha", "dua"],
    ),
    (
        "patience",
        &["patience", "sabr", "endure", "hardship", "trial"],
    ),
    (
        "gratitude",
        &["gratitude", "shukr", "thankful", "grateful", "blessing"],
    ),
    (
        "knowledge",
        &["knowledge", "ilm", "learn", "study", "teach", "quran", "hadith"],
    ),
    (
        "charity",
        &["charity", "sadaqah", "zakat", "waqf", "donate", "give"],
    ),
    (
        "family",
        &["family", "parents", "children", "marriage", "spouse"],
    ),
];

/// Keyword-based topic analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score topics by keyword hits; topics with no hits are omitted and
    /// scores sum to 1.0 when anything matched
    pub fn analyze(&self, text: &str) -> Vec<TopicScore> {
        let lowered = text.to_lowercase();

        let mut hits: Vec<(&str, usize)> = TOPIC_KEYWORDS
            .iter()
            .map(|(topic, keywords)| {
                let count = keywords
                    .iter()
                    .map(|keyword| lowered.matches(keyword).count())
                    .sum();
                (*topic, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let total: usize = hits.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return Vec::new();
        }

        // Highest-scoring topic first; ties stay in table order
        hits.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        hits.into_iter()
            .map(|(topic, count)| TopicScore {
                topic: topic.to_string(),
                score: count as f32 / total as f32,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_matched_topics_only() {
        let analyzer = TextAnalyzer::new();
        let scores = analyzer.analyze("I struggle to keep my Fajr prayer, need more sabr");

        let topics: Vec<&str> = scores.iter().map(|s| s.topic.as_str()).collect();
        assert!(topics.contains(&"prayer"));
        assert!(topics.contains(&"patience"));
        assert!(!topics.contains(&"charity"));

        let sum: f32 = scores.iter().map(|s| s.score).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        // prayer has two hits (fajr + prayer), patience one
        assert_eq!(scores[0].topic, "prayer");
    }

    #[test]
    fn test_empty_for_unrelated_text() {
        let analyzer = TextAnalyzer::new();
        assert!(analyzer.analyze("lorem ipsum dolor sit amet").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let analyzer = TextAnalyzer::new();
        let text = "Give sadaqah and teach knowledge";
        assert_eq!(analyzer.analyze(text), analyzer.analyze(text));
    }
}
