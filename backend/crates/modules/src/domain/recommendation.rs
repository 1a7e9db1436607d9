//! Recommendation Types

use serde::{Deserialize, Serialize};

use crate::domain::contract::ModuleKind;

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A single suggestion shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub module: ModuleKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
}

impl Recommendation {
    pub fn new(module: ModuleKind, title: impl Into<String>, priority: Priority) -> Self {
        Self {
            module,
            title: title.into(),
            description: None,
            priority,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Maximum recommendations surfaced at once
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Order by priority (stable within a tier) and cap the list
pub fn prioritize(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by_key(|r| std::cmp::Reverse(r.priority.weight()));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prioritize_orders_and_caps() {
        let mut recommendations = Vec::new();
        for i in 0..12 {
            let priority = match i % 3 {
                0 => Priority::Low,
                1 => Priority::Medium,
                _ => Priority::High,
            };
            recommendations.push(Recommendation::new(
                ModuleKind::FardAi,
                format!("rec {}", i),
                priority,
            ));
        }

        let ordered = prioritize(recommendations);
        assert_eq!(ordered.len(), MAX_RECOMMENDATIONS);
        let weights: Vec<u8> = ordered.iter().map(|r| r.priority.weight()).collect();
        let mut sorted = weights.clone();
        sorted.sort_by_key(|w| std::cmp::Reverse(*w));
        assert_eq!(weights, sorted);
    }
}
