//! Recommendation Engine
//!
//! Deterministic follow-up suggestions keyed on the operation the user
//! just performed. Attached by the dispatcher to every successful
//! response.

use serde_json::Value;

use crate::domain::contract::ModuleKind;
use crate::domain::recommendation::{Priority, Recommendation, prioritize};

/// At most this many follow-ups ride along with a response
const MAX_FOLLOW_UPS: usize = 3;

/// Recommendation engine
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Follow-ups for the operation just performed
    ///
    /// Rules are static per operation tag; the reply payload only refines
    /// wording, never selection, so identical requests always produce
    /// identical suggestions.
    pub fn generate(&self, module: ModuleKind, op: &str, reply: &Value) -> Vec<Recommendation> {
        let mut recommendations = match op {
            "mark_prayer" => vec![
                Recommendation::new(
                    ModuleKind::BaitulHikma,
                    "Deepen your practice",
                    Priority::Medium,
                )
                .with_description("Study the scholarship behind the prayer you just completed"),
                Recommendation::new(ModuleKind::ArRihla, "Pray in company", Priority::Low)
                    .with_description("Find a knowledge session near your prayer times"),
            ],
            "get_learning_progress" => vec![
                Recommendation::new(ModuleKind::FardAi, "Keep your streak alive", Priority::High)
                    .with_description("Mark today's remaining prayers"),
            ],
            "audit_project" => vec![
                Recommendation::new(
                    ModuleKind::UmmahWaqf,
                    "Put the verdict to work",
                    Priority::Medium,
                )
                .with_description("Browse waqf projects that already passed screening"),
            ],
            "create_waqf" => vec![
                Recommendation::new(
                    ModuleKind::BaitulHikma,
                    "Certify your endowment",
                    Priority::High,
                )
                .with_description("Run a sharia audit so donors can give with confidence"),
            ],
            "donate" => vec![
                Recommendation::new(ModuleKind::UmmahWaqf, "Make it a habit", Priority::Medium)
                    .with_description("Recurring small gifts outweigh one large one"),
                Recommendation::new(ModuleKind::FardAi, "Seal the deed", Priority::Low)
                    .with_description("A dua after charity completes the act"),
            ],
            "create_knowledge_session" => vec![
                Recommendation::new(ModuleKind::CareerUmma, "Share your expertise", Priority::Low)
                    .with_description("Teachers are in demand on the community job board"),
            ],
            "set_fitness_goal" | "update_goal_progress" => vec![
                Recommendation::new(
                    ModuleKind::NutritionHalal,
                    "Fuel the goal properly",
                    Priority::Medium,
                )
                .with_description("Check your next product's ingredients before buying"),
            ],
            "check_product_photo" => vec![
                Recommendation::new(ModuleKind::SalamHealth, "Track what you eat", Priority::Low)
                    .with_description("Tie your nutrition checks to a fitness goal"),
            ],
            "post_job" | "search_jobs" => vec![
                Recommendation::new(ModuleKind::ArRihla, "Grow your network", Priority::Low)
                    .with_description("Knowledge sessions are where hiring happens"),
            ],
            "apply_for_job" => vec![
                Recommendation::new(ModuleKind::FardAi, "Ask for the best outcome", Priority::Low)
                    .with_description("Istikhara before a career decision"),
            ],
            _ => Vec::new(),
        };

        if let Some(points) = reply.get("baraka_points_added").and_then(Value::as_u64) {
            recommendations.push(
                Recommendation::new(module, format!("You earned {points} baraka"), Priority::Low)
                    .with_description("Points are sealed on the ledger with the next block"),
            );
        }

        let mut recommendations = prioritize(recommendations);
        recommendations.truncate(MAX_FOLLOW_UPS);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_is_deterministic() {
        let engine = RecommendationEngine::new();
        let first = engine.generate(ModuleKind::FardAi, "mark_prayer", &json!({}));
        let second = engine.generate(ModuleKind::FardAi, "mark_prayer", &json!({}));
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert!(!first.is_empty());
    }

    #[test]
    fn test_unknown_operation_yields_nothing() {
        let engine = RecommendationEngine::new();
        assert!(
            engine
                .generate(ModuleKind::FardAi, "no_such_op", &json!({}))
                .is_empty()
        );
    }

    #[test]
    fn test_baraka_award_adds_a_note() {
        let engine = RecommendationEngine::new();
        let recommendations = engine.generate(
            ModuleKind::FardAi,
            "mark_prayer",
            &json!({"baraka_points_added": 5}),
        );
        assert!(
            recommendations
                .iter()
                .any(|r| r.title.contains("5 baraka"))
        );
    }

    #[test]
    fn test_capped_and_ordered() {
        let engine = RecommendationEngine::new();
        let recommendations = engine.generate(
            ModuleKind::UmmahWaqf,
            "donate",
            &json!({"baraka_points_added": 2}),
        );
        assert!(recommendations.len() <= MAX_FOLLOW_UPS);
        let weights: Vec<u8> = recommendations
            .iter()
            .map(|r| r.priority.weight())
            .collect();
        let mut sorted = weights.clone();
        sorted.sort_by_key(|w| std::cmp::Reverse(*w));
        assert_eq!(weights, sorted);
    }
}
