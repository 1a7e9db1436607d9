//! Cross-Module Orchestrator
//!
//! Static synergy scores between module pairs, used only to produce
//! suggestion text on the dashboard.

use serde::Serialize;

use crate::domain::contract::ModuleKind;

/// Pairs scoring above this value are surfaced
const SYNERGY_THRESHOLD: f32 = 0.6;

/// At most this many synergies are shown
const MAX_SYNERGIES: usize = 3;

/// A surfaced module pairing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Synergy {
    pub modules: [ModuleKind; 2],
    pub description: &'static str,
    pub score: f32,
    pub suggestion: &'static str,
}

type SynergyEntry = (ModuleKind, ModuleKind, f32, &'static str, &'static str);

/// (first, second, score, description, suggestion)
const SYNERGY_MATRIX: &[SynergyEntry] = &[
    (
        ModuleKind::FardAi,
        ModuleKind::BaitulHikma,
        0.8,
        "Worship + Knowledge",
        "Deepen your worship with the scholarship behind it",
    ),
    (
        ModuleKind::BaitulHikma,
        ModuleKind::UmmahWaqf,
        0.75,
        "Audit + Investments",
        "Have waqf projects audited for sharia compliance before investing",
    ),
    (
        ModuleKind::ArRihla,
        ModuleKind::UmmahWaqf,
        0.7,
        "Travel + Endowments",
        "Support waqfs that host travellers of knowledge",
    ),
    (
        ModuleKind::SalamHealth,
        ModuleKind::NutritionHalal,
        0.7,
        "Health + Nutrition",
        "Pair your fitness goals with halal-checked nutrition",
    ),
    (
        ModuleKind::FardAi,
        ModuleKind::ArRihla,
        0.65,
        "Worship + Community",
        "Find companions for congregational prayer",
    ),
    (
        ModuleKind::CareerUmma,
        ModuleKind::ArRihla,
        0.55,
        "Career + Community",
        "Grow your network through knowledge sessions",
    ),
];

/// Cross-module orchestrator
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator;

impl Orchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Synergy score of a module pair; symmetric, defaults to 0.5
    pub fn score(&self, a: ModuleKind, b: ModuleKind) -> f32 {
        SYNERGY_MATRIX
            .iter()
            .find(|(x, y, ..)| (*x == a && *y == b) || (*x == b && *y == a))
            .map(|(_, _, score, ..)| *score)
            .unwrap_or(0.5)
    }

    /// Pairs above the threshold, strongest first, capped
    pub fn synergies(&self) -> Vec<Synergy> {
        let mut synergies: Vec<Synergy> = SYNERGY_MATRIX
            .iter()
            .filter(|(_, _, score, ..)| *score > SYNERGY_THRESHOLD)
            .map(|(a, b, score, description, suggestion)| Synergy {
                modules: [*a, *b],
                description,
                score: *score,
                suggestion,
            })
            .collect();
        synergies.sort_by(|a, b| b.score.total_cmp(&a.score));
        synergies.truncate(MAX_SYNERGIES);
        synergies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_symmetric() {
        let orchestrator = Orchestrator::new();
        assert_eq!(
            orchestrator.score(ModuleKind::FardAi, ModuleKind::BaitulHikma),
            orchestrator.score(ModuleKind::BaitulHikma, ModuleKind::FardAi),
        );
    }

    #[test]
    fn test_unknown_pair_defaults() {
        let orchestrator = Orchestrator::new();
        assert_eq!(
            orchestrator.score(ModuleKind::NutritionHalal, ModuleKind::CareerUmma),
            0.5
        );
    }

    #[test]
    fn test_synergies_filtered_sorted_capped() {
        let synergies = Orchestrator::new().synergies();
        assert_eq!(synergies.len(), MAX_SYNERGIES);
        assert!(synergies.iter().all(|s| s.score > SYNERGY_THRESHOLD));
        assert!(synergies.windows(2).all(|w| w[0].score >= w[1].score));
        // The below-threshold career pairing never surfaces
        assert!(
            !synergies
                .iter()
                .any(|s| s.modules.contains(&ModuleKind::CareerUmma))
        );
    }
}
