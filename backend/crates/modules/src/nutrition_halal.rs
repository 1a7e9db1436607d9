//! Nutrition Halal - Product Screening
//!
//! Extracts ingredient text from a product photo through the OCR engine
//! and screens it against a table of problematic additives. Verdicts are
//! cached by content hash; the cache is an optimization only, a miss just
//! recomputes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use platform::cache::{CacheStore, MemoryCache};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::domain::contract::{
    DomainModule, ModuleKind, ModuleReply, PgTransaction, UserRef, require_actor,
};
use crate::domain::envelope::RequestEnvelope;
use crate::domain::recommendation::{Priority, Recommendation};
use crate::error::{ModuleError, ModuleResult};
use crate::infra::ocr::OcrEngine;

/// Cached verdict lifetime
const VERDICT_TTL: Duration = Duration::from_secs(3600);

/// Ingredients that make a product impermissible
const HARAM_INGREDIENTS: &[(&str, &str)] = &[
    ("e120", "Carmine (E120) is an insect-derived colourant"),
    ("carmine", "Carmine (E120) is an insect-derived colourant"),
    ("e441", "Gelatine (E441) is usually porcine"),
    ("gelatin", "Gelatine is usually porcine unless certified"),
    ("pork", "Pork derivative"),
    ("lard", "Pork fat"),
    ("alcohol", "Alcohol content"),
    ("ethanol", "Alcohol content"),
    ("wine", "Alcohol content"),
    ("rum", "Alcohol content"),
];

/// Ingredients whose source must be verified
const MUSHBOOH_INGREDIENTS: &[(&str, &str)] = &[
    ("e471", "Mono- and diglycerides (E471) may be animal-derived"),
    ("mono- and diglycerides", "Mono- and diglycerides may be animal-derived"),
    ("e472", "Esters of mono- and diglycerides may be animal-derived"),
    ("e542", "Bone phosphate (E542) source must be verified"),
    ("glycerol", "Glycerol may be animal-derived"),
    ("glycerin", "Glycerine may be animal-derived"),
    ("enzymes", "Enzyme source must be verified"),
    ("rennet", "Rennet may be animal-derived"),
    ("whey", "Whey may be produced with animal rennet"),
];

/// Screening verdict for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalalVerdict {
    Halal,
    Haram,
    /// Doubtful; at least one ingredient needs source verification
    Mushbooh,
}

/// One flagged ingredient with the reason it was flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedIngredient {
    pub ingredient: String,
    pub reason: String,
}

/// Full screening result; serializable for the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    pub verdict: HalalVerdict,
    pub flagged: Vec<FlaggedIngredient>,
    pub extracted_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum NutritionHalalRequest {
    CheckProductPhoto {
        /// Base64-encoded image content
        content: String,
        #[serde(default)]
        filename: Option<String>,
    },
}

/// Halal screening module
pub struct NutritionHalalModule {
    ocr: Arc<dyn OcrEngine>,
    cache: MemoryCache,
}

impl NutritionHalalModule {
    pub fn new(ocr: Arc<dyn OcrEngine>, cache: MemoryCache) -> Self {
        Self { ocr, cache }
    }
}

#[async_trait]
impl DomainModule for NutritionHalalModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::NutritionHalal
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "productsChecked": 0,
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        _tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let actor = require_actor(actor)?;
        match envelope.parse_op::<NutritionHalalRequest>()? {
            NutritionHalalRequest::CheckProductPhoto { content, filename } => {
                self.check_photo(actor, &content, filename.as_deref()).await
            }
        }
    }

    async fn daily_recommendations(
        &self,
        _user: &UserRef,
        _pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        Ok(vec![
            Recommendation::new(
                ModuleKind::NutritionHalal,
                "Check before you buy",
                Priority::Low,
            )
            .with_description("Photograph the ingredient list and get a verdict in seconds"),
        ])
    }
}

impl NutritionHalalModule {
    async fn check_photo(
        &self,
        actor: &UserRef,
        content: &str,
        filename: Option<&str>,
    ) -> ModuleResult<ModuleReply> {
        let image = platform::crypto::from_base64(content.trim())
            .map_err(|_| ModuleError::domain("Failed to process the image"))?;
        if image.is_empty() {
            return Err(ModuleError::domain("Failed to process the image"));
        }

        let cache_key = format!("halal:{}", platform::crypto::sha256_hex(&image));
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(result) = serde_json::from_str::<ScreeningResult>(&cached) {
                tracing::debug!(key = %cache_key, "Halal verdict served from cache");
                return Ok(reply_for(result, filename, true));
            }
        }

        let extracted_text = self.ocr.extract_text(&image).await?;
        let result = screen_ingredients(&extracted_text);

        if let Ok(serialized) = serde_json::to_string(&result) {
            self.cache.set(&cache_key, serialized, VERDICT_TTL).await;
        }

        tracing::info!(
            public_id = %actor.public_id,
            verdict = ?result.verdict,
            flagged = result.flagged.len(),
            "Product screened"
        );

        Ok(reply_for(result, filename, false))
    }
}

fn reply_for(result: ScreeningResult, filename: Option<&str>, cached: bool) -> ModuleReply {
    ModuleReply::data(json!({
        "verdict": result.verdict,
        "flagged": result.flagged,
        "extracted_text": result.extracted_text,
        "filename": filename,
        "cached": cached,
    }))
}

/// Screen extracted ingredient text
///
/// A haram hit dominates; otherwise any doubtful hit makes the product
/// mushbooh; a clean list is halal.
pub fn screen_ingredients(text: &str) -> ScreeningResult {
    let lowered = text.to_lowercase();

    let flag = |table: &[(&str, &str)]| -> Vec<FlaggedIngredient> {
        let mut flagged: Vec<FlaggedIngredient> = table
            .iter()
            .filter(|(marker, _)| lowered.contains(marker))
            .map(|(marker, reason)| FlaggedIngredient {
                ingredient: (*marker).to_string(),
                reason: (*reason).to_string(),
            })
            .collect();
        flagged.dedup_by(|a, b| a.reason == b.reason);
        flagged
    };

    let haram = flag(HARAM_INGREDIENTS);
    if !haram.is_empty() {
        return ScreeningResult {
            verdict: HalalVerdict::Haram,
            flagged: haram,
            extracted_text: text.to_string(),
        };
    }

    let doubtful = flag(MUSHBOOH_INGREDIENTS);
    if !doubtful.is_empty() {
        return ScreeningResult {
            verdict: HalalVerdict::Mushbooh,
            flagged: doubtful,
            extracted_text: text.to_string(),
        };
    }

    ScreeningResult {
        verdict: HalalVerdict::Halal,
        flagged: Vec::new(),
        extracted_text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_ingredients_are_halal() {
        let result = screen_ingredients("Ingredients: water, salt, chickpeas, olive oil");
        assert_eq!(result.verdict, HalalVerdict::Halal);
        assert!(result.flagged.is_empty());
    }

    #[test]
    fn test_carmine_is_haram() {
        let result = screen_ingredients(
            "Ingredients: water, sugar, carmine (E120), citric acid",
        );
        assert_eq!(result.verdict, HalalVerdict::Haram);
        // e120 and carmine flag once thanks to the shared reason
        assert_eq!(result.flagged.len(), 1);
    }

    #[test]
    fn test_e471_is_mushbooh() {
        let result = screen_ingredients(
            "Ingredients: wheat flour, mono- and diglycerides of fatty acids (E471)",
        );
        assert_eq!(result.verdict, HalalVerdict::Mushbooh);
        assert!(!result.flagged.is_empty());
    }

    #[test]
    fn test_haram_dominates_mushbooh() {
        let result = screen_ingredients("gelatin, whey, enzymes");
        assert_eq!(result.verdict, HalalVerdict::Haram);
    }

    #[test]
    fn test_screening_is_case_insensitive() {
        let result = screen_ingredients("CONTAINS PORK GELATINE");
        assert_eq!(result.verdict, HalalVerdict::Haram);
    }
}
