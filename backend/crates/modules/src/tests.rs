//! Unit tests for the modules crate
//!
//! Everything here runs without a live database: dispatch short-circuits
//! before any query for the cases under test, and onboarding runs against
//! an in-memory user repository. The per-module SQL paths are covered by
//! integration environments.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;
use ledger::{Ledger, LedgerConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;
use users::{User, UserRepository, UsersConfig, UsersResult};

use crate::application::dispatcher::Dispatcher;
use crate::application::onboarding::{OnboardingInput, OnboardingUseCase};
use crate::domain::contract::ModuleKind;
use crate::domain::envelope::RequestEnvelope;
use crate::registry::{ModuleDeps, ModuleRegistry};

/// A pool that never connects; tests must fail before the first query
fn lazy_pool() -> sqlx::PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/never_connected")
        .expect("lazy pool")
}

fn dispatcher() -> Dispatcher {
    let registry = Arc::new(ModuleRegistry::standard(ModuleDeps::default()));
    Dispatcher::new(
        lazy_pool(),
        registry,
        Arc::new(Ledger::new("test-node")),
        LedgerConfig::default(),
    )
}

mod registry {
    use super::*;

    #[test]
    fn standard_registry_holds_all_seven_modules() {
        let registry = ModuleRegistry::standard(ModuleDeps::default());
        assert_eq!(registry.len(), ModuleKind::ALL.len());
        for kind in ModuleKind::ALL {
            assert!(registry.get(kind).is_some(), "missing module {kind}");
        }
    }

    #[test]
    fn iteration_follows_registration_order() {
        let registry = ModuleRegistry::standard(ModuleDeps::default());
        let kinds: Vec<ModuleKind> = registry.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, ModuleKind::ALL.to_vec());
    }

    #[test]
    fn tags_round_trip() {
        for kind in ModuleKind::ALL {
            assert_eq!(ModuleKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ModuleKind::from_tag("no_such_module"), None);
        assert_eq!(ModuleKind::FALLBACK, ModuleKind::FardAi);
    }
}

mod envelope {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum TestRequest {
        DoThing { value: i64 },
        Plain,
    }

    #[test]
    fn parse_op_merges_the_operation_tag() {
        let envelope = RequestEnvelope::new(None, "do_thing", json!({"value": 7}));
        let parsed: TestRequest = envelope.parse_op().unwrap();
        assert_eq!(parsed, TestRequest::DoThing { value: 7 });
    }

    #[test]
    fn parse_op_accepts_null_data() {
        let envelope = RequestEnvelope::new(None, "plain", serde_json::Value::Null);
        let parsed: TestRequest = envelope.parse_op().unwrap();
        assert_eq!(parsed, TestRequest::Plain);
    }

    #[test]
    fn parse_op_rejects_unknown_operations_cooperatively() {
        let envelope = RequestEnvelope::new(None, "explode", json!({}));
        let err = envelope.parse_op::<TestRequest>().unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn parse_op_rejects_non_object_data() {
        let envelope = RequestEnvelope::new(None, "do_thing", json!([1, 2, 3]));
        let err = envelope.parse_op::<TestRequest>().unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn wire_shape_uses_the_type_tag() {
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "module": "career_umma",
            "type": "search_jobs",
            "data": {"query": "rust"},
        }))
        .unwrap();
        assert_eq!(envelope.module.as_deref(), Some("career_umma"));
        assert_eq!(envelope.op, "search_jobs");
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn unknown_module_tag_is_an_error_without_database_work() {
        let dispatcher = dispatcher();
        let envelope = RequestEnvelope::new(Some("unknown_tag"), "anything", json!({}));

        // The lazy pool cannot connect, so reaching the database would fail
        // loudly rather than produce this cooperative error.
        let outcome = dispatcher.process_request(None, envelope).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Module not found"));
        assert!(outcome.additional_recommendations.is_empty());
    }

    #[tokio::test]
    async fn unknown_module_seals_nothing() {
        let registry = Arc::new(ModuleRegistry::standard(ModuleDeps::default()));
        let ledger = Arc::new(Ledger::new("test-node"));
        let dispatcher = Dispatcher::new(
            lazy_pool(),
            registry,
            ledger.clone(),
            LedgerConfig {
                block_threshold: 1,
                ..LedgerConfig::default()
            },
        );
        ledger.submit_transaction("alice", "bob", 3).unwrap();

        let envelope = RequestEnvelope::new(Some("unknown_tag"), "anything", json!({}));
        dispatcher.process_request(None, envelope).await;

        // The failed dispatch never reaches the threshold-seal path
        assert_eq!(ledger.pending_len(), 1);
        assert_eq!(ledger.chain_snapshot().len(), 1);
    }
}

/// In-memory user repository for onboarding tests
#[derive(Clone, Default)]
struct InMemoryUsersRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl UserRepository for InMemoryUsersRepository {
    async fn create(&self, user: &User) -> UsersResult<()> {
        self.users.lock().await.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> UsersResult<Option<User>> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn find_by_public_id(&self, public_id: &str) -> UsersResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.public_id.as_str() == public_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> UsersResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_by_api_key(&self, api_key: &str) -> UsersResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.api_key == api_key)
            .cloned())
    }

    async fn find_by_wallet(&self, wallet_address: &str) -> UsersResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| {
                u.wallet_address
                    .as_ref()
                    .is_some_and(|w| w.as_str() == wallet_address)
            })
            .cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> UsersResult<(Vec<User>, i64)> {
        let users = self.users.lock().await;
        let total = users.len() as i64;
        let page = users
            .values()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn update(&self, user: &User) -> UsersResult<()> {
        self.users.lock().await.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> UsersResult<()> {
        self.users.lock().await.remove(user_id);
        Ok(())
    }
}

mod onboarding {
    use super::*;

    fn use_case() -> OnboardingUseCase<InMemoryUsersRepository> {
        OnboardingUseCase::new(
            Arc::new(InMemoryUsersRepository::default()),
            Arc::new(UsersConfig::default()),
            Arc::new(ModuleRegistry::standard(ModuleDeps::default())),
        )
    }

    fn input(email: &str) -> OnboardingInput {
        OnboardingInput {
            email: email.to_string(),
            password: "Str0ng-enough-pass".to_string(),
            language: Some("en".to_string()),
        }
    }

    #[tokio::test]
    async fn onboarding_initializes_every_module() {
        let outcome = use_case()
            .execute(input("fatima@example.com"))
            .await
            .expect("onboarding succeeds");

        assert_eq!(outcome.module_initializations.len(), ModuleKind::ALL.len());
        for kind in ModuleKind::ALL {
            assert!(outcome.module_initializations.contains_key(kind.tag()));
        }
        assert_eq!(outcome.next_steps.first(), Some(&"complete_profile"));
        assert!(!outcome.user.api_key.is_empty());
        assert_eq!(
            outcome.welcome_package.available_modules.len(),
            ModuleKind::ALL.len()
        );
        assert_eq!(outcome.welcome_package.initial_tasks.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_cooperative_failure() {
        let use_case = use_case();
        use_case
            .execute(input("omar@example.com"))
            .await
            .expect("first registration succeeds");

        let err = use_case
            .execute(input("omar@example.com"))
            .await
            .expect_err("second registration fails");
        assert!(err.is_domain());
    }
}
