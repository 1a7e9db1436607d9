//! Users Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use platform::cache::{CacheStore, MemoryCache};

use crate::application::config::UsersConfig;
use crate::domain::repository::UserRepository;
use crate::domain::verifier::WalletVerifier;
use crate::infra::postgres::PgUsersRepository;
use crate::infra::wallet_stub::StubWalletVerifier;
use crate::presentation::handlers::{self, UsersAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_api_key};

/// Create the users router with the PostgreSQL repository and stub verifier
pub fn users_router(repo: PgUsersRepository, cache: MemoryCache, config: UsersConfig) -> Router {
    users_router_generic(repo, cache, StubWalletVerifier, config)
}

/// Create a generic users router for any repository/cache/verifier set
pub fn users_router_generic<R, C, V>(repo: R, cache: C, verifier: V, config: UsersConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let state = UsersAppState {
        repo: repo.clone(),
        cache,
        verifier: Arc::new(verifier),
        config: Arc::new(config),
    };
    let auth_state = AuthMiddlewareState { repo };

    let public = Router::new()
        .route("/", post(handlers::create_user::<R, C, V>))
        .route("/login", post(handlers::login::<R, C, V>));

    let protected = Router::new()
        .route("/", get(handlers::list_users::<R, C, V>))
        .route("/me", get(handlers::me))
        .route(
            "/me/link-wallet-message",
            get(handlers::link_wallet_message::<R, C, V>),
        )
        .route("/me/link-wallet", post(handlers::link_wallet::<R, C, V>))
        .route("/{public_id}", get(handlers::get_user::<R, C, V>))
        .route("/{public_id}", put(handlers::update_user::<R, C, V>))
        .route("/{public_id}", delete(handlers::delete_user::<R, C, V>))
        .route("/{public_id}/block", post(handlers::block_user::<R, C, V>))
        .route(
            "/{public_id}/unblock",
            post(handlers::unblock_user::<R, C, V>),
        )
        .layer(middleware::from_fn_with_state(
            auth_state,
            require_api_key::<R>,
        ));

    public.merge(protected).with_state(state)
}
