//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use platform::cache::CacheStore;

use crate::application::config::UsersConfig;
use crate::application::{
    CreateUserInput, CreateUserUseCase, LoginInput, LoginUseCase, ModerationUseCase,
    UpdateUserInput, UpdateUserUseCase, WalletLinkUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::verifier::WalletVerifier;
use crate::error::{UsersError, UsersResult};
use crate::presentation::dto::{
    BlockUserRequest, CreateUserRequest, CreateUserResponse, ListUsersResponse, LoginRequest,
    LoginResponse, PageQuery, UpdateUserRequest, UserResponse, WalletLinkMessageResponse,
    WalletLinkRequest,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for user handlers
pub struct UsersAppState<R, C, V>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub cache: C,
    pub verifier: Arc<V>,
    pub config: Arc<UsersConfig>,
}

impl<R, C, V> Clone for UsersAppState<R, C, V>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            cache: self.cache.clone(),
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /
pub async fn create_user<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Json(req): Json<CreateUserRequest>,
) -> UsersResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = CreateUserUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case
        .execute(CreateUserInput {
            email: req.email,
            password: req.password,
            language: req.language,
        })
        .await?;

    let response = CreateUserResponse {
        user: UserResponse::from(&user),
        api_key: user.api_key.clone(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /login
pub async fn login<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Json(req): Json<LoginRequest>,
) -> UsersResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        public_id: output.public_id,
        api_key: output.api_key,
        role: output.role,
    }))
}

/// GET / (admin only)
pub async fn list_users<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
    Query(page): Query<PageQuery>,
) -> UsersResult<Json<ListUsersResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    if !current.0.role.is_admin() {
        return Err(UsersError::PermissionDenied);
    }

    let skip = page.skip.max(0);
    let limit = page.limit.clamp(1, 100);
    let (users, total) = state.repo.list(skip, limit).await?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
        total,
    }))
}

/// GET /me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(current.0.as_ref()))
}

/// GET /{public_id}
pub async fn get_user<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Path(public_id): Path<String>,
) -> UsersResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let user = state
        .repo
        .find_by_public_id(&public_id)
        .await?
        .ok_or(UsersError::UserNotFound)?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /{public_id}
pub async fn update_user<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
    Path(public_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> UsersResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = UpdateUserUseCase::new(state.repo.clone(), state.config.clone());
    let updated = use_case
        .execute(
            current.0.as_ref(),
            &public_id,
            UpdateUserInput {
                language: req.language,
                preferences: req.preferences,
                password: req.password,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(&updated)))
}

/// POST /{public_id}/block (admin only)
pub async fn block_user<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
    Path(public_id): Path<String>,
    Json(req): Json<BlockUserRequest>,
) -> UsersResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = ModerationUseCase::new(state.repo.clone());
    let blocked = use_case
        .block(current.0.as_ref(), &public_id, req.duration_secs)
        .await?;
    Ok(Json(UserResponse::from(&blocked)))
}

/// POST /{public_id}/unblock (admin only)
pub async fn unblock_user<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
    Path(public_id): Path<String>,
) -> UsersResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = ModerationUseCase::new(state.repo.clone());
    let unblocked = use_case.unblock(current.0.as_ref(), &public_id).await?;
    Ok(Json(UserResponse::from(&unblocked)))
}

/// DELETE /{public_id} (admin only)
pub async fn delete_user<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
    Path(public_id): Path<String>,
) -> UsersResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = ModerationUseCase::new(state.repo.clone());
    use_case.delete(current.0.as_ref(), &public_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /me/link-wallet-message
pub async fn link_wallet_message<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
) -> Json<WalletLinkMessageResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = WalletLinkUseCase::new(
        state.repo.clone(),
        state.cache.clone(),
        state.verifier.clone(),
        state.config.clone(),
    );
    let message = use_case.issue_message(current.0.as_ref()).await;
    Json(WalletLinkMessageResponse { message })
}

/// POST /me/link-wallet
pub async fn link_wallet<R, C, V>(
    State(state): State<UsersAppState<R, C, V>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<WalletLinkRequest>,
) -> UsersResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: CacheStore + Clone + Send + Sync + 'static,
    V: WalletVerifier + Send + Sync + 'static,
{
    let use_case = WalletLinkUseCase::new(
        state.repo.clone(),
        state.cache.clone(),
        state.verifier.clone(),
        state.config.clone(),
    );
    let updated = use_case
        .link(current.0.as_ref(), &req.wallet_address, &req.signature)
        .await?;
    Ok(Json(UserResponse::from(&updated)))
}
