//! Wallet Link Use Case
//!
//! Two-step flow: the user fetches a one-time message, signs it with their
//! wallet, and submits the signature. The nonce lives in the cache with a
//! short TTL and is consumed on first use.

use std::sync::Arc;

use platform::cache::CacheStore;

use crate::application::config::UsersConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::domain::verifier::WalletVerifier;
use crate::error::{UsersError, UsersResult};

fn nonce_key(public_id: &str) -> String {
    format!("link_wallet_nonce:{}", public_id)
}

fn link_message(nonce: &str) -> String {
    format!(
        "I am linking this wallet to my MubarakAI account. Nonce: {}",
        nonce
    )
}

/// Wallet Link Use Case
pub struct WalletLinkUseCase<R, C, V>
where
    R: UserRepository,
    C: CacheStore,
    V: WalletVerifier,
{
    repo: Arc<R>,
    cache: C,
    verifier: Arc<V>,
    config: Arc<UsersConfig>,
}

impl<R, C, V> WalletLinkUseCase<R, C, V>
where
    R: UserRepository,
    C: CacheStore,
    V: WalletVerifier,
{
    pub fn new(repo: Arc<R>, cache: C, verifier: Arc<V>, config: Arc<UsersConfig>) -> Self {
        Self {
            repo,
            cache,
            verifier,
            config,
        }
    }

    /// Step 1: issue the message the wallet must sign
    pub async fn issue_message(&self, user: &User) -> String {
        let nonce = platform::crypto::sha256_hex(&platform::crypto::random_bytes(16));
        self.cache
            .set(
                &nonce_key(user.public_id.as_str()),
                nonce.clone(),
                self.config.nonce_ttl,
            )
            .await;
        link_message(&nonce)
    }

    /// Step 2: verify the signature and attach the wallet
    pub async fn link(
        &self,
        user: &User,
        wallet_address: &str,
        signature: &str,
    ) -> UsersResult<User> {
        let wallet = WalletAddress::new(wallet_address)?;

        // Reject wallets already claimed by somebody else
        if let Some(owner) = self.repo.find_by_wallet(wallet.as_str()).await? {
            if owner.user_id != user.user_id {
                return Err(UsersError::WalletTaken);
            }
        }

        // The nonce is single-use; taking it removes it
        let nonce = self
            .cache
            .take(&nonce_key(user.public_id.as_str()))
            .await
            .ok_or(UsersError::NonceExpired)?;

        let message = link_message(&nonce);
        if !self
            .verifier
            .verify(wallet.as_str(), &message, signature)
            .await
        {
            return Err(UsersError::InvalidSignature);
        }

        let mut updated = user.clone();
        updated.link_wallet(wallet);
        self.repo.update(&updated).await?;

        tracing::info!(public_id = %updated.public_id, "Wallet linked");
        Ok(updated)
    }
}
