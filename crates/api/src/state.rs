//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use planpilot_billing::SubscriptionService;

use crate::auth::{AuthState, JwtManager};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt_manager: JwtManager,
    pub subscriptions: Arc<SubscriptionService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let jwt_manager = JwtManager::new(&config.jwt_secret, config.jwt_expiry_hours);
        let subscriptions = Arc::new(SubscriptionService::new(pool.clone()));

        Self {
            pool,
            jwt_manager,
            subscriptions,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt_manager: self.jwt_manager.clone(),
        }
    }
}
