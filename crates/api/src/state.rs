//! Application state

use std::sync::Arc;

use substatus_billing::BillingService;

use crate::{
    auth::{AuthState, JwtManager},
    config::Config,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub jwt_manager: JwtManager,
    /// None when Stripe credentials are absent or billing is disabled
    pub billing: Option<Arc<BillingService>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // Try to initialize billing if Stripe env vars are set
        let billing = if config.enable_billing {
            match BillingService::from_env() {
                Ok(svc) => {
                    tracing::info!("Stripe billing service initialized");
                    Some(Arc::new(svc))
                }
                Err(e) => {
                    tracing::warn!("Stripe billing not configured: {}", e);
                    None
                }
            }
        } else {
            tracing::info!("Billing disabled via config (ENABLE_BILLING=false)");
            None
        };

        Self::with_billing(config, billing)
    }

    /// Build state around an already constructed billing service
    pub fn with_billing(config: Config, billing: Option<Arc<BillingService>>) -> Self {
        let jwt_manager = JwtManager::new(&config.jwt_secret, config.jwt_audience.as_deref());

        Self {
            config,
            jwt_manager,
            billing,
        }
    }

    /// Get auth state for middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt_manager: self.jwt_manager.clone(),
        }
    }
}
