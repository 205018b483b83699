//! Authentication module: configuration, credential storage, token minting,
//! Rocket request guards, and the `/admin` HTTP route handlers.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod guards;
pub mod jwt;
pub mod passwords;
pub mod responses;
pub mod routes;
pub mod store;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use guards::{AuthAdmin, RequireSuperAdmin};
pub use jwt::JwtService;
pub use passwords::PasswordService;
pub use store::AdminStore;

#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub jwt_service: Arc<JwtService>,
    pub store: AdminStore,
}

impl AuthState {
    pub fn new(config: AuthConfig, jwt_service: JwtService, store: AdminStore) -> Self {
        Self {
            config,
            jwt_service: Arc::new(jwt_service),
            store,
        }
    }
}
