use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::api::Api;
use crate::client::HttpGateway;
use crate::config::Config;
use crate::guard::{GuardPages, RouteGuard};
use crate::nav::Navigator;
use crate::notify::Notifier;
use crate::services::auth::AuthService;
use crate::services::cart::CartService;
use crate::services::category::CategoryService;
use crate::services::product::ProductService;
use crate::services::role::RoleService;
use crate::storage::{FileStorage, Storage};
use crate::token::TokenStore;

/// Everything a page needs, wired together once. This is the only place
/// that knows how the pieces connect; navigation and notification stay
/// behind the injected capabilities.
pub struct ShopClient {
    pub store: Arc<TokenStore>,
    pub gateway: Arc<HttpGateway>,
    pub guard: RouteGuard,
    pub auth: AuthService,
    pub cart: CartService,
    pub category: CategoryService,
    pub product: ProductService,
    pub role: RoleService,
}

pub struct ClientFactory {
    cfg: Config,
}

impl ClientFactory {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let cfg = Config::load(path)?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Builds a client persisting tokens to the configured file path.
    pub fn build(
        &self,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> ShopClient {
        let storage = Arc::new(FileStorage::new(&self.cfg.token_path));
        self.build_with_storage(storage, navigator, notifier)
    }

    pub fn build_with_storage(
        &self,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> ShopClient {
        let api = Api::new(&self.cfg.server);
        let delay = Duration::from_millis(self.cfg.redirect_delay_ms);

        let store = Arc::new(TokenStore::new(storage));
        let gateway = Arc::new(HttpGateway::new(
            store.clone(),
            navigator.clone(),
            notifier.clone(),
            self.cfg.pages.login.clone(),
            delay,
        ));

        let pages = GuardPages {
            login: self.cfg.pages.login.clone(),
            home: self.cfg.pages.home.clone(),
            admin_dashboard: self.cfg.pages.admin_dashboard.clone(),
        };
        let guard = RouteGuard::new(store.clone(), navigator, notifier, pages, delay);

        ShopClient {
            auth: AuthService::new(gateway.clone(), api.clone(), store.clone()),
            cart: CartService::new(gateway.clone(), api.clone()),
            category: CategoryService::new(gateway.clone(), api.clone()),
            product: ProductService::new(gateway.clone(), api.clone()),
            role: RoleService::new(gateway.clone(), api),
            store,
            gateway,
            guard,
        }
    }
}
