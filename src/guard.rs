use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::nav::{navigate_later, Navigator};
use crate::notify::Notifier;
use crate::token::TokenStore;

/// Page targets the guard can send a user to.
#[derive(Debug, Clone)]
pub struct GuardPages {
    pub login: String,
    pub home: String,
    pub admin_dashboard: String,
}

/// Access checks consulted by page bootstrap code. Each predicate returns
/// whether setup may continue; on failure it emits a notice and schedules
/// a redirect after a short delay so the notice gets a chance to render.
pub struct RouteGuard {
    store: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    pages: GuardPages,
    redirect_delay: Duration,
}

impl RouteGuard {
    pub fn new(
        store: Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        pages: GuardPages,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
            pages,
            redirect_delay,
        }
    }

    pub fn require_auth(&self) -> bool {
        if !self.store.is_authenticated() {
            self.notifier.warn("Please sign in to continue");
            self.deferred_navigate(&self.pages.login);
            return false;
        }
        true
    }

    pub fn require_admin(&self) -> bool {
        if !self.require_auth() {
            return false;
        }

        if !self.store.is_admin() {
            self.notifier
                .error("You do not have permission to access this page");
            self.deferred_navigate(&self.pages.home);
            return false;
        }
        true
    }

    pub fn require_client(&self) -> bool {
        if !self.require_auth() {
            return false;
        }

        if !self.store.is_client() {
            self.notifier.warn("This page is for regular users only");
            self.deferred_navigate(&self.pages.admin_dashboard);
            return false;
        }
        true
    }

    /// Post-login dispatch. Unlike the predicates this navigates
    /// immediately, there is no notice to wait for.
    pub fn redirect_by_role(&self) {
        if !self.store.is_authenticated() {
            self.navigator.navigate(&self.pages.login);
            return;
        }

        if self.store.is_admin() {
            self.navigator.navigate(&self.pages.admin_dashboard);
        } else {
            self.navigator.navigate(&self.pages.home);
        }
    }

    /// Human-readable label for the current role.
    pub fn role_display_name(&self) -> String {
        match self.store.user_role() {
            Some(role) if role.eq_ignore_ascii_case("ADMIN") => String::from("Administrator"),
            Some(role)
                if role.eq_ignore_ascii_case("CLIENT") || role.eq_ignore_ascii_case("USER") =>
            {
                String::from("Customer")
            }
            Some(role) => role,
            None => String::from("Unknown"),
        }
    }

    fn deferred_navigate(&self, path: &str) {
        info!("Denied, will redirect to '{path}'");
        navigate_later(self.navigator.clone(), path, self.redirect_delay);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;

    use crate::storage::MemoryStorage;
    use crate::types::token::Credentials;

    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        paths: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }

    impl RecordingNavigator {
        fn paths(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.notices.lock().unwrap().push(format!("success:{message}"));
        }

        fn error(&self, message: &str) {
            self.notices.lock().unwrap().push(format!("error:{message}"));
        }

        fn info(&self, message: &str) {
            self.notices.lock().unwrap().push(format!("info:{message}"));
        }

        fn warn(&self, message: &str) {
            self.notices.lock().unwrap().push(format!("warn:{message}"));
        }
    }

    struct Setup {
        store: Arc<TokenStore>,
        navigator: Arc<RecordingNavigator>,
        notifier: Arc<RecordingNotifier>,
        guard: RouteGuard,
    }

    fn setup() -> Setup {
        let store = Arc::new(TokenStore::new(Arc::new(MemoryStorage::new())));
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let pages = GuardPages {
            login: String::from("/login"),
            home: String::from("/"),
            admin_dashboard: String::from("/admin"),
        };
        let guard = RouteGuard::new(
            store.clone(),
            navigator.clone(),
            notifier.clone(),
            pages,
            Duration::from_millis(10),
        );
        Setup {
            store,
            navigator,
            notifier,
            guard,
        }
    }

    fn login_as(store: &TokenStore, role: &str) {
        let payload = URL_SAFE_NO_PAD.encode(json!({"roleName": role}).to_string());
        let token = format!("h.{payload}.s");
        store.set_credentials(&Credentials::new(Some(token), None));
    }

    async fn wait_for_redirect() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    #[tokio::test]
    async fn test_require_auth() {
        let s = setup();
        assert!(!s.guard.require_auth());
        assert_eq!(s.navigator.paths(), Vec::<String>::new());

        wait_for_redirect().await;
        assert_eq!(s.navigator.paths(), vec!["/login"]);
        assert_eq!(
            s.notifier.notices.lock().unwrap().as_slice(),
            ["warn:Please sign in to continue"]
        );

        login_as(&s.store, "CLIENT");
        assert!(s.guard.require_auth());
    }

    #[test]
    fn test_require_auth_without_runtime() {
        // No async runtime to schedule the delay on; the redirect must
        // happen immediately instead of panicking.
        let s = setup();
        assert!(!s.guard.require_auth());
        assert_eq!(s.navigator.paths(), vec!["/login"]);
        assert_eq!(
            s.notifier.notices.lock().unwrap().as_slice(),
            ["warn:Please sign in to continue"]
        );
    }

    #[tokio::test]
    async fn test_require_admin() {
        let s = setup();
        login_as(&s.store, "CLIENT");
        assert!(!s.guard.require_admin());

        wait_for_redirect().await;
        assert_eq!(s.navigator.paths(), vec!["/"]);

        login_as(&s.store, "ADMIN");
        assert!(s.guard.require_admin());
    }

    #[tokio::test]
    async fn test_require_client() {
        let s = setup();
        login_as(&s.store, "ADMIN");
        assert!(!s.guard.require_client());

        wait_for_redirect().await;
        assert_eq!(s.navigator.paths(), vec!["/admin"]);

        login_as(&s.store, "user");
        assert!(s.guard.require_client());
    }

    #[tokio::test]
    async fn test_redirect_by_role() {
        let s = setup();
        s.guard.redirect_by_role();
        assert_eq!(s.navigator.paths(), vec!["/login"]);

        login_as(&s.store, "ADMIN");
        s.guard.redirect_by_role();
        assert_eq!(s.navigator.paths(), vec!["/login", "/admin"]);

        login_as(&s.store, "CLIENT");
        s.guard.redirect_by_role();
        assert_eq!(s.navigator.paths(), vec!["/login", "/admin", "/"]);
    }

    #[tokio::test]
    async fn test_role_display_name() {
        let s = setup();
        assert_eq!(s.guard.role_display_name(), "Unknown");

        login_as(&s.store, "admin");
        assert_eq!(s.guard.role_display_name(), "Administrator");

        login_as(&s.store, "USER");
        assert_eq!(s.guard.role_display_name(), "Customer");

        login_as(&s.store, "AUDITOR");
        assert_eq!(s.guard.role_display_name(), "AUDITOR");
    }
}
