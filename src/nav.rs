use std::sync::Arc;
use std::time::Duration;

use log::info;

/// Capability to change the displayed page. The library only ever decides
/// *where* to go; the embedding shell performs the actual transition.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigates after `delay` when called inside a tokio runtime, so a
/// pending notice gets a chance to render first. Without a runtime there
/// is nothing to schedule on and the navigation happens at once.
pub(crate) fn navigate_later(navigator: Arc<dyn Navigator>, path: &str, delay: Duration) {
    let path = path.to_string();
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                navigator.navigate(&path);
            });
        }
        Err(_) => navigator.navigate(&path),
    }
}

/// Navigator that only records the intent in the log. Useful for headless
/// embedders and as a safe default.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!("Navigate to '{path}'");
    }
}
