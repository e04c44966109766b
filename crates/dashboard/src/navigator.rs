use tokio::sync::mpsc;

use sentiscope_core::routes::Route;

/// Receives navigation side effects from the controllers.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Forward routes to whoever drives the shell's router.
///
/// A closed channel means the shell has gone away; the route is dropped.
impl Navigator for mpsc::UnboundedSender<Route> {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigating");
        let _ = self.send(route);
    }
}
