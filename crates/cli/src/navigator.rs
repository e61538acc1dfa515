/// App destinations the flows can send the user to. One canonical home
/// route; the historical `/Home` vs `/home` drift is not carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Landing,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::Login => "/login",
            Route::Landing => "/",
        }
    }
}

/// Where the flows hand control back to the UI shell. `hard_reload` is the
/// explicit fallback transition: discard in-memory state and re-bootstrap
/// from storage at the given route, instead of a soft navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn notify(&self, message: &str);
    fn hard_reload(&self, route: Route);
}

/// CLI shell: navigation is a line of output, notices go to stderr-style
/// log as well as the terminal.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(route = route.path(), "navigate");
        println!("-> {}", route.path());
    }

    fn notify(&self, message: &str) {
        tracing::info!(%message, "notice");
        println!("{message}");
    }

    fn hard_reload(&self, route: Route) {
        tracing::warn!(route = route.path(), "hard reload");
        println!("-> {} (reloaded)", route.path());
    }
}
