//! Navigation dispatch.
//!
//! # Responsibilities
//! - Map a login action to a destination
//! - Guard the admin destination with [`AdminIdentity::authorize`]
//! - Hand rejections to the user-facing notifier
//! - Bootstrap the wallet on login; only the admin route depends on it

use serde::Serialize;

use crate::routing::auth::{AdminIdentity, AuthError};
use crate::session::{BootstrapError, Bootstrapper, Session};

/// Named destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// General dashboard, open to any visitor.
    Dashboard,
    /// Admin panel, admin address only.
    AdminDashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::AdminDashboard => "/admin-dash",
        }
    }
}

/// User-initiated login actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    /// "Login with wallet" button.
    User,
    /// "Login as admin" button.
    Admin,
}

/// Routing collaborator.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Blocking user-visible notice (the wallet flow's `alert`).
pub trait Notifier {
    fn reject(&self, message: &str);
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Navigated(Route),
    Rejected(AuthError),
}

/// Route a login action. The admin route requires the session's account to
/// match `admin`; otherwise the notifier is told and nothing navigates.
pub fn dispatch(
    action: LoginAction,
    session: &Session,
    admin: &AdminIdentity,
    navigator: &dyn Navigator,
    notifier: &dyn Notifier,
) -> Dispatch {
    let route = match action {
        LoginAction::User => Route::Dashboard,
        LoginAction::Admin => {
            if let Err(e) = admin.authorize(session) {
                tracing::warn!(
                    session_id = %session.id,
                    account = %session.display_address(),
                    "Admin navigation rejected"
                );
                notifier.reject(&e.to_string());
                return Dispatch::Rejected(e);
            }
            Route::AdminDashboard
        }
    };

    tracing::info!(session_id = %session.id, path = route.path(), "Navigating");
    navigator.navigate(route);
    Dispatch::Navigated(route)
}

/// Login button handler: bootstrap the wallet, then dispatch.
///
/// The general dashboard is reached whether or not the wallet connects; the
/// failure is only logged. The admin route needs a connected account, so a
/// failed bootstrap is returned and nothing navigates.
pub async fn login(
    action: LoginAction,
    bootstrapper: &Bootstrapper,
    admin: &AdminIdentity,
    navigator: &dyn Navigator,
    notifier: &dyn Notifier,
) -> Result<Dispatch, BootstrapError> {
    match (bootstrapper.bootstrap().await, action) {
        (Ok(_), _) => {}
        (Err(e), LoginAction::User) => {
            tracing::warn!(error = %e, "Opening dashboard without a wallet session");
        }
        (Err(e), LoginAction::Admin) => return Err(e),
    }

    Ok(dispatch(action, &bootstrapper.session(), admin, navigator, notifier))
}

/// Navigator that resolves routes against a base URL and reports them.
#[derive(Debug, Clone)]
pub struct UrlNavigator {
    base: url::Url,
}

impl UrlNavigator {
    pub fn new(base: url::Url) -> Self {
        Self { base }
    }

    /// Absolute URL for a route.
    pub fn url_for(&self, route: Route) -> url::Url {
        let mut url = self.base.clone();
        url.set_path(route.path());
        url
    }
}

impl Navigator for UrlNavigator {
    fn navigate(&self, route: Route) {
        println!("{}", self.url_for(route));
    }
}

/// Notifier writing to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn reject(&self, message: &str) {
        eprintln!("{message}");
    }
}
