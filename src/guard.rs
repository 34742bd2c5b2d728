//! Routes and the session gate in front of them.

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    Login,
    #[default]
    Dashboard,
    Energy,
    Security,
    Material,
    Users,
    NotFound,
}

impl Route {
    /// Pages reachable from the sidebar, in display order.
    pub const SIDEBAR: &[Route] = &[
        Route::Dashboard,
        Route::Energy,
        Route::Security,
        Route::Material,
        Route::Users,
    ];

    pub fn from_path(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "" | "/dashboard" => Route::Dashboard,
            "/login" => Route::Login,
            "/energy" => Route::Energy,
            "/security" => Route::Security,
            "/material" => Route::Material,
            "/users" => Route::Users,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Energy => "/energy",
            Route::Security => "/security",
            Route::Material => "/material",
            Route::Users => "/users",
            Route::NotFound => "/404",
        }
    }

    /// Translation key of the page title.
    pub fn title_key(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Energy => "energy",
            Route::Security => "security",
            Route::Material => "material",
            Route::Users => "users",
            Route::NotFound => "not_found",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::NotFound)
    }
}

/// Outcome of gating a route on the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Session still resolving: show a neutral placeholder.
    Placeholder,
    Render(Route),
    Redirect(Route),
}

/// Role is never consulted; any authenticated operator sees every page.
pub fn guard(route: Route, session: SessionState) -> Gate {
    if session.loading {
        return Gate::Placeholder;
    }
    match (route, session.is_authenticated) {
        (Route::Login, true) => Gate::Redirect(Route::Dashboard),
        (r, false) if r.is_protected() => Gate::Redirect(Route::Login),
        (r, _) => Gate::Render(r),
    }
}

/// Follow redirects to the page that should actually be displayed.
pub fn resolve(route: Route, session: SessionState) -> Option<Route> {
    match guard(route, session) {
        Gate::Placeholder => None,
        Gate::Render(r) => Some(r),
        Gate::Redirect(target) => match guard(target, session) {
            Gate::Render(r) => Some(r),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADING: SessionState = SessionState { is_authenticated: false, loading: true };
    const SIGNED_IN: SessionState = SessionState { is_authenticated: true, loading: false };
    const SIGNED_OUT: SessionState = SessionState { is_authenticated: false, loading: false };

    #[test]
    fn test_loading_never_shows_protected_content() {
        for route in Route::SIDEBAR {
            assert_eq!(guard(*route, LOADING), Gate::Placeholder);
        }
        assert_eq!(resolve(Route::Users, LOADING), None);
    }

    #[test]
    fn test_authenticated_renders_page() {
        assert_eq!(guard(Route::Energy, SIGNED_IN), Gate::Render(Route::Energy));
        assert_eq!(guard(Route::Login, SIGNED_IN), Gate::Redirect(Route::Dashboard));
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        assert_eq!(guard(Route::Material, SIGNED_OUT), Gate::Redirect(Route::Login));
        assert_eq!(resolve(Route::Material, SIGNED_OUT), Some(Route::Login));
        assert_eq!(guard(Route::Login, SIGNED_OUT), Gate::Render(Route::Login));
    }

    #[test]
    fn test_not_found_is_public() {
        assert_eq!(resolve(Route::NotFound, SIGNED_OUT), Some(Route::NotFound));
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::from_path("/"), Route::Dashboard);
        assert_eq!(Route::from_path("/security/"), Route::Security);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        for route in Route::SIDEBAR {
            assert_eq!(Route::from_path(route.path()), *route);
        }
    }
}
