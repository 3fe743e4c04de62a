//! Router bridge.
//!
//! Keeps the session store and the URL path in agreement. Path shapes:
//!
//! - `/exts` — bare app root, redirected to the current session;
//! - `/exts/app/:id` and `/exts/app/:id/:params` — open or activate by id;
//! - `/exts/:filterType` — list filter pages, no session change.
//!
//! A navigation to an unknown app id records a one-shot not-found
//! condition and redirects to the default app; the bridge never mutates
//! the store outside of `handle_route`.

use serde::{Deserialize, Serialize};

use crate::store::OpenedAppStore;

/// Root path of the extension host.
pub const EXTS_ROOT: &str = "/exts";

/// Route that activates the app with the given session id.
pub fn app_route(id: &str) -> String {
    format!("{EXTS_ROOT}/app/{id}")
}

/// Route that activates an app and carries an open parameter.
pub fn app_route_with_params(id: &str, params: &str) -> String {
    format!("{EXTS_ROOT}/app/{id}/{params}")
}

/// Parsed form of a path under the extension root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Route {
    pub app_id: Option<String>,
    pub params: Option<String>,
    pub filter_type: Option<String>,
}

impl Route {
    /// Parses a path. Returns `None` for paths outside the extension root;
    /// those belong to other parts of the client.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let rest = trimmed.strip_prefix(EXTS_ROOT)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            // e.g. "/extsfoo"
            return None;
        }

        let mut segments = rest.split('/').filter(|segment| !segment.is_empty());
        match segments.next() {
            None => Some(Self::default()),
            Some("app") => {
                let Some(app_id) = segments.next() else {
                    // A dangling "/exts/app" gets the bare-root treatment.
                    return Some(Self::default());
                };
                let app_id = app_id.to_string();
                let params: Vec<&str> = segments.collect();
                Some(Self {
                    app_id: Some(app_id),
                    params: if params.is_empty() {
                        None
                    } else {
                        Some(params.join("/"))
                    },
                    filter_type: None,
                })
            }
            Some(filter_type) => Some(Self {
                app_id: None,
                params: None,
                filter_type: Some(filter_type.to_string()),
            }),
        }
    }
}

/// What the host should do in response to a routing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// The path already agrees with the store.
    Stay,
    /// Navigate to this path instead.
    Redirect(String),
}

/// Translates path changes into session store intents and reflects the
/// store back into the URL.
#[derive(Debug, Default)]
pub struct RouterBridge {
    app_not_found: Option<String>,
}

impl RouterBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responds to a route change.
    ///
    /// Opening an unknown id records the not-found condition (surfaced
    /// once via `take_app_not_found`) and redirects to the default app. A
    /// bare root path redirects to the current session, or the default app
    /// when nothing is open yet.
    pub fn handle_route(&mut self, store: &mut OpenedAppStore, path: &str) -> RouteAction {
        let Some(route) = Route::parse(path) else {
            return RouteAction::Stay;
        };

        if let Some(app_id) = route.app_id {
            let params = route.params.map(serde_json::Value::String);
            match store.open_by_id(&app_id, params) {
                // When the id was an alias or the name of a multi-instance
                // app, the session lives under a different id; reflect its
                // canonical route back into the URL so later route passes
                // activate it instead of opening again.
                Ok(_) => match store.current() {
                    Some(session) if session.id != app_id => {
                        RouteAction::Redirect(session.route_path.clone())
                    }
                    _ => RouteAction::Stay,
                },
                Err(err) if err.is_not_found() => {
                    tracing::warn!(app = %app_id, "navigation to unknown app");
                    self.app_not_found = Some(app_id);
                    RouteAction::Redirect(app_route(&Self::default_app_name(store)))
                }
                Err(err) => {
                    tracing::warn!(app = %app_id, error = %err, "open failed");
                    RouteAction::Stay
                }
            }
        } else if route.filter_type.is_none() {
            let target = match store.current() {
                Some(session) => session.route_path.clone(),
                None => app_route(&Self::default_app_name(store)),
            };
            RouteAction::Redirect(target)
        } else {
            RouteAction::Stay
        }
    }

    /// Takes the recorded not-found app id, clearing it. Each recorded
    /// condition is surfaced exactly once.
    pub fn take_app_not_found(&mut self) -> Option<String> {
        self.app_not_found.take()
    }

    fn default_app_name(store: &OpenedAppStore) -> String {
        store
            .registry()
            .default_app()
            .map(|app| app.descriptor.name.clone())
            .unwrap_or_else(|| "home".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AppRegistry;
    use huddle_types::AppDescriptor;
    use std::sync::Arc;

    fn store_with_apps() -> OpenedAppStore {
        let mut registry = AppRegistry::new();
        registry.register(AppDescriptor::new("home", "Home").built_in().fixed());
        registry.register(AppDescriptor::new("wiki", "Wiki").with_direct_url("https://wiki"));
        registry.register(AppDescriptor::new("files", "Files").built_in());
        registry.register(AppDescriptor::new("scratch", "Scratch").allow_multi_instance());
        registry.alias("start", "home");
        registry.set_default_app("home");
        OpenedAppStore::new(Arc::new(registry))
    }

    #[test]
    fn test_parse_shapes() {
        assert_eq!(Route::parse("/exts"), Some(Route::default()));
        assert_eq!(Route::parse("/exts/"), Some(Route::default()));
        assert_eq!(
            Route::parse("/exts/app/wiki"),
            Some(Route {
                app_id: Some("wiki".to_string()),
                params: None,
                filter_type: None,
            })
        );
        assert_eq!(
            Route::parse("/exts/app/wiki/page/42"),
            Some(Route {
                app_id: Some("wiki".to_string()),
                params: Some("page/42".to_string()),
                filter_type: None,
            })
        );
        assert_eq!(
            Route::parse("/exts/installed"),
            Some(Route {
                app_id: None,
                params: None,
                filter_type: Some("installed".to_string()),
            })
        );
        assert_eq!(Route::parse("/chats/recent"), None);
        assert_eq!(Route::parse("/extsfoo"), None);

        // "app" with no id behaves like the bare root.
        assert_eq!(Route::parse("/exts/app"), Some(Route::default()));
        assert_eq!(Route::parse("/exts/app/"), Some(Route::default()));
    }

    #[test]
    fn test_open_by_route() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();

        let action = bridge.handle_route(&mut store, "/exts/app/wiki");
        assert_eq!(action, RouteAction::Stay);
        assert!(store.is_current("wiki"));
        assert!(bridge.take_app_not_found().is_none());
    }

    #[test]
    fn test_route_params_reach_session() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();

        bridge.handle_route(&mut store, "/exts/app/wiki/page/42");
        assert_eq!(
            store.find("wiki").unwrap().params,
            Some(serde_json::Value::String("page/42".to_string()))
        );
    }

    #[test]
    fn test_unknown_app_redirects_to_default_and_keeps_sessions() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();
        store.open_by_id("home", None).unwrap();
        store.open_by_id("wiki", None).unwrap();
        store.open_by_id("files", None).unwrap();

        let action = bridge.handle_route(&mut store, "/exts/app/zzz");
        assert_eq!(action, RouteAction::Redirect("/exts/app/home".to_string()));
        assert_eq!(store.len(), 3);
        assert!(store.is_current("files"));

        // The not-found condition is surfaced exactly once.
        assert_eq!(bridge.take_app_not_found(), Some("zzz".to_string()));
        assert_eq!(bridge.take_app_not_found(), None);
    }

    #[test]
    fn test_bare_root_redirects_to_current() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();
        store.open_by_id("files", None).unwrap();

        let action = bridge.handle_route(&mut store, "/exts");
        assert_eq!(action, RouteAction::Redirect("/exts/app/files".to_string()));
    }

    #[test]
    fn test_bare_root_without_sessions_redirects_to_default() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();

        let action = bridge.handle_route(&mut store, "/exts");
        assert_eq!(action, RouteAction::Redirect("/exts/app/home".to_string()));
        // Redirect only; the bridge does not open the session itself.
        assert!(store.is_empty());
    }

    #[test]
    fn test_filter_route_changes_nothing() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();
        store.open_by_id("wiki", None).unwrap();

        let action = bridge.handle_route(&mut store, "/exts/installed");
        assert_eq!(action, RouteAction::Stay);
        assert!(store.is_current("wiki"));
    }

    #[test]
    fn test_dangling_app_segment_redirects_to_current() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();
        store.open_by_id("files", None).unwrap();

        let action = bridge.handle_route(&mut store, "/exts/app");
        assert_eq!(action, RouteAction::Redirect("/exts/app/files".to_string()));
        assert!(bridge.take_app_not_found().is_none());
    }

    #[test]
    fn test_alias_route_redirects_to_canonical() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();

        let action = bridge.handle_route(&mut store, "/exts/app/start");
        assert_eq!(action, RouteAction::Redirect("/exts/app/home".to_string()));
        assert!(store.is_current("home"));
        assert_eq!(
            bridge.handle_route(&mut store, "/exts/app/home"),
            RouteAction::Stay
        );
    }

    #[test]
    fn test_multi_instance_route_activates_backgrounded_session() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();
        bridge.handle_route(&mut store, "/exts/app/scratch");
        let scratch = store.current().unwrap().clone();
        store.open_by_id("wiki", None).unwrap();

        // The session's own route path (carrying the composed id) must
        // bring it back to the front, not fall through to a not-found
        // redirect.
        let action = bridge.handle_route(&mut store, &scratch.route_path);
        assert_eq!(action, RouteAction::Stay);
        assert!(store.is_current(&scratch.id));
        assert_eq!(store.len(), 2);
        assert!(bridge.take_app_not_found().is_none());
    }

    #[test]
    fn test_multi_instance_route_is_idempotent_across_renders() {
        let mut bridge = RouterBridge::new();
        let mut store = store_with_apps();

        let first = bridge.handle_route(&mut store, "/exts/app/scratch");
        let session_route = store.current().unwrap().route_path.clone();
        assert_eq!(first, RouteAction::Redirect(session_route.clone()));

        // Repeated passes over the same path re-activate instead of
        // opening duplicate sessions.
        bridge.handle_route(&mut store, "/exts/app/scratch");
        bridge.handle_route(&mut store, "/exts/app/scratch");
        assert_eq!(store.len(), 1);
        assert!(bridge.take_app_not_found().is_none());

        // Following the redirect settles the bridge.
        assert_eq!(
            bridge.handle_route(&mut store, &session_route),
            RouteAction::Stay
        );
    }
}
