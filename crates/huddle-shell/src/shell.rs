//! Host shell.
//!
//! Composes the session store, router bridge, view resolver and the
//! collaborator traits into a render model: a horizontal tab strip (one
//! tab per open session) above a content area that stacks one pane per
//! session, with exactly the current pane visible. Background panes stay
//! in the model so their rendering state survives tab switches.

use std::cell::Cell;
use std::sync::Arc;

use huddle_exts::{
    OpenedAppStore, ResolvedView, RouteAction, RouterBridge, SessionEventSink, SessionEventSource,
    ViewEvents, resolve_view, session_event_channel,
};

use crate::lang::Lang;
use crate::menu::{ContextMenuBuilder, MenuRequest};
use crate::nav::{NavViewport, ScrollDirection};
use crate::notify::{MessageOptions, Messager};
use crate::profile::ProfileGate;

/// Props the hosting application passes to the shell.
#[derive(Debug, Clone, Default)]
pub struct ShellProps {
    /// Render nothing while hidden.
    pub hidden: bool,
    /// Extra class appended to the shell container.
    pub class_name: Option<String>,
}

/// One tab of the strip.
#[derive(Debug, Clone, PartialEq)]
pub struct TabModel {
    pub session_id: String,
    /// Navigating here activates the session.
    pub route_path: String,
    /// Effective title: reported page title or the app display name.
    pub title: String,
    pub tooltip: String,
    pub icon: String,
    /// Accent applied only to the current tab's icon.
    pub accent_color: Option<String>,
    /// Spinner overlay while the session's view is loading.
    pub loading: bool,
    /// Close affordance; absent for fixed sessions.
    pub closable: bool,
    pub current: bool,
}

/// One content pane. Panes for background sessions are hidden via
/// presentation state, not unmounted.
#[derive(Debug, Clone)]
pub struct AppPane {
    pub session_id: String,
    pub back_color: String,
    pub hidden: bool,
    pub view: ResolvedView,
    /// Placeholder text shown when no rendering strategy applies.
    pub placeholder: Option<String>,
}

/// The tab strip.
#[derive(Debug, Clone)]
pub struct NavModel {
    /// Compact styling once the strip holds many tabs.
    pub compact: bool,
    /// Latched overflow state.
    pub scrolled: bool,
    /// Overflow arrows are shown only while scrolled.
    pub show_arrows: bool,
    pub tabs: Vec<TabModel>,
}

/// Complete render model of one shell pass.
#[derive(Debug, Clone)]
pub struct ShellModel {
    pub class_name: String,
    /// Navigation the host must perform instead of rendering this path.
    pub redirect: Option<String>,
    pub nav: NavModel,
    pub panes: Vec<AppPane>,
    /// Language switch generation; a change invalidates rendered text.
    pub lang_generation: u64,
}

/// Result of a click on a tab's close affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabClick {
    /// Derived UI changed (a new current tab was promoted).
    pub needs_refresh: bool,
    /// Always true: closing must not also activate the tab.
    pub stop_propagation: bool,
}

/// Measurements the rendering layer feeds back after layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavMeasurements {
    pub client_width: f32,
    pub content_width: f32,
    /// Left edge and width of the current session's tab, if laid out.
    pub current_tab: Option<(f32, f32)>,
}

/// Number of tabs beyond which the strip switches to compact styling.
const COMPACT_TAB_COUNT: usize = 7;

/// The extension host shell.
///
/// Owns the router bridge, the session event channel and the collaborator
/// handles; the session store is passed in by reference so multiple
/// independent shells can exist (and be tested) side by side.
pub struct HostShell {
    router: RouterBridge,
    event_source: SessionEventSource,
    event_sink: SessionEventSink,
    lang: Lang,
    messager: Arc<dyn Messager>,
    menu: Arc<dyn ContextMenuBuilder>,
    profile: Arc<dyn ProfileGate>,
    nav: NavViewport,
    nav_scrolled: bool,
    needs_refresh: bool,
}

impl HostShell {
    pub fn new(
        messager: Arc<dyn Messager>,
        menu: Arc<dyn ContextMenuBuilder>,
        profile: Arc<dyn ProfileGate>,
    ) -> Self {
        let (event_sink, event_source) = session_event_channel();
        Self {
            router: RouterBridge::new(),
            event_source,
            event_sink,
            lang: Lang::new(),
            messager,
            menu,
            profile,
            nav: NavViewport::default(),
            nav_scrolled: false,
            needs_refresh: false,
        }
    }

    /// Sink views report through; `bind` it to a session id when
    /// instantiating a resolved view.
    pub fn event_sink(&self) -> &SessionEventSink {
        &self.event_sink
    }

    /// Reporting handle for one session's view.
    pub fn view_events(&self, session_id: &str) -> ViewEvents {
        self.event_sink.bind(session_id)
    }

    pub fn lang(&self) -> &Lang {
        &self.lang
    }

    pub fn lang_mut(&mut self) -> &mut Lang {
        &mut self.lang
    }

    /// Current tab-strip scroll state.
    pub fn nav(&self) -> &NavViewport {
        &self.nav
    }

    /// Takes the pending forced-refresh flag, clearing it.
    pub fn take_needs_refresh(&mut self) -> bool {
        std::mem::take(&mut self.needs_refresh)
    }

    /// Computes the render model for one pass.
    ///
    /// Returns `None` while the hosting profile is not verified (checked
    /// every call, never cached) or while the `hidden` prop is set.
    /// Pending session events are drained into the store first, then the
    /// router bridge reconciles the given path with the store.
    pub fn render(
        &mut self,
        store: &mut OpenedAppStore,
        props: &ShellProps,
        path: &str,
    ) -> Option<ShellModel> {
        if !self.profile.is_user_verified() {
            tracing::debug!("profile not verified, suppressing render");
            return None;
        }
        if props.hidden {
            return None;
        }

        for event in self.event_source.drain() {
            store.apply_event(event);
        }

        let redirect = match self.router.handle_route(store, path) {
            RouteAction::Stay => None,
            RouteAction::Redirect(target) => Some(target),
        };

        let mut tabs = Vec::with_capacity(store.len());
        let mut panes = Vec::with_capacity(store.len());
        for session in store.list_open() {
            let Some(app) = store.registry().find(&session.app_name) else {
                tracing::warn!(app = %session.app_name, "opened session without registry entry");
                continue;
            };
            let current = store.is_current(&session.id);
            let title = session
                .effective_title(&app.descriptor.display_name)
                .to_string();
            let tooltip = if app.descriptor.description.is_empty() {
                title.clone()
            } else {
                format!("【{}】 - {}", title, app.descriptor.description)
            };
            tabs.push(TabModel {
                session_id: session.id.clone(),
                route_path: session.route_path.clone(),
                title,
                tooltip,
                icon: app.descriptor.app_icon.clone(),
                accent_color: current.then(|| app.descriptor.app_accent_color.clone()),
                loading: session.loading,
                closable: !app.descriptor.is_fixed,
                current,
            });

            let view = resolve_view(app);
            let placeholder = view
                .is_unresolved()
                .then(|| format!("{} ({})", self.lang.string("exts.appNoView"), session.id));
            panes.push(AppPane {
                session_id: session.id.clone(),
                back_color: app.descriptor.app_back_color.clone(),
                hidden: !current,
                view,
                placeholder,
            });
        }

        let mut classes = vec!["app-exts".to_string()];
        if let Some(session) = store.current() {
            classes.push(format!("app-exts-current-{}", session.app_name));
        }
        if let Some(class_name) = &props.class_name {
            classes.push(class_name.clone());
        }

        Some(ShellModel {
            class_name: classes.join(" "),
            redirect,
            nav: NavModel {
                compact: tabs.len() > COMPACT_TAB_COUNT,
                scrolled: self.nav_scrolled,
                show_arrows: self.nav_scrolled,
                tabs,
            },
            panes,
            lang_generation: self.lang.generation(),
        })
    }

    /// Post-layout bookkeeping, run after every render/update.
    ///
    /// Surfaces the one-shot app-not-found warning, latches the overflow
    /// state (forcing a refresh when it flips), and otherwise scrolls the
    /// current session's tab into view so it is never hidden behind the
    /// overflow.
    pub fn after_render(&mut self, store: &OpenedAppStore, measurements: NavMeasurements) {
        if let Some(app_id) = self.router.take_app_not_found() {
            let message = self.lang.format("exts.appNotFound.format", &[&app_id]);
            self.messager.show(&message, MessageOptions::warning_center());
        }

        self.nav.client_width = measurements.client_width;
        self.nav.content_width = measurements.content_width;
        let has_overflow = self.nav.has_overflow();
        if self.nav_scrolled != has_overflow {
            self.nav_scrolled = has_overflow;
            self.needs_refresh = true;
        } else if store.current().is_some() {
            if let Some((left, width)) = measurements.current_tab {
                self.nav.scroll_into_view(left, width);
            }
        }
    }

    /// Click on a tab's close affordance. A denied close (fixed or already
    /// gone) is ignored; either way the click must not propagate to the
    /// tab's navigation handler.
    pub fn handle_close_click(&mut self, store: &mut OpenedAppStore, session_id: &str) -> TabClick {
        let needs_refresh = match store.close(session_id) {
            Ok(outcome) => outcome.needs_refresh,
            Err(err) => {
                tracing::debug!(session = %session_id, error = %err, "close ignored");
                false
            }
        };
        if needs_refresh {
            self.needs_refresh = true;
        }
        TabClick {
            needs_refresh,
            stop_propagation: true,
        }
    }

    /// Right-click on a tab. A non-empty action list suppresses the
    /// platform's default context menu and is displayed at the pointer
    /// location; an empty list lets the default menu through.
    pub fn handle_context_menu(
        &mut self,
        store: &OpenedAppStore,
        session_id: &str,
        x: f32,
        y: f32,
    ) -> Option<MenuRequest> {
        let session = store.find(session_id)?;
        let changed = Cell::new(false);
        let items = self
            .menu
            .create_opened_app_context_menu(session, &|| changed.set(true));
        if changed.get() {
            self.needs_refresh = true;
        }
        if items.is_empty() {
            None
        } else {
            Some(MenuRequest { x, y, items })
        }
    }

    /// Vertical mouse-wheel delta over the tab strip.
    pub fn handle_wheel(&mut self, delta_y: f32) {
        self.nav.handle_wheel(delta_y);
    }

    /// Click on one of the overflow arrows.
    pub fn handle_arrow_click(&mut self, direction: ScrollDirection) {
        self.nav.arrow_scroll(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuItem, NoContextMenu};
    use crate::notify::RecordingMessager;
    use crate::profile::AlwaysVerified;
    use huddle_exts::{AppRegistry, OpenedApp};
    use huddle_types::AppDescriptor;

    struct Unverified;

    impl ProfileGate for Unverified {
        fn is_user_verified(&self) -> bool {
            false
        }
    }

    struct StaticMenu {
        items: Vec<MenuItem>,
        trigger_change: bool,
    }

    impl ContextMenuBuilder for StaticMenu {
        fn create_opened_app_context_menu(
            &self,
            _session: &OpenedApp,
            on_change: &dyn Fn(),
        ) -> Vec<MenuItem> {
            if self.trigger_change {
                on_change();
            }
            self.items.clone()
        }
    }

    fn sample_store() -> OpenedAppStore {
        let mut registry = AppRegistry::new();
        registry.register(
            AppDescriptor::new("home", "Home")
                .built_in()
                .fixed(),
        );
        registry.register(
            AppDescriptor::new("wiki", "Wiki").with_direct_url("https://wiki.example.com"),
        );
        registry.register(AppDescriptor::new("blank", "Blank"));
        registry.set_default_app("home");
        OpenedAppStore::new(std::sync::Arc::new(registry))
    }

    fn shell_with(messager: Arc<RecordingMessager>) -> HostShell {
        HostShell::new(messager, Arc::new(NoContextMenu), Arc::new(AlwaysVerified))
    }

    #[test]
    fn test_unverified_profile_renders_nothing() {
        let mut shell = HostShell::new(
            Arc::new(RecordingMessager::new()),
            Arc::new(NoContextMenu),
            Arc::new(Unverified),
        );
        let mut store = sample_store();
        store.open_by_id("home", None).unwrap();

        let model = shell.render(&mut store, &ShellProps::default(), "/exts/app/home");
        assert!(model.is_none());
    }

    #[test]
    fn test_hidden_prop_renders_nothing() {
        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let mut store = sample_store();
        store.open_by_id("home", None).unwrap();

        let props = ShellProps {
            hidden: true,
            class_name: None,
        };
        assert!(shell.render(&mut store, &props, "/exts/app/home").is_none());
    }

    #[test]
    fn test_render_builds_tabs_and_panes() {
        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let mut store = sample_store();
        store.open_by_id("home", None).unwrap();
        store.open_by_id("wiki", None).unwrap();
        store.open_by_id("blank", None).unwrap();

        let model = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/wiki")
            .unwrap();
        assert!(model.redirect.is_none());
        assert_eq!(model.nav.tabs.len(), 3);
        assert!(!model.nav.compact);
        assert!(model.class_name.contains("app-exts-current-wiki"));

        let home = &model.nav.tabs[0];
        assert!(!home.closable);
        assert!(!home.current);
        assert!(home.accent_color.is_none());

        let wiki = &model.nav.tabs[1];
        assert!(wiki.current);
        assert!(wiki.closable);
        assert!(wiki.accent_color.is_some());

        // Exactly the current pane is visible; the rest stay mounted.
        let hidden: Vec<bool> = model.panes.iter().map(|pane| pane.hidden).collect();
        assert_eq!(hidden, vec![true, false, true]);
        assert_eq!(model.panes[1].view.strategy(), "embedded-web");

        // No strategy applies to "blank": stable placeholder with the id.
        let blank = &model.panes[2];
        assert!(blank.view.is_unresolved());
        assert_eq!(
            blank.placeholder.as_deref(),
            Some("No view available (blank)")
        );
    }

    #[test]
    fn test_render_drains_view_events_into_store() {
        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let mut store = sample_store();
        store.open_by_id("wiki", None).unwrap();

        let events = shell.view_events("wiki");
        events.report_loading(true);
        events.report_title("Deep link");

        let model = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/wiki")
            .unwrap();
        let wiki = &model.nav.tabs[0];
        assert!(wiki.loading);
        assert_eq!(wiki.title, "Deep link");
    }

    #[test]
    fn test_unknown_app_redirects_and_warns_once() {
        let messager = Arc::new(RecordingMessager::new());
        let mut shell = shell_with(messager.clone());
        let mut store = sample_store();
        store.open_by_id("wiki", None).unwrap();

        let model = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/zzz")
            .unwrap();
        assert_eq!(model.redirect.as_deref(), Some("/exts/app/home"));
        assert!(store.is_current("wiki"));

        shell.after_render(&store, NavMeasurements::default());
        let messages = messager.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "Cannot find app \"zzz\"");

        // Surfaced once, then cleared.
        shell.after_render(&store, NavMeasurements::default());
        assert_eq!(messager.messages().len(), 1);
    }

    #[test]
    fn test_close_click_refreshes_and_stops_propagation() {
        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let mut store = sample_store();
        store.open_by_id("home", None).unwrap();
        store.open_by_id("wiki", None).unwrap();

        let click = shell.handle_close_click(&mut store, "wiki");
        assert!(click.needs_refresh);
        assert!(click.stop_propagation);
        assert!(shell.take_needs_refresh());
        assert!(store.is_current("home"));

        // Fixed session: ignored, still no propagation.
        let denied = shell.handle_close_click(&mut store, "home");
        assert!(!denied.needs_refresh);
        assert!(denied.stop_propagation);
        assert!(!shell.take_needs_refresh());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_context_menu_suppression() {
        let mut store = sample_store();
        store.open_by_id("wiki", None).unwrap();

        let mut empty_shell = HostShell::new(
            Arc::new(RecordingMessager::new()),
            Arc::new(NoContextMenu),
            Arc::new(AlwaysVerified),
        );
        assert!(
            empty_shell
                .handle_context_menu(&store, "wiki", 10.0, 20.0)
                .is_none()
        );

        let mut menu_shell = HostShell::new(
            Arc::new(RecordingMessager::new()),
            Arc::new(StaticMenu {
                items: vec![MenuItem::new("pin", "Pin tab")],
                trigger_change: true,
            }),
            Arc::new(AlwaysVerified),
        );
        let request = menu_shell
            .handle_context_menu(&store, "wiki", 10.0, 20.0)
            .unwrap();
        assert_eq!(request.x, 10.0);
        assert_eq!(request.items.len(), 1);
        assert!(menu_shell.take_needs_refresh());

        // Unknown session: no menu.
        assert!(
            menu_shell
                .handle_context_menu(&store, "ghost", 0.0, 0.0)
                .is_none()
        );
    }

    #[test]
    fn test_after_render_latches_overflow_then_scrolls_current_into_view() {
        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let mut store = sample_store();
        store.open_by_id("wiki", None).unwrap();
        shell
            .render(&mut store, &ShellProps::default(), "/exts/app/wiki")
            .unwrap();

        // Overflow appears: latch flips and forces a refresh.
        shell.after_render(
            &store,
            NavMeasurements {
                client_width: 200.0,
                content_width: 500.0,
                current_tab: Some((300.0, 80.0)),
            },
        );
        assert!(shell.take_needs_refresh());
        assert_eq!(shell.nav().scroll_left, 0.0);

        // Latch is stable: same overflow scrolls the current tab into view.
        shell.after_render(
            &store,
            NavMeasurements {
                client_width: 200.0,
                content_width: 500.0,
                current_tab: Some((300.0, 80.0)),
            },
        );
        assert!(!shell.take_needs_refresh());
        assert_eq!(shell.nav().scroll_left, 180.0);

        let model = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/wiki")
            .unwrap();
        assert!(model.nav.scrolled);
        assert!(model.nav.show_arrows);
    }

    #[test]
    fn test_compact_strip_past_seven_tabs() {
        let mut registry = AppRegistry::new();
        for index in 0..8 {
            registry.register(AppDescriptor::new(
                format!("app{index}"),
                format!("App {index}"),
            ));
        }
        let mut store = OpenedAppStore::new(std::sync::Arc::new(registry));
        for index in 0..8 {
            store.open_by_id(&format!("app{index}"), None).unwrap();
        }

        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let model = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/app0")
            .unwrap();
        assert!(model.nav.compact);
    }

    #[test]
    fn test_lang_switch_changes_generation() {
        let mut shell = shell_with(Arc::new(RecordingMessager::new()));
        let mut store = sample_store();
        store.open_by_id("wiki", None).unwrap();

        let before = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/wiki")
            .unwrap()
            .lang_generation;
        shell
            .lang_mut()
            .switch("de", std::collections::HashMap::new());
        let after = shell
            .render(&mut store, &ShellProps::default(), "/exts/app/wiki")
            .unwrap()
            .lang_generation;
        assert_ne!(before, after);
    }
}
