pub mod config;
pub mod events;
pub mod registry;
pub mod router;
pub mod session;
pub mod store;
pub mod view;

// Re-export the shared error type alongside the core contracts
pub use huddle_types::{AppDescriptor, HostError, Result};

pub use config::{ConfigService, ExtsConfig};
pub use events::{SessionEvent, SessionEventSink, SessionEventSource, ViewEvents, session_event_channel};
pub use registry::{AppRegistry, RegisteredApp};
pub use router::{Route, RouteAction, RouterBridge};
pub use session::OpenedApp;
pub use store::{CloseOutcome, OpenOutcome, OpenedAppStore};
pub use view::{AppView, BuiltInView, MainView, ResolvedView, resolve_view};
