pub mod lang;
pub mod menu;
pub mod nav;
pub mod notify;
pub mod profile;
pub mod shell;

pub use lang::Lang;
pub use menu::{ContextMenuBuilder, MenuItem, MenuRequest, NoContextMenu};
pub use nav::{MAX_ARROW_STEP, NavViewport, ScrollDirection};
pub use notify::{MessageKind, MessageOptions, MessagePosition, Messager, RecordingMessager};
pub use profile::{AlwaysVerified, ProfileGate};
pub use shell::{
    AppPane, HostShell, NavMeasurements, NavModel, ShellModel, ShellProps, TabClick, TabModel,
};
