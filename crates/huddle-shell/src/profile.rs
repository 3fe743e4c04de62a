//! Access gate for the extension host.

/// Tells the shell whether the hosting user/profile is verified.
///
/// The shell consults this on every render and renders nothing while the
/// answer is false; implementations must not assume the answer is cached.
pub trait ProfileGate: Send + Sync {
    fn is_user_verified(&self) -> bool;
}

/// Default implementation for hosts without a verification step.
#[derive(Debug, Default)]
pub struct AlwaysVerified;

impl ProfileGate for AlwaysVerified {
    fn is_user_verified(&self) -> bool {
        true
    }
}
