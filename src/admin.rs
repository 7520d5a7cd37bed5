//! Admin notification capability supplied by the host.

/// Sends a text message to every configured bot administrator.
pub trait AdminNotifier: Send + Sync {
    fn warn_admins(&self, text: &str);
}

/// Delivers admin notices through the log at `warn` level.
///
/// Used by the STDIO host, which has no private channel to reach admins on.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier {
    admins: Vec<String>,
}

impl TracingNotifier {
    pub fn new(admins: Vec<String>) -> Self {
        Self { admins }
    }
}

impl AdminNotifier for TracingNotifier {
    fn warn_admins(&self, text: &str) {
        tracing::warn!(admins = ?self.admins, "admin notice:\n{}", text);
    }
}
