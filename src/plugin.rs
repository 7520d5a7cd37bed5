//! DnsUtilsPlugin — lifecycle entry point for the host.
//!
//! `activate` runs once when the host enables the plugin: it sends the
//! install notice to admins when the stored marker is older than
//! `INSTALL_MESSAGE_VERSION`, then probes that each DNS tool can be launched.
//! Neither step can fail activation.

use std::sync::Arc;

use serde_json::Value;

use crate::admin::AdminNotifier;
use crate::executor::ProcessRunner;
use crate::handlers::dns_handlers;
use crate::registry::CommandRegistry;
use crate::store::KvStore;
use crate::tool::DnsTool;

/// Store key holding the last install-message version sent to admins.
pub const INSTALL_MESSAGE_KEY: &str = "INSTALL_MESSAGE_VERSION";

/// Bump to re-send `INSTALL_MESSAGE_TEXT` after an upgrade.
pub const INSTALL_MESSAGE_VERSION: u64 = 1;

pub const INSTALL_MESSAGE_TEXT: &str = "Thank you for installing dnsutils-bot.

Please note that this plugin calls dig/nslookup/host and passes arguments on to them directly without any form of checking.
Although this should be safe (commands are called directly, not via a shell which could be tricked into redirecting output or executing arbitrary commands), this might still give users more direct access than desired. If that is a concern for your deployment, you may want to disable this plugin.";

/// Outcome of launching one tool during the sanity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub tool: DnsTool,
    /// Launch error text, `None` when the tool started.
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// What `activate` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub notice_sent: bool,
    pub probes: Vec<ProbeOutcome>,
}

impl ActivationReport {
    pub fn failed_tools(&self) -> Vec<DnsTool> {
        self.probes
            .iter()
            .filter(|p| !p.is_ok())
            .map(|p| p.tool)
            .collect()
    }
}

/// The DNS utilities plugin.
pub struct DnsUtilsPlugin {
    runner: Arc<dyn ProcessRunner>,
}

impl DnsUtilsPlugin {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Build the dispatch table for this plugin's chat commands.
    pub fn registry(&self, prefix: &str) -> CommandRegistry {
        let mut registry = CommandRegistry::new(prefix);
        for handler in dns_handlers(self.runner.clone()) {
            registry.register(handler);
        }
        registry
    }

    /// Lifecycle hook, called once when the host enables the plugin.
    pub fn activate(
        &self,
        store: &mut dyn KvStore,
        notifier: &dyn AdminNotifier,
    ) -> ActivationReport {
        let notice_sent = send_install_notice(store, notifier);

        let probes = self.probe();
        for outcome in &probes {
            if let Some(error) = &outcome.error {
                notifier.warn_admins(&format!(
                    "Warning! This plugin uses {}, but it failed to execute: {}",
                    outcome.tool, error
                ));
            }
        }

        let report = ActivationReport {
            notice_sent,
            probes,
        };
        tracing::info!(
            notice_sent,
            failed = ?report.failed_tools(),
            "dnsutils plugin activated"
        );
        report
    }

    /// Launch each tool once with minimal arguments, discarding its output.
    pub fn probe(&self) -> Vec<ProbeOutcome> {
        DnsTool::ALL
            .into_iter()
            .map(|tool| {
                let args: Vec<String> = tool.probe_args().iter().map(|a| a.to_string()).collect();
                let error = match self.runner.run(tool.name(), &args) {
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!(tool = %tool, error = %e, "DNS tool failed sanity probe");
                        Some(e.to_string())
                    }
                };
                ProbeOutcome { tool, error }
            })
            .collect()
    }
}

/// Whether the stored marker means admins have not seen the current notice.
fn notice_outdated(stored: Option<Value>) -> bool {
    match stored.as_ref().and_then(Value::as_u64) {
        Some(version) => version < INSTALL_MESSAGE_VERSION,
        None => true,
    }
}

fn send_install_notice(store: &mut dyn KvStore, notifier: &dyn AdminNotifier) -> bool {
    if !notice_outdated(store.get(INSTALL_MESSAGE_KEY)) {
        return false;
    }
    notifier.warn_admins(INSTALL_MESSAGE_TEXT);
    store.set(INSTALL_MESSAGE_KEY, Value::from(INSTALL_MESSAGE_VERSION));
    if let Err(e) = store.sync() {
        tracing::error!(error = %e, "failed to persist install message version");
    }
    true
}
