//! dnsutils-bot — chat-bot plugin exposing `dig`, `nslookup` and `host`.
//! Chat commands are forwarded to the system utilities (never via a shell)
//! and their merged stdout+stderr is returned as the reply. The host supplies
//! message transport, a key-value store and an admin notification channel.

pub mod admin;
pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod plugin;
pub mod registry;
pub mod store;
pub mod tool;

#[cfg(test)]
mod testing;

pub use admin::{AdminNotifier, TracingNotifier};
pub use config::BotConfig;
pub use error::{DnsUtilsError, Result};
pub use executor::{ProcessRunner, SystemRunner, execute};
pub use handlers::{
    ChatCommandHandler, DigHandler, HostHandler, NSLOOKUP_INTERACTIVE_ABORT, NslookupHandler,
    dns_handlers,
};
pub use plugin::{
    ActivationReport, DnsUtilsPlugin, INSTALL_MESSAGE_KEY, INSTALL_MESSAGE_TEXT,
    INSTALL_MESSAGE_VERSION, ProbeOutcome,
};
pub use registry::CommandRegistry;
pub use store::{JsonFileStore, KvStore, MemoryStore};
pub use tool::{DnsTool, Invocation};
