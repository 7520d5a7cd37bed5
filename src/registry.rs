//! CommandRegistry — dispatch table from chat command names to handlers.
//!
//! Built once at startup. Incoming chat lines are matched against the
//! configured prefix, the first token selects the handler and the remaining
//! text is passed to it untouched.

use std::collections::BTreeMap;

use crate::handlers::ChatCommandHandler;

/// Built-in command listing the registered handlers.
pub const HELP_COMMAND: &str = "help";

/// Dispatch table of chat command handlers, keyed by command name.
pub struct CommandRegistry {
    prefix: String,
    handlers: BTreeMap<String, Box<dyn ChatCommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry that recognises lines starting with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            handlers: BTreeMap::new(),
        }
    }

    /// Register a handler under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register(&mut self, handler: Box<dyn ChatCommandHandler>) {
        let name = handler.name().to_string();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::warn!(command = %name, "replacing already registered chat command");
        }
    }

    /// Look up a handler by command name.
    pub fn get(&self, name: &str) -> Option<&dyn ChatCommandHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handle one chat line.
    ///
    /// Returns `None` when the line is not addressed to the bot (no prefix,
    /// or nothing after it). Otherwise always returns a reply.
    pub fn dispatch(&self, line: &str) -> Option<String> {
        let body = line.trim_start().strip_prefix(self.prefix.as_str())?;
        let body = body.trim_start();
        if body.is_empty() {
            return None;
        }
        let (name, args) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], &body[pos..]),
            None => (body, ""),
        };

        if let Some(handler) = self.get(name) {
            tracing::debug!(command = %name, "dispatching chat command");
            return Some(handler.handle(args));
        }
        if name == HELP_COMMAND {
            return Some(self.help_text());
        }
        Some(format!("Unknown command: {}", name))
    }

    /// Help reply listing every registered command with its description.
    pub fn help_text(&self) -> String {
        let mut text = String::from("Available commands:");
        for (name, handler) in &self.handlers {
            text.push_str(&format!(
                "\n  {}{} - {}",
                self.prefix,
                name,
                handler.description()
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::handlers::{NSLOOKUP_INTERACTIVE_ABORT, dns_handlers};
    use crate::testing::RecordingRunner;

    fn registry_with(runner: Arc<RecordingRunner>) -> CommandRegistry {
        let mut registry = CommandRegistry::new("!");
        for handler in dns_handlers(runner) {
            registry.register(handler);
        }
        registry
    }

    #[test]
    fn test_dispatch_routes_to_named_handler() {
        let runner = Arc::new(RecordingRunner::with_output("answer"));
        let registry = registry_with(runner.clone());

        assert_eq!(registry.dispatch("!dig example.com A"), Some("answer".to_string()));
        assert_eq!(
            runner.calls(),
            vec![(
                "dig".to_string(),
                vec!["example.com".to_string(), "A".to_string()]
            )]
        );
    }

    #[test]
    fn test_dispatch_ignores_lines_without_prefix() {
        let runner = Arc::new(RecordingRunner::with_output("answer"));
        let registry = registry_with(runner.clone());

        assert_eq!(registry.dispatch("dig example.com"), None);
        assert_eq!(registry.dispatch("!"), None);
        assert_eq!(registry.dispatch("!   "), None);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_dispatch_bare_command_passes_empty_args() {
        let runner = Arc::new(RecordingRunner::with_output("answer"));
        let registry = registry_with(runner.clone());

        assert_eq!(
            registry.dispatch("!nslookup"),
            Some(NSLOOKUP_INTERACTIVE_ABORT.to_string())
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let registry = registry_with(Arc::new(RecordingRunner::default()));
        assert_eq!(
            registry.dispatch("!whois example.com"),
            Some("Unknown command: whois".to_string())
        );
    }

    #[test]
    fn test_help_lists_commands() {
        let registry = registry_with(Arc::new(RecordingRunner::default()));
        let help = registry.dispatch("!help").unwrap();
        assert!(help.starts_with("Available commands:"));
        assert!(help.contains("!dig - Call 'dig'"));
        assert!(help.contains("!host - Call 'host'"));
        assert!(help.contains("!nslookup - Call 'nslookup'"));
    }

    #[test]
    fn test_names_sorted() {
        let registry = registry_with(Arc::new(RecordingRunner::default()));
        assert_eq!(registry.names(), vec!["dig", "host", "nslookup"]);
    }

    #[test]
    fn test_multi_char_prefix() {
        let runner = Arc::new(RecordingRunner::with_output("ok"));
        let mut registry = CommandRegistry::new("bot:");
        for handler in dns_handlers(runner.clone()) {
            registry.register(handler);
        }
        assert_eq!(registry.dispatch("bot: host example.com"), Some("ok".to_string()));
        assert_eq!(registry.prefix(), "bot:");
    }
}
