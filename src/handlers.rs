//! Chat command handlers for `dig`, `nslookup` and `host`.
//!
//! Each handler splits the raw command text on whitespace and forwards the
//! tokens to the executor unchanged. Only `nslookup` validates its arguments.

use std::sync::Arc;

use crate::executor::{ProcessRunner, execute};
use crate::tool::{DnsTool, Invocation};

/// Reply sent instead of running `nslookup` when it would go interactive.
pub const NSLOOKUP_INTERACTIVE_ABORT: &str = "Your call to nslookup would have caused it to go into interactive mode and hang so I aborted it, sorry";

/// A chat command: a name the host routes on and a text-in, text-out handler.
pub trait ChatCommandHandler: Send + Sync {
    /// Command keyword as typed by the user (without prefix).
    fn name(&self) -> &str;

    /// One-line help text.
    fn description(&self) -> &str;

    /// Handle the trailing text of the command and produce the reply.
    fn handle(&self, args: &str) -> String;
}

fn run(runner: &dyn ProcessRunner, invocation: &Invocation) -> String {
    execute(runner, invocation.tool.name(), &invocation.args)
}

/// `dig <args>`
pub struct DigHandler {
    runner: Arc<dyn ProcessRunner>,
}

impl DigHandler {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

impl ChatCommandHandler for DigHandler {
    fn name(&self) -> &str {
        DnsTool::Dig.name()
    }

    fn description(&self) -> &str {
        "Call 'dig'"
    }

    fn handle(&self, args: &str) -> String {
        run(self.runner.as_ref(), &Invocation::from_chat_text(DnsTool::Dig, args))
    }
}

/// `nslookup <args>`, refusing calls that would enter interactive mode.
pub struct NslookupHandler {
    runner: Arc<dyn ProcessRunner>,
}

impl NslookupHandler {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

/// True when nslookup would read commands from stdin instead of exiting.
fn would_go_interactive(args: &[String]) -> bool {
    match args.first() {
        None => true,
        Some(first) => first == "-" || first == "-interactive",
    }
}

impl ChatCommandHandler for NslookupHandler {
    fn name(&self) -> &str {
        DnsTool::Nslookup.name()
    }

    fn description(&self) -> &str {
        "Call 'nslookup'"
    }

    fn handle(&self, args: &str) -> String {
        let invocation = Invocation::from_chat_text(DnsTool::Nslookup, args);
        if would_go_interactive(&invocation.args) {
            tracing::debug!(args = ?invocation.args, "refusing interactive nslookup");
            return NSLOOKUP_INTERACTIVE_ABORT.to_string();
        }
        run(self.runner.as_ref(), &invocation)
    }
}

/// `host <args>`
pub struct HostHandler {
    runner: Arc<dyn ProcessRunner>,
}

impl HostHandler {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

impl ChatCommandHandler for HostHandler {
    fn name(&self) -> &str {
        DnsTool::Host.name()
    }

    fn description(&self) -> &str {
        "Call 'host'"
    }

    fn handle(&self, args: &str) -> String {
        run(self.runner.as_ref(), &Invocation::from_chat_text(DnsTool::Host, args))
    }
}

/// One handler per supported tool, sharing the given runner.
pub fn dns_handlers(runner: Arc<dyn ProcessRunner>) -> Vec<Box<dyn ChatCommandHandler>> {
    DnsTool::ALL
        .into_iter()
        .map(|tool| -> Box<dyn ChatCommandHandler> {
            match tool {
                DnsTool::Dig => Box::new(DigHandler::new(runner.clone())),
                DnsTool::Nslookup => Box::new(NslookupHandler::new(runner.clone())),
                DnsTool::Host => Box::new(HostHandler::new(runner.clone())),
            }
        })
        .collect()
}
