//! The fixed set of DNS tools exposed as chat commands.

use std::fmt;

/// One of the supported external DNS utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsTool {
    Dig,
    Nslookup,
    Host,
}

impl DnsTool {
    /// All supported tools, in registration order.
    pub const ALL: [DnsTool; 3] = [DnsTool::Dig, DnsTool::Nslookup, DnsTool::Host];

    /// Executable name, also used as the chat command name.
    pub fn name(self) -> &'static str {
        match self {
            DnsTool::Dig => "dig",
            DnsTool::Nslookup => "nslookup",
            DnsTool::Host => "host",
        }
    }

    /// Minimal arguments used by the activation sanity probe.
    ///
    /// `nslookup` gets a hostname because a bare call drops into interactive mode.
    pub fn probe_args(self) -> &'static [&'static str] {
        match self {
            DnsTool::Dig => &[],
            DnsTool::Nslookup => &["localhost"],
            DnsTool::Host => &[],
        }
    }
}

impl fmt::Display for DnsTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single request to run a tool with an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: DnsTool,
    pub args: Vec<String>,
}

impl Invocation {
    /// Build an invocation by splitting raw chat text on whitespace.
    pub fn from_chat_text(tool: DnsTool, text: &str) -> Self {
        Invocation {
            tool,
            args: text.split_whitespace().map(String::from).collect(),
        }
    }
}
