//! Closed catalog of pass-through pwndbg operations.
//!
//! Each operation maps to one literal base command and at most one
//! argument slot. The argument, when present, is appended after a single
//! space with no further escaping.

use std::fmt::{Display, Formatter};

/// Argument slot accepted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSlot {
    /// No argument.
    None,
    /// Optional argument named by the tool schema.
    Optional(&'static str),
    /// Required argument named by the tool schema.
    Required(&'static str),
}

impl ArgSlot {
    /// Schema property name, if the slot takes an argument.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Optional(name) | Self::Required(name) => Some(name),
        }
    }
}

/// Static description of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// MCP tool name.
    pub tool: &'static str,
    /// Literal command sent to the debugger.
    pub base_command: &'static str,
    /// Argument slot.
    pub argument: ArgSlot,
    /// Tool description shown to MCP clients.
    pub description: &'static str,
}

/// A required argument was missing or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingArgument(pub &'static str);

impl Display for MissingArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required argument `{}`", self.0)
    }
}

impl std::error::Error for MissingArgument {}

/// Pass-through debugger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Heap summary.
    Heap,
    /// All bin states.
    Bins,
    /// Heap chunk visualization.
    Vis,
    /// Single chunk analysis.
    MallocChunk,
    /// Binary hardening flags.
    Checksec,
    /// Memory mappings.
    Vmmap,
    /// Stack canary.
    Canary,
    /// Register state.
    Regs,
    /// Stack contents.
    Stack,
    /// Pointer-chasing memory dump.
    Telescope,
    /// Full context view.
    Context,
    /// Memory value search.
    Search,
    /// Pattern search.
    Find,
    /// GOT entries.
    Got,
    /// PLT entries.
    Plt,
    /// ROP gadget search.
    Rop,
}

impl Operation {
    /// Every operation in tool-listing order.
    pub const ALL: [Operation; 16] = [
        Self::Heap,
        Self::Bins,
        Self::Vis,
        Self::MallocChunk,
        Self::Checksec,
        Self::Vmmap,
        Self::Canary,
        Self::Regs,
        Self::Stack,
        Self::Telescope,
        Self::Context,
        Self::Search,
        Self::Find,
        Self::Got,
        Self::Plt,
        Self::Rop,
    ];

    /// Lookup table entry for this operation.
    #[must_use]
    pub const fn spec(self) -> OperationSpec {
        let (tool, base_command, argument, description) = match self {
            Self::Heap => ("heap", "heap", ArgSlot::None, "Summarize the heap state"),
            Self::Bins => ("bins", "bins", ArgSlot::None, "Show the state of all bins"),
            Self::Vis => (
                "vis",
                "vis_heap_chunks",
                ArgSlot::None,
                "Visualize heap chunks",
            ),
            Self::MallocChunk => (
                "malloc_chunk",
                "chunk",
                ArgSlot::Required("address"),
                "Analyze the malloc chunk at an address",
            ),
            Self::Checksec => (
                "checksec",
                "checksec",
                ArgSlot::None,
                "Check binary security features",
            ),
            Self::Vmmap => ("vmmap", "vmmap", ArgSlot::None, "Show memory mappings"),
            Self::Canary => ("canary", "canary", ArgSlot::None, "Show the stack canary"),
            Self::Regs => ("regs", "registers", ArgSlot::None, "Show register state"),
            Self::Stack => ("stack", "stack", ArgSlot::None, "Show stack contents"),
            Self::Telescope => (
                "telescope",
                "telescope",
                ArgSlot::Optional("address"),
                "Dump memory while dereferencing pointers",
            ),
            Self::Context => ("context", "context", ArgSlot::None, "Show the full context"),
            Self::Search => (
                "search",
                "search",
                ArgSlot::Required("pattern"),
                "Search memory for a value",
            ),
            Self::Find => (
                "find",
                "find",
                ArgSlot::Required("pattern"),
                "Search for a pattern",
            ),
            Self::Got => ("got", "got", ArgSlot::None, "Show the GOT table"),
            Self::Plt => ("plt", "plt", ArgSlot::None, "Show the PLT table"),
            Self::Rop => ("rop", "rop", ArgSlot::None, "Search for ROP gadgets"),
        };
        OperationSpec {
            tool,
            base_command,
            argument,
            description,
        }
    }

    /// Resolve an operation by its MCP tool name.
    #[must_use]
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.spec().tool == name)
    }

    /// Build the literal debugger command for this operation.
    ///
    /// Blank arguments count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`MissingArgument`] when a required argument is absent.
    pub fn command(self, argument: Option<&str>) -> Result<String, MissingArgument> {
        let spec = self.spec();
        let argument = argument.map(str::trim).filter(|arg| !arg.is_empty());
        match (spec.argument, argument) {
            (ArgSlot::None, _) | (ArgSlot::Optional(_), None) => Ok(spec.base_command.to_owned()),
            (ArgSlot::Optional(_) | ArgSlot::Required(_), Some(arg)) => {
                Ok(format!("{} {arg}", spec.base_command))
            }
            (ArgSlot::Required(name), None) => Err(MissingArgument(name)),
        }
    }

    /// Whether the built command carries caller-supplied text.
    #[must_use]
    pub fn takes_argument(self) -> bool {
        !matches!(self.spec().argument, ArgSlot::None)
    }
}
