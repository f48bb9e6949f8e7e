//! Structured trace of parser decisions, replacing ad hoc prints.

/// One irreversible decision made while parsing a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// The `tool_code` sentinel on line zero was discarded.
    PreambleSkipped,
    /// A marker line opened a block for `path`.
    BlockOpened { path: String },
    /// A fence at line index `line` was resolved as ordinary content.
    FenceKeptAsContent { line: usize },
    /// A fence was resolved as a genuine close.
    BlockClosed { path: String, bytes: usize },
    /// Input ended while the block was still open; partial content kept.
    EofFinalized { path: String, bytes: usize },
}

pub trait TraceSink {
    fn record(&mut self, event: ParseEvent);
}

/// Discards all events; the default for plain [`super::parse`] calls.
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _event: ParseEvent) {}
}

/// Accumulates events in order so tests can assert against them.
#[derive(Default)]
pub struct EventLog {
    events: Vec<ParseEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }
}

impl TraceSink for EventLog {
    fn record(&mut self, event: ParseEvent) {
        self.events.push(event);
    }
}

/// Prints each event as it happens; wired to the `--trace` CLI flag.
pub struct StdoutSink;

impl TraceSink for StdoutSink {
    fn record(&mut self, event: ParseEvent) {
        match event {
            ParseEvent::PreambleSkipped => println!("Skipping tool_code preamble line"),
            ParseEvent::BlockOpened { path } => println!("Found file: {path}"),
            ParseEvent::FenceKeptAsContent { line } => {
                println!("Fence on line {line} kept as file content")
            }
            ParseEvent::BlockClosed { path, bytes } => {
                println!("Completed: {path} ({bytes} bytes)")
            }
            ParseEvent::EofFinalized { path, bytes } => {
                println!("Completed: {path} at end of response ({bytes} bytes)")
            }
        }
    }
}
