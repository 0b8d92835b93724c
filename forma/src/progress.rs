use crate::node::Chain;

/// Observer surface the searcher and executor use to report the path
/// currently under trial and the step currently executing.
///
/// Neither callback may influence the search: they're pure notifications.
/// Implementations that need to yield control back to a host event loop
/// (to let it repaint between steps) should do so from within
/// `on_step_start`.
pub trait ProgressObserver: Send + Sync {
    /// Invoked once per candidate chain, before it is attempted.
    fn on_path_attempt(&self, _chain: &Chain) {}

    /// Invoked once per hop, before that hop's `convert` call.
    fn on_step_start(&self, _chain: &Chain, _step_index: usize) {}
}

/// An observer that does nothing, for callers that don't care about
/// progress (e.g. most unit tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

/// An observer that logs each notification at `debug` level, matching
/// this codebase's usual way of surfacing progress when there's no UI to
/// hand it to.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgress;

impl ProgressObserver for LoggingProgress {
    fn on_path_attempt(&self, chain: &Chain) {
        let names: Vec<&str> = chain.iter().map(|n| n.handler.name()).collect();
        log::debug!("attempting chain: {}", names.join(" -> "));
    }

    fn on_step_start(&self, chain: &Chain, step_index: usize) {
        if let Some(node) = chain.get(step_index + 1) {
            log::debug!("step {step_index}: invoking '{}' for mime '{}'", node.handler.name(), node.format.mime);
        }
    }
}

/// A progress event suitable for forwarding across a channel to a host
/// process that wants to observe a conversion without blocking on it. No
/// channel-backed observer ships in this crate: it stays runtime-agnostic
/// so a host can pick whatever executor (or none at all) it needs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    PathAttempt { handler_names: Vec<String> },
    StepStart { step_index: usize, handler_name: String },
}
