use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crate::executor::AttemptExecutor;
use crate::handler::FileData;
use crate::node::{chain_contains_format, Chain, Node, MAX_CHAIN_LEN};
use crate::progress::ProgressObserver;
use crate::registry::FormatRegistry;

/// Routing scope for the target-close phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// Any handler that can produce the target MIME closes the chain.
    Simple,
    /// Only the exact handler the caller selected may close the chain.
    Advanced,
}

/// Result of a [`PathSearcher::find_path`] call.
pub enum SearchOutcome {
    /// A chain was found and executed end-to-end; `chain`'s last node's
    /// MIME equals the requested target MIME.
    Success { files: Vec<FileData>, chain: Chain },
    /// The deadline expired, but some prefix had already executed
    /// successfully; `chain`'s last node's MIME does NOT equal the target.
    Partial { files: Vec<FileData>, chain: Chain },
    /// The deadline expired before any hop executed successfully.
    Timeout,
    /// The search space was exhausted with no successful chain.
    NoRoute,
}

/// Bounded BFS over the handler-format graph. Each call owns a fresh
/// [`AttemptExecutor`], so the prefix cache never outlives one search.
pub struct PathSearcher<'a> {
    registry: &'a FormatRegistry,
    mode: RoutingMode,
}

impl<'a> PathSearcher<'a> {
    pub fn new(registry: &'a FormatRegistry, mode: RoutingMode) -> Self {
        Self { registry, mode }
    }

    pub fn find_path(
        &self,
        files: &[FileData],
        input: &Node,
        target: &Node,
        deadline: Instant,
        progress: &dyn ProgressObserver,
    ) -> SearchOutcome {
        let mut executor = AttemptExecutor::new();
        let mut queue: VecDeque<Chain> = VecDeque::new();
        queue.push_back(vec![input.clone()]);
        let mut any_input_tried = false;

        loop {
            if Instant::now() > deadline {
                return match executor.partial_result(input) {
                    Some((files, chain)) => SearchOutcome::Partial { files, chain },
                    None => SearchOutcome::Timeout,
                };
            }

            let Some(chain) = queue.pop_front() else {
                return SearchOutcome::NoRoute;
            };
            if chain.len() > MAX_CHAIN_LEN {
                continue;
            }

            let prev = chain.last().expect("a chain always has at least the input node");
            let valid_handlers = self.registry.by_from_mime(&prev.format.mime);

            let close_candidates = self.target_close_candidates(valid_handlers, target);
            for close in close_candidates {
                let mut candidate = chain.clone();
                candidate.push(close);
                progress.on_path_attempt(&candidate);
                if let Some(result) = executor.attempt(files, &candidate, progress) {
                    return SearchOutcome::Success {
                        files: result,
                        chain: candidate,
                    };
                }
            }

            if !any_input_tried {
                any_input_tried = true;
                for node in self.registry.any_input_writers() {
                    if node.format.mime != target.format.mime {
                        continue;
                    }
                    let mut candidate = chain.clone();
                    candidate.push(node.clone());
                    progress.on_path_attempt(&candidate);
                    if let Some(result) = executor.attempt(files, &candidate, progress) {
                        return SearchOutcome::Success {
                            files: result,
                            chain: candidate,
                        };
                    }
                }
            }

            if chain.len() < MAX_CHAIN_LEN {
                for handler in valid_handlers {
                    for format in handler.supported_formats() {
                        if !format.to || !format.has_mime() || chain_contains_format(&chain, &format) {
                            continue;
                        }
                        let mut next = chain.clone();
                        next.push(Node::new(handler.clone(), format));
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    fn target_close_candidates(&self, valid_handlers: &[Arc<dyn crate::handler::Handler>], target: &Node) -> Vec<Node> {
        match self.mode {
            RoutingMode::Simple => valid_handlers
                .iter()
                .flat_map(|h| {
                    let h = h.clone();
                    h.supported_formats()
                        .into_iter()
                        .filter(|f| f.to && f.mime == target.format.mime)
                        .map(move |f| Node::new(h.clone(), f))
                        .collect::<Vec<_>>()
                })
                .collect(),
            RoutingMode::Advanced => {
                if valid_handlers.iter().any(|h| Arc::ptr_eq(h, &target.handler)) {
                    vec![target.clone()]
                } else {
                    vec![]
                }
            }
        }
    }
}
