use std::time::Instant;

use crate::config::RouterConfig;
use crate::executor::AttemptExecutor;
use crate::handler::FileData;
use crate::node::{Chain, Node};
use crate::progress::ProgressObserver;
use crate::registry::FormatRegistry;
use crate::search::{PathSearcher, RoutingMode, SearchOutcome};
use crate::store::PathStore;

/// Result of a top-level [`Router::convert`] call.
pub enum ConversionOutcome {
    Success { files: Vec<FileData>, chain: Chain },
    Partial { files: Vec<FileData>, chain: Chain },
    Timeout,
    NoRoute,
}

/// Orchestrates the fast-path short-circuit, the path-store lookup, and
/// falling through to a fresh search, all as one entry point.
pub struct Router {
    registry: FormatRegistry,
    store: PathStore,
    config: RouterConfig,
}

impl Router {
    pub fn new(registry: FormatRegistry, store: PathStore, config: RouterConfig) -> Self {
        Self { registry, store, config }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Convert `files` from `input` to `target`. `mode` governs whether
    /// the target-close phase accepts any handler producing the target
    /// mime (`Simple`) or only the handler named by `target` (`Advanced`).
    pub fn convert(
        &mut self,
        files: &[FileData],
        input: &Node,
        target: &Node,
        mode: RoutingMode,
        progress: &dyn ProgressObserver,
    ) -> ConversionOutcome {
        // Fast-path short-circuit: identical mime, no chain at all.
        if input.format.mime == target.format.mime {
            log::info!("passthrough: input and target share mime '{}'", input.format.mime);
            return ConversionOutcome::Success {
                files: files.to_vec(),
                chain: vec![input.clone()],
            };
        }

        let output_handler = matches!(mode, RoutingMode::Advanced).then(|| target.handler.name());
        let key = PathStore::make_key(&input.format.mime, &target.format.mime, mode, output_handler);

        if let Some(chain) = self.store.recall(&key, &self.registry) {
            let mut executor = AttemptExecutor::new();
            if let Some(result) = executor.attempt(files, &chain, progress) {
                log::debug!("path store hit for '{key}', replayed {} hop(s)", chain.len().saturating_sub(1));
                return ConversionOutcome::Success { files: result, chain };
            }
            log::debug!("stale path for '{key}', evicting and re-searching");
            self.store.evict(&key);
        }

        let searcher = PathSearcher::new(&self.registry, mode);
        let deadline = Instant::now() + self.config.search_timeout;
        let outcome = searcher.find_path(files, input, target, deadline, progress);

        match outcome {
            SearchOutcome::Success { files, chain } => {
                log::info!("found chain of {} hop(s) for '{key}'", chain.len().saturating_sub(1));
                self.store.store(key, &chain);
                ConversionOutcome::Success { files, chain }
            }
            SearchOutcome::Partial { files, chain } => {
                log::warn!("search for '{key}' timed out with a partial result ({} hop(s))", chain.len().saturating_sub(1));
                self.store.store(key, &chain);
                ConversionOutcome::Partial { files, chain }
            }
            SearchOutcome::Timeout => {
                log::warn!("search for '{key}' timed out with no executed hop");
                ConversionOutcome::Timeout
            }
            SearchOutcome::NoRoute => {
                log::info!("no route found for '{key}'");
                ConversionOutcome::NoRoute
            }
        }
    }

    /// Persist the path store to its configured location. Format-cache
    /// persistence happens at registry-build time, not here (the cache is
    /// consumed while building the registry and doesn't outlive that).
    pub fn persist(&self) -> anyhow::Result<()> {
        self.store.save(&self.config.path_store_path)
    }
}
