use log::{debug, error, warn};

use crate::handler::FileData;
use crate::node::{Chain, Node};
use crate::progress::ProgressObserver;

struct PrefixEntry {
    files: Vec<FileData>,
    node: Node,
}

/// Executes an ordered chain of handlers on a working file set, keeping a
/// forward-prefix cache so that candidates sharing a long common prefix
/// with the previously attempted chain don't re-run already-computed hops.
///
/// One executor is owned by a single [`crate::search::PathSearcher`] call
/// frame, so the prefix cache is never shared across unrelated searches.
pub struct AttemptExecutor {
    prefix_cache: Vec<PrefixEntry>,
    #[cfg(test)]
    convert_calls: usize,
}

impl Default for AttemptExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptExecutor {
    pub fn new() -> Self {
        Self {
            prefix_cache: Vec::new(),
            #[cfg(test)]
            convert_calls: 0,
        }
    }

    /// Realign the cache against `chain`, returning the length of the
    /// still-valid prefix. `prefix_cache[k]` corresponds to `chain[k + 1]`
    /// (index 0 of the chain is the input node, never executed).
    ///
    /// Deliberately preserves an off-by-one: on divergence at position
    /// `i`, the cache is truncated to `i - 1`, not `i`, discarding one
    /// entry more than strictly required. This is left as-is rather than
    /// silently corrected.
    fn realign(&mut self, chain: &Chain) -> usize {
        let mut common = 0;
        while common < self.prefix_cache.len()
            && common + 1 < chain.len()
            && self.prefix_cache[common].node == chain[common + 1]
        {
            common += 1;
        }
        if common < self.prefix_cache.len() {
            let truncate_to = common.saturating_sub(1);
            self.prefix_cache.truncate(truncate_to);
            truncate_to
        } else {
            common
        }
    }

    /// Try to execute `chain` starting from `files`. Returns `None` on any
    /// hop failure (handler init failure, thrown error, or an empty output
    /// file), which is an expected outcome rather than an exceptional one;
    /// the searcher simply moves on to the next candidate.
    pub fn attempt(
        &mut self,
        files: &[FileData],
        chain: &Chain,
        progress: &dyn ProgressObserver,
    ) -> Option<Vec<FileData>> {
        let p = self.realign(chain);
        let mut working: Vec<FileData> = if p > 0 {
            self.prefix_cache[p - 1].files.clone()
        } else {
            files.to_vec()
        };

        for i in p..chain.len().saturating_sub(1) {
            progress.on_step_start(chain, i);

            let next = &chain[i + 1];
            if !next.handler.ready() {
                if let Err(err) = next.handler.init() {
                    warn!("handler '{}' failed to init mid-chain: {err:#}", next.handler.name());
                    return None;
                }
            }

            let input_format = if next.handler.support_any_input() {
                chain[i].format.clone()
            } else {
                match next
                    .handler
                    .supported_formats()
                    .into_iter()
                    .find(|f| f.from && f.mime == chain[i].format.mime)
                {
                    Some(f) => f,
                    None => {
                        error!(
                            "chain invariant violated: '{}' has no from-entry for mime '{}'",
                            next.handler.name(),
                            chain[i].format.mime
                        );
                        return None;
                    }
                }
            };

            #[cfg(test)]
            {
                self.convert_calls += 1;
            }
            let produced = match next.handler.convert(&working, &input_format, &next.format) {
                Ok(files) => files,
                Err(err) => {
                    debug!("hop '{}' failed: {err:#}", next.handler.name());
                    return None;
                }
            };
            if produced.iter().any(FileData::is_empty) {
                debug!("hop '{}' produced an empty file, treating as failure", next.handler.name());
                return None;
            }

            working = produced;
            self.prefix_cache.push(PrefixEntry {
                files: working.clone(),
                node: next.clone(),
            });
        }

        Some(working)
    }

    /// The longest successfully-executed prefix remembered so far, used by
    /// the searcher to build a partial result on deadline expiry. `input`
    /// is prepended as the chain's root node.
    pub fn partial_result(&self, input: &Node) -> Option<(Vec<FileData>, Chain)> {
        let last = self.prefix_cache.last()?;
        let mut chain = vec![input.clone()];
        chain.extend(self.prefix_cache.iter().map(|e| e.node.clone()));
        Some((last.files.clone(), chain))
    }

    /// Number of `convert` calls this executor has actually issued across
    /// every `attempt()` call so far, exposed for tests verifying the
    /// warm-cache and prefix-sharing properties.
    #[cfg(test)]
    pub fn convert_calls(&self) -> usize {
        self.convert_calls
    }
}
