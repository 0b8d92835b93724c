use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::node::{Chain, Node};
use crate::registry::FormatRegistry;
use crate::search::RoutingMode;

/// One serialized chain link: enough to relocate a live [`Node`] in a
/// (possibly rebuilt) registry without pinning any in-memory identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNode {
    pub handler_name: String,
    pub format_mime: String,
    pub format_format: String,
}

impl StoredNode {
    fn from_node(node: &Node) -> Self {
        Self {
            handler_name: node.handler.name().to_owned(),
            format_mime: node.format.mime.clone(),
            format_format: node.format.format.clone(),
        }
    }
}

/// Persistent mapping from `(inputMime, outputMime[, outputHandler]) ->
/// chain` so repeat conversions can skip the BFS entirely.
///
/// Corrupt JSON on load is treated as an empty store, same policy as the
/// format cache.
#[derive(Default)]
pub struct PathStore {
    entries: HashMap<String, Vec<StoredNode>>,
}

impl PathStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => Self { entries },
                Err(err) => {
                    warn!("path store at {} is corrupt ({err}), starting empty", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                warn!("could not read path store at {} ({err}), starting empty", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating path store directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries).context("serializing path store")?;
        std::fs::write(path, json).with_context(|| format!("writing path store to {}", path.display()))
    }

    /// Build the lookup key for `(inputMime, outputMime[, outputHandler])`.
    /// Advanced mode differentiates by the handler that must produce the
    /// final mime, since two handlers claiming the same output mime may
    /// produce subtly different bytes.
    pub fn make_key(input_mime: &str, output_mime: &str, mode: RoutingMode, output_handler: Option<&str>) -> String {
        match mode {
            RoutingMode::Simple => format!("{input_mime}\u{2192}{output_mime}"),
            RoutingMode::Advanced => {
                let handler = output_handler.expect("advanced-mode keys require an output handler name");
                format!("{input_mime}\u{2192}{output_mime}:{handler}")
            }
        }
    }

    /// Reconstruct a live chain from the current registry. Returns `None`
    /// if any stored node can no longer be resolved (handler removed,
    /// format dropped, etc.), in which case the caller should `evict` and
    /// fall through to a fresh search.
    pub fn recall(&self, key: &str, registry: &FormatRegistry) -> Option<Chain> {
        let stored = self.entries.get(key)?;
        let mut chain = Vec::with_capacity(stored.len());
        for node in stored {
            let resolved = registry.find_option(&node.handler_name, &node.format_mime, &node.format_format)?;
            chain.push(resolved);
        }
        Some(chain)
    }

    pub fn store(&mut self, key: String, chain: &Chain) {
        let stored = chain.iter().map(StoredNode::from_node).collect();
        self.entries.insert(key, stored);
    }

    pub fn evict(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
