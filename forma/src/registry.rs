use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::format::Format;
use crate::handler::Handler;
use crate::node::Node;

/// Persistent cache of `handler name -> declared formats`, so that a
/// handler whose formats are already known doesn't need to pay its
/// (possibly expensive, e.g. WebAssembly-loading) `init()` cost again at
/// registry construction time. Serialized as a JSON array of
/// `[handlerName, Format[]]` pairs.
#[derive(Default)]
pub struct FormatCache {
    entries: HashMap<String, Vec<Format>>,
}

#[derive(Serialize, Deserialize)]
struct CacheEntry(String, Vec<Format>);

impl FormatCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from `path`. An absent file is tolerated (empty cache, with a
    /// warning); corrupt JSON is likewise treated as an empty cache rather
    /// than a hard failure, since the cache is purely an optimization.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<CacheEntry>>(&contents) {
                Ok(entries) => Self {
                    entries: entries.into_iter().map(|CacheEntry(k, v)| (k, v)).collect(),
                },
                Err(err) => {
                    warn!("format cache at {} is corrupt ({err}), starting empty", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("no format cache at {}, starting empty", path.display());
                Self::default()
            }
            Err(err) => {
                warn!("could not read format cache at {} ({err}), starting empty", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating format cache directory {}", parent.display()))?;
        }
        let entries: Vec<CacheEntry> = self
            .entries
            .iter()
            .map(|(k, v)| CacheEntry(k.clone(), v.clone()))
            .collect();
        let json = serde_json::to_string_pretty(&entries).context("serializing format cache")?;
        std::fs::write(path, json).with_context(|| format!("writing format cache to {}", path.display()))
    }

    fn get(&self, handler_name: &str) -> Option<&Vec<Format>> {
        self.entries.get(handler_name)
    }

    fn put(&mut self, handler_name: &str, formats: Vec<Format>) {
        self.entries.insert(handler_name.to_owned(), formats);
    }
}

/// The canonical `(handler, format)` option pool plus the derived indices
/// the searcher needs for neighbour expansion.
pub struct FormatRegistry {
    options: Vec<Node>,
    by_from_mime: HashMap<String, Vec<Arc<dyn Handler>>>,
    any_input_writers: Vec<Node>,
}

impl FormatRegistry {
    pub fn options(&self) -> &[Node] {
        &self.options
    }

    /// Handlers that declare a `from`-enabled format with this MIME,
    /// in stable registration order.
    pub fn by_from_mime(&self, mime: &str) -> &[Arc<dyn Handler>] {
        self.by_from_mime
            .get(mime)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// `(handler, format)` pairs where the handler accepts any input and
    /// the format is writable: the any-input fallback pool.
    pub fn any_input_writers(&self) -> &[Node] {
        &self.any_input_writers
    }

    /// All distinct mimes across every registered option, sorted; a
    /// convenience listing for a host UI or CLI.
    pub fn supported_mimes(&self) -> Vec<String> {
        self.options.iter().map(|n| n.format.mime.clone()).unique().sorted().collect()
    }

    /// Find a live option matching a handler name, format mime and format
    /// code, used by [`crate::store::PathStore::recall`] to reconstruct a
    /// chain from its serialized form against the current registry.
    pub fn find_option(&self, handler_name: &str, mime: &str, format_code: &str) -> Option<Node> {
        self.options
            .iter()
            .find(|n| n.handler.name() == handler_name && n.format.mime == mime && n.format.format == format_code)
            .cloned()
    }
}

/// Builds a [`FormatRegistry`] from a list of handlers and a (possibly
/// empty) persisted format cache.
pub struct FormatRegistryBuilder {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Default for FormatRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistryBuilder {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    pub fn register(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Construct the registry. `cache` is consulted first for each
    /// handler's formats; a handler is only `init()`-ed when its formats
    /// aren't already cached, and the cache is updated in place with
    /// whatever a freshly initialized handler reports.
    pub fn build(self, cache: &mut FormatCache) -> FormatRegistry {
        let mut options = Vec::new();
        let mut by_from_mime: HashMap<String, Vec<Arc<dyn Handler>>> = HashMap::new();
        let mut any_input_writers = Vec::new();

        for handler in self.handlers {
            let formats = match cache.get(handler.name()) {
                Some(cached) => cached.clone(),
                None => match handler.init() {
                    Ok(()) => {
                        let formats = handler.supported_formats();
                        cache.put(handler.name(), formats.clone());
                        formats
                    }
                    Err(err) => {
                        warn!("handler '{}' failed to init, skipping: {err:#}", handler.name());
                        continue;
                    }
                },
            };

            let mut from_mimes_seen = std::collections::HashSet::new();
            for format in &formats {
                if !format.has_mime() {
                    continue;
                }
                if format.from && from_mimes_seen.insert(format.mime.clone()) {
                    by_from_mime
                        .entry(format.mime.clone())
                        .or_default()
                        .push(handler.clone());
                }
                if !format.from && !format.to {
                    continue;
                }
                options.push(Node::new(handler.clone(), format.clone()));
                if handler.support_any_input() && format.to {
                    any_input_writers.push(Node::new(handler.clone(), format.clone()));
                }
            }
        }

        FormatRegistry {
            options,
            by_from_mime,
            any_input_writers,
        }
    }
}
