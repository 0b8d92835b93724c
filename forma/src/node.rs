use std::sync::Arc;

use crate::format::Format;
use crate::handler::Handler;

/// Maximum number of nodes a chain may contain (5 hops).
pub const MAX_CHAIN_LEN: usize = 6;

// (handler, format). Two nodes from different handlers with the same mime
// are distinct, so equality checks the handler pointer too.
#[derive(Clone)]
pub struct Node {
    pub handler: Arc<dyn Handler>,
    pub format: Format,
}

impl Node {
    pub fn new(handler: Arc<dyn Handler>, format: Format) -> Self {
        Self { handler, format }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler) && self.format == other.format
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("handler", &self.handler.name())
            .field("format", &self.format.mime)
            .finish()
    }
}

pub type Chain = Vec<Node>;

/// A chain never revisits the same format, to keep the search from cycling.
pub fn chain_contains_format(chain: &[Node], format: &Format) -> bool {
    chain.iter().any(|n| &n.format == format)
}
