mod common;

use std::time::Duration;

use common::{format, TestHandler};
use forma::{ConversionOutcome, FileData, FormatCache, FormatRegistryBuilder, Node, NoopProgress, PathStore, Router, RouterConfig, RoutingMode};

fn test_config() -> RouterConfig {
    RouterConfig {
        search_timeout: Duration::from_secs(1),
        format_cache_path: std::env::temp_dir().join("forma-identity-format-cache.json"),
        path_store_path: std::env::temp_dir().join("forma-identity-path-store.json"),
    }
}

/// Input and output share a mime, so the fast path passes the bytes
/// through and no handler is ever invoked.
#[test]
fn identity_conversion_invokes_no_handler() {
    let png = format("PNG image", "png", "image/png", "png").readable().writable();
    let handler = TestHandler::new("picture", vec![png.clone()]).arc();

    let mut cache = FormatCache::empty();
    let mut builder = FormatRegistryBuilder::new();
    builder.register(handler.clone());
    let registry = builder.build(&mut cache);

    let input = Node::new(handler.clone(), png.clone());
    let target = Node::new(handler.clone(), png.clone());

    let mut router = Router::new(registry, PathStore::empty(), test_config());
    let files = vec![FileData::new("in.png", vec![1, 2, 3])];
    let outcome = router.convert(&files, &input, &target, RoutingMode::Simple, &NoopProgress);

    match outcome {
        ConversionOutcome::Success { files: out, chain } => {
            assert_eq!(out, files, "passthrough must return bytes unchanged");
            assert_eq!(chain.len(), 1, "passthrough chain is just the input node");
        }
        _ => panic!("expected a passthrough success"),
    }
    assert_eq!(handler.calls(), 0, "identity conversion must not invoke any handler");
}
