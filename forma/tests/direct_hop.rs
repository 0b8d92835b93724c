mod common;

use std::time::Duration;

use common::{format, TestHandler};
use forma::{ConversionOutcome, FileData, FormatCache, FormatRegistryBuilder, Node, NoopProgress, PathStore, Router, RouterConfig, RoutingMode};

fn test_config() -> RouterConfig {
    RouterConfig {
        search_timeout: Duration::from_secs(1),
        format_cache_path: std::env::temp_dir().join("forma-direct-hop-format-cache.json"),
        path_store_path: std::env::temp_dir().join("forma-direct-hop-path-store.json"),
    }
}

/// A single handler declares both ends of the conversion, so the chain
/// is exactly `[input, target]`.
#[test]
fn single_handler_direct_hop() {
    let a = format("Alpha", "a", "app/a", "a").readable();
    let b = format("Beta", "b", "app/b", "b").writable();
    let handler = TestHandler::new("converter", vec![a.clone(), b.clone()]).arc();

    let mut cache = FormatCache::empty();
    let mut builder = FormatRegistryBuilder::new();
    builder.register(handler.clone());
    let registry = builder.build(&mut cache);

    let input = Node::new(handler.clone(), a.clone());
    let target = Node::new(handler.clone(), b.clone());

    let mut router = Router::new(registry, PathStore::empty(), test_config());
    let files = vec![FileData::new("in.a", vec![1, 2, 3, 4])];
    let outcome = router.convert(&files, &input, &target, RoutingMode::Simple, &NoopProgress);

    match outcome {
        ConversionOutcome::Success { files: out, chain } => {
            assert_eq!(chain.len(), 2, "direct hop chain is input + one hop");
            assert_eq!(out[0].name, "in.a.b");
        }
        _ => panic!("expected a direct-hop success"),
    }
    assert_eq!(handler.calls(), 1);
}
