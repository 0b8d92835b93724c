mod common;

use std::time::{Duration, Instant};

use common::{format, DeadEndHandler, TestHandler};
use forma::{FileData, Node, NoopProgress, PathSearcher, SearchOutcome};

/// A candidate chain executes one hop successfully, but the next hop
/// always fails, and by the time that failure is discovered the deadline
/// has already passed. The next BFS iteration's deadline check (never a
/// mid-convert check) is what turns the cached first hop into a partial
/// result.
#[test]
fn deadline_expiry_surfaces_the_last_successful_prefix() {
    let a = format("Alpha", "a", "app/a", "a").readable();
    let b_out = format("Beta", "b", "app/b", "b").writable();
    let b_in = format("Beta", "b", "app/b", "b").readable();
    let c = format("Gamma", "c", "app/c", "c").writable();

    let slow = TestHandler::new("slow", vec![a.clone(), b_out.clone()])
        .sleeping(Duration::from_millis(20))
        .arc();
    let dead_end = DeadEndHandler::new("dead_end", vec![b_in.clone(), c.clone()]);

    let mut cache = forma::FormatCache::empty();
    let mut builder = forma::FormatRegistryBuilder::new();
    builder.register(slow.clone());
    builder.register(dead_end.clone());
    let registry = builder.build(&mut cache);

    let input = Node::new(slow.clone(), a.clone());
    let target = Node::new(dead_end.clone(), c.clone());

    let searcher = PathSearcher::new(&registry, forma::RoutingMode::Simple);
    let deadline = Instant::now() + Duration::from_millis(2);
    let files = vec![FileData::new("in.a", vec![3, 3, 3])];
    let outcome = searcher.find_path(&files, &input, &target, deadline, &NoopProgress);

    match outcome {
        SearchOutcome::Partial { chain, .. } => {
            assert_eq!(chain.len(), 2, "only the first hop had executed before the deadline hit");
            assert_eq!(chain[1].handler.name(), "slow");
        }
        SearchOutcome::Timeout => panic!("expected a partial result, not a bare timeout (the first hop should have cached)"),
        _ => panic!("expected the search to time out with a partial result"),
    }
    assert_eq!(slow.calls(), 1);
}
