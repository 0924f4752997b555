use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use story_ranker::ChainRanker;
use story_ranker::domain::{Snapshot, Story};

/// `roots` independent threads, each `depth` replies deep.
fn make_snapshot(roots: usize, depth: usize) -> Snapshot {
    let mut stories = Vec::with_capacity(roots * depth);
    for r in 0..roots {
        for d in 0..depth {
            let id = format!("r{r:05}d{d:03}");
            let parent = (d > 0).then(|| format!("r{r:05}d{:03}", d - 1));
            let votes = if d % 3 == 0 {
                vec!["upvote", "upvote", "downvote"]
            } else {
                vec!["upvote"]
            };
            stories.push(
                Story::new(id, parent.as_deref())
                    .with_votes(votes)
                    .with_text("chain", "text"),
            );
        }
    }
    Snapshot::from_stories(stories).expect("unique ids")
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let ranker = ChainRanker::default();

    for (roots, depth) in [(1000, 1), (100, 10), (10, 100)] {
        let snapshot = make_snapshot(roots, depth);
        group.bench_with_input(
            BenchmarkId::new("roots_x_depth", format!("{roots}x{depth}")),
            &snapshot,
            |b, snapshot| b.iter(|| ranker.rank(black_box(snapshot)).expect("acyclic")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
