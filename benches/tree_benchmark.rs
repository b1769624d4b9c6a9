use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use ironwood::Ironwood;
use rand::prelude::*;
use rbtree::RBTree;
use std::collections::BTreeSet;
use std::ops::Range;

const TREE_SIZE: usize = 100000;

fn bench_baseline_multi_insertions(data: Vec<usize>) {
    let mut tree = BTreeSet::new();

    for i in data {
        tree.insert(i);
    }
}

fn bench_rbtree_multi_insertions(data: Vec<usize>) {
    let mut tree = RBTree::new();

    for i in data {
        tree.insert(i, ());
    }
}

fn bench_multi_insertions(data: Vec<usize>) {
    let mut tree = Ironwood::new();

    for i in data {
        let _ = tree.insert(i);
    }
}

fn bench_multi_insertions_hint(data: Vec<usize>) {
    let mut tree = Ironwood::new();
    tree.reserve(data.len()).unwrap();

    for i in data {
        let _ = tree.insert(i);
    }
}

fn init_large_btree() -> BTreeSet<usize> {
    random_insertion_order().into_iter().collect()
}

fn init_large_ironwood_tree() -> Ironwood<usize> {
    let mut tree = Ironwood::new();

    for i in random_insertion_order() {
        let _ = tree.insert(i);
    }

    tree
}

fn random_insertion_order() -> Vec<usize> {
    let mut rng = rand::thread_rng();
    let mut indices: Vec<usize> = (0..TREE_SIZE).collect();

    indices.shuffle(&mut rng);

    indices
}

fn init_random_data(count: usize, range_opt: Option<Range<usize>>) -> Vec<usize> {
    let mut rng = rand::thread_rng();
    let range = range_opt.unwrap_or(0..TREE_SIZE);
    let range = rand::distributions::Uniform::new(range.start, range.end);

    (0..count).map(|_| rng.sample(&range)).collect()
}

fn bench_baseline_random_deletions(mut tree: BTreeSet<usize>, indices: Vec<usize>) {
    for idx in indices {
        tree.remove(&idx);
    }
}

fn bench_random_deletions(mut tree: Ironwood<usize>, indices: Vec<usize>) {
    for idx in indices {
        let _ = tree.delete(&idx);
    }
}

fn bench_baseline_random_lookups(tree: BTreeSet<usize>, indices: Vec<usize>) {
    for idx in indices {
        assert!(tree.contains(&idx));
    }
}

fn bench_random_lookups(tree: Ironwood<usize>, indices: Vec<usize>) {
    for idx in indices {
        assert!(tree.contains(&idx));
    }
}

fn inorder_iteration_btree(tree: BTreeSet<usize>) {
    for (i, &elem) in tree.iter().enumerate() {
        assert_eq!(i, elem);
    }
}

fn inorder_iteration(tree: Ironwood<usize>) {
    for (i, &elem) in tree.iter().enumerate() {
        assert_eq!(i, elem);
    }
}

mod insert_delete {
    use super::*;

    pub fn bench_insert_delete(mut tree: Ironwood<usize>, insertions: &[usize], deletions: &[usize]) {
        for idx in deletions {
            let _ = tree.delete(idx);
        }
        for &idx in insertions {
            let _ = tree.insert(idx);
        }
    }

    pub fn bench_baseline_insert_delete(
        mut tree: BTreeSet<usize>,
        insertions: &[usize],
        deletions: &[usize],
    ) {
        for idx in deletions {
            tree.remove(idx);
        }
        for &idx in insertions {
            tree.insert(idx);
        }
    }
}

fn ironwood_tree_benchmark(c: &mut Criterion) {
    c.bench_function("baseline tree insert delete", |b| {
        b.iter_batched(
            || {
                (
                    init_large_btree(),
                    init_random_data(2000, Some(100000..300000)),
                    init_random_data(2000, Some(0..100000)),
                )
            },
            |(tree, holes, to_insert)| {
                insert_delete::bench_baseline_insert_delete(tree, &holes, &to_insert)
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("tree insert delete", |b| {
        b.iter_batched(
            || {
                (
                    init_large_ironwood_tree(),
                    init_random_data(2000, Some(100000..300000)),
                    init_random_data(2000, Some(0..100000)),
                )
            },
            |(tree, holes, to_insert)| insert_delete::bench_insert_delete(tree, &holes, &to_insert),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("baseline tree 100K insertions", |b| {
        b.iter_batched(
            random_insertion_order,
            bench_baseline_multi_insertions,
            BatchSize::LargeInput,
        )
    });

    c.bench_function("rbtree crate 100K insertions", |b| {
        b.iter_batched(
            random_insertion_order,
            bench_rbtree_multi_insertions,
            BatchSize::LargeInput,
        )
    });

    c.bench_function("tree 100K insertions", |b| {
        b.iter_batched(
            random_insertion_order,
            bench_multi_insertions,
            BatchSize::LargeInput,
        )
    });

    c.bench_function("tree 100K insertions with size hint", |b| {
        b.iter_batched(
            random_insertion_order,
            bench_multi_insertions_hint,
            BatchSize::LargeInput,
        )
    });

    c.bench_function("baseline tree random lookups", |b| {
        b.iter_batched(
            || (init_large_btree(), init_random_data(5000, None)),
            |(tree, indices)| bench_baseline_random_lookups(tree, indices),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("tree random lookups", |b| {
        b.iter_batched(
            || (init_large_ironwood_tree(), init_random_data(5000, None)),
            |(tree, indices)| bench_random_lookups(tree, indices),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("baseline tree random deletions", |b| {
        b.iter_batched(
            || (init_large_btree(), init_random_data(5000, None)),
            |(tree, indices)| bench_baseline_random_deletions(tree, indices),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("tree random deletions", |b| {
        b.iter_batched(
            || (init_large_ironwood_tree(), init_random_data(5000, None)),
            |(tree, indices)| bench_random_deletions(tree, indices),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("tree inorder iteration", |b| {
        b.iter_batched(
            init_large_ironwood_tree,
            inorder_iteration,
            BatchSize::LargeInput,
        )
    });

    c.bench_function("baseline tree inorder iteration", |b| {
        b.iter_batched(
            init_large_btree,
            inorder_iteration_btree,
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, ironwood_tree_benchmark);
criterion_main!(benches);
