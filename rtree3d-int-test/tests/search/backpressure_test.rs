use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rtree3d::condition;
use rtree3d::{entry, geometries, Cuboid, Entry, Geometry, RTree, SearchCursor};
use rtree3d_int_test::test_util::{cleanup, create_star_test_context, create_test_context, run_test};

fn numbered(n: u32) -> Entry<u32, Cuboid> {
    let x = f64::from(n);
    entry(n, geometries::cuboid(x, x, 0.0, x + 1.0, x + 1.0, 0.0).unwrap())
}

fn one_at_a_time(cursor: &mut SearchCursor<u32, Cuboid>) -> Vec<Entry<u32, Cuboid>> {
    let mut found = Vec::new();
    while cursor.request(1, |e| found.push(e)) == 1 {
        assert_eq!(cursor.request(0, |_| panic!("request(0) emitted")), 0);
    }
    found
}

#[test]
fn test_full_root_leaf_one_at_a_time() {
    run_test(
        || create_star_test_context(),
        |_ctx| {
            let tree: RTree<u32, Cuboid> = RTree::star().max_children(4).create()?;
            let list = vec![numbered(1); 4];
            let tree = tree.insert_all(list.clone());
            assert_eq!(tree.depth(), 1);
            assert_eq!(one_at_a_time(&mut tree.entries()), list);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_full_non_root_nodes_one_at_a_time() {
    run_test(
        || create_star_test_context(),
        |_ctx| {
            let tree: RTree<u32, Cuboid> = RTree::star().max_children(4).create()?;
            let tree = tree.insert_all(vec![numbered(1); 17]);
            assert_eq!(one_at_a_time(&mut tree.entries()).len(), 17);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_condition_rejecting_internal_nodes() {
    run_test(
        || create_star_test_context(),
        |_ctx| {
            let tree: RTree<u32, Cuboid> = RTree::star().max_children(4).create()?;
            let mut list = vec![numbered(1); 17];
            list.push(numbered(2));
            let tree = tree.insert_all(list);

            let visited = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&visited);
            let only_two = condition::from_fn(move |g: &dyn Geometry| {
                counter.fetch_add(1, Ordering::Relaxed);
                g.mbc().x2() > 2.0
            });
            assert_eq!(one_at_a_time(&mut tree.search_with(only_two)), vec![numbered(2)]);
            // pruned subtrees are never opened
            assert!(visited.load(Ordering::Relaxed) < 18);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_exact_batches_without_duplicates() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<u32, Cuboid> = ctx.tree().insert_all((0..1000).map(numbered));
            let region = geometries::cuboid(100.0, 100.0, 0.0, 599.0, 599.0, 0.0)?;
            let total = tree.search(&region).count();
            assert_eq!(total, 501);

            let mut cursor = tree.search(&region);
            let mut seen = HashSet::new();
            let mut requested = 0;
            let mut n = 0;
            while !cursor.is_finished() {
                n += 1;
                let emitted = cursor.request(n, |e| {
                    assert!(seen.insert(*e.value()));
                });
                assert_eq!(emitted, n.min(total - requested));
                requested += emitted;
            }
            assert_eq!(seen.len(), total);
            assert_eq!(cursor.emitted(), total);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_cancel_mid_traversal() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<u32, Cuboid> = ctx.tree().insert_all((0..200).map(numbered));
            let mut cursor = tree.entries();
            let handle = cursor.cancel_handle();

            let mut seen = 0;
            let emitted = cursor.request(100, |_| {
                seen += 1;
                if seen == 10 {
                    handle.cancel();
                }
            });
            assert_eq!(emitted, 10);
            assert!(cursor.is_cancelled());
            assert_eq!(cursor.request(100, |_| panic!("cancelled cursor emitted")), 0);
            cursor.cancel();
            assert_eq!(cursor.next(), None);

            // the tree itself is untouched
            assert_eq!(tree.entries().count(), 200);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unbounded_match_stays_shallow() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<u32, Cuboid> = ctx.tree().insert_all((0..5000).map(numbered));
            let depth = tree.depth();
            let mut cursor = tree.entries();
            let mut total = 0;
            loop {
                let batch = cursor.next_batch(64);
                if batch.is_empty() {
                    break;
                }
                assert!(cursor.frames() <= depth);
                total += batch.len();
            }
            assert_eq!(total, 5000);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
