use rtree3d::{geometries, Cuboid, Point, RTree};
use rtree3d_int_test::test_util::{
    assert_integrity, cleanup, create_star_test_context, create_test_context, random_point,
    run_test,
};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[test]
fn test_concurrent_readers_share_one_version() {
    run_test(
        create_test_context,
        |ctx| {
            let mut rng = ctx.rng();
            let tree: RTree<usize, Point> = ctx.tree();
            let tree = (0..2000).fold(tree, |tree, i| tree.add(i, random_point(&mut rng, 100.0)));

            let num_threads = 8;
            let barrier = Arc::new(Barrier::new(num_threads));
            let mut handles = vec![];

            for thread_id in 0..num_threads {
                let tree = tree.clone();
                let barrier = Arc::clone(&barrier);
                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let offset = thread_id as f64 * 10.0 - 40.0;
                    let region = geometries::cuboid(offset, -100.0, -100.0, offset + 10.0, 100.0, 100.0)
                        .unwrap();
                    (tree.entries().count(), tree.search(&region).count())
                }));
            }

            let mut in_regions = 0;
            for handle in handles {
                let (all, in_region) = handle.join().unwrap();
                assert_eq!(all, 2000);
                in_regions += in_region;
            }
            assert!(in_regions > 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_versions_diverge_per_thread() {
    run_test(
        create_star_test_context,
        |ctx| {
            let base: RTree<String, Cuboid> = ctx.tree();
            let base = (0..100).fold(base, |tree, i| {
                let x = f64::from(i);
                tree.add(format!("base_{}", i), geometries::cuboid(x, 0.0, 0.0, x + 1.0, 1.0, 1.0).unwrap())
            });

            let num_threads = 5;
            let inserts_per_thread = 200;
            let barrier = Arc::new(Barrier::new(num_threads));
            let results = Arc::new(Mutex::new(Vec::new()));
            let mut handles = vec![];

            for thread_id in 0..num_threads {
                let base = base.clone();
                let barrier = Arc::clone(&barrier);
                let results = Arc::clone(&results);
                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let mut tree = base.delete_value(
                        format!("base_{}", thread_id),
                        geometries::cuboid(thread_id as f64, 0.0, 0.0, thread_id as f64 + 1.0, 1.0, 1.0)
                            .unwrap(),
                        false,
                    );
                    for i in 0..inserts_per_thread {
                        let y = 10.0 + thread_id as f64 * 10.0;
                        let x = i as f64;
                        tree = tree.add(
                            format!("thread_{}_seq_{}", thread_id, i),
                            geometries::cuboid(x, y, 0.0, x + 0.5, y + 0.5, 0.5).unwrap(),
                        );
                    }
                    results.lock().unwrap().push((thread_id, tree));
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }

            // the shared base never changes
            assert_eq!(base.size(), 100);
            assert_integrity(&base);

            let results = results.lock().unwrap();
            assert_eq!(results.len(), num_threads);
            for (thread_id, tree) in results.iter() {
                assert_eq!(tree.size(), 100 - 1 + inserts_per_thread);
                assert_integrity(tree);
                let prefix = format!("thread_{}_", thread_id);
                let own = tree.entries().filter(|e| e.value().starts_with(&prefix)).count();
                assert_eq!(own, inserts_per_thread);
                let foreign = tree
                    .entries()
                    .filter(|e| e.value().starts_with("thread_") && !e.value().starts_with(&prefix))
                    .count();
                assert_eq!(foreign, 0);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cancel_search_from_another_thread() {
    run_test(
        create_test_context,
        |ctx| {
            let mut rng = ctx.rng();
            let tree: RTree<usize, Point> = ctx.tree();
            let tree = (0..1000).fold(tree, |tree, i| tree.add(i, random_point(&mut rng, 100.0)));

            let mut cursor = tree.entries();
            assert_eq!(cursor.next_batch(100).len(), 100);

            let handle = cursor.cancel_handle();
            thread::spawn(move || handle.cancel()).join().unwrap();

            assert!(cursor.is_cancelled());
            assert!(cursor.next_batch(100).is_empty());
            assert_eq!(cursor.emitted(), 100);
            Ok(())
        },
        cleanup,
    )
}
