use rtree3d::{entry, geometries, Cuboid, Entry, LeafNode, Node, Point, RTree};
use rtree3d_int_test::test_util::{
    assert_integrity, cleanup, create_star_test_context, create_test_context, random_cuboid,
    random_point, run_test,
};

fn numbered(n: u32) -> Entry<u32, Cuboid> {
    let x = f64::from(n);
    entry(n, geometries::cuboid(x, x, 0.0, x + 1.0, x + 1.0, 0.0).unwrap())
}

#[test]
fn test_insert_into_empty_tree() {
    run_test(
        || create_test_context(),
        |ctx| {
            let empty: RTree<u32, Cuboid> = ctx.tree();
            let tree = empty.insert(numbered(1));

            assert_eq!(tree.size(), 1);
            assert_eq!(tree.depth(), 1);
            assert!(tree.root().unwrap().is_leaf());
            assert_eq!(tree.mbc(), Some(*numbered(1).geometry()));
            assert!(empty.is_empty());
            assert_integrity(&tree);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_three_cuboids_fit_in_one_leaf() {
    run_test(
        || create_test_context(),
        |_ctx| {
            let tree: RTree<u32, Cuboid> = RTree::builder().max_children(3).create()?;
            let tree = tree
                .add(1, geometries::cuboid(1.0, 1.0, 0.0, 2.0, 2.0, 0.0)?)
                .add(2, geometries::cuboid(3.0, 3.0, 0.0, 4.0, 4.0, 0.0)?)
                .add(3, geometries::cuboid(5.0, 5.0, 0.0, 6.0, 6.0, 0.0)?);

            assert!(tree.root().unwrap().is_leaf());
            let region = geometries::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 0.0)?;
            assert_eq!(tree.search(&region).count(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_seventeen_identical_entries() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<u32, Cuboid> = ctx.tree();
            let tree = tree.insert_all(vec![numbered(1); 17]);

            assert!(tree.depth() >= 2);
            assert!(!tree.root().unwrap().is_leaf());
            assert_eq!(tree.entries().count(), 17);
            assert_integrity(&tree);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_random_inserts_keep_invariants() {
    for before in [create_test_context, create_star_test_context] {
        run_test(
            before,
            |ctx| {
                let mut rng = ctx.rng();
                let mut tree: RTree<usize, Cuboid> = ctx.tree();
                for i in 0..2000 {
                    tree = tree.add(i, random_cuboid(&mut rng, 500.0, 20.0)?);
                    if i % 250 == 0 {
                        assert_integrity(&tree);
                    }
                }
                assert_eq!(tree.size(), 2000);
                assert_eq!(tree.stats().size, 2000);
                assert_integrity(&tree);
                Ok(())
            },
            |ctx| cleanup(ctx),
        )
    }
}

#[test]
fn test_inserted_entry_is_found_by_its_geometry() {
    run_test(
        || create_star_test_context(),
        |ctx| {
            let mut rng = ctx.rng();
            let points: Vec<Point> = (0..500).map(|_| random_point(&mut rng, 100.0)).collect();
            let tree: RTree<usize, Point> = ctx.tree();
            let tree = tree.insert_all(points.iter().enumerate().map(|(i, p)| entry(i, *p)));

            for (i, point) in points.iter().enumerate() {
                assert!(tree.search_point(point).any(|found| *found.value() == i));
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_old_versions_are_unaffected() {
    run_test(
        || create_test_context(),
        |ctx| {
            let t1: RTree<u32, Cuboid> = ctx.tree().insert_all((0..10).map(numbered));
            let region = *numbered(5).geometry();
            let before: Vec<u32> = t1.search(&region).map(|e| *e.value()).collect();

            let t2 = t1.insert(numbered(5)).insert_all((20..60).map(numbered));
            let t3 = t2.delete(&numbered(5), true);

            let after: Vec<u32> = t1.search(&region).map(|e| *e.value()).collect();
            assert_eq!(before, after);
            assert_eq!(t1.size(), 10);
            assert_eq!(t2.size(), 51);
            assert_eq!(t3.size(), 49);
            assert_integrity(&t1);
            assert_integrity(&t2);
            assert_integrity(&t3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_invalid_arguments_are_rejected() {
    run_test(
        || create_test_context(),
        |_ctx| {
            let err = geometries::cuboid(2.0, 0.0, 0.0, 1.0, 1.0, 0.0).unwrap_err();
            assert!(err.is_invalid_argument());

            assert!(geometries::sphere(0.0, 0.0, 0.0, -1.0).is_err());
            assert!(LeafNode::<u32, Cuboid>::new(Vec::new()).is_err());
            assert!(Node::<u32, Cuboid>::internal(Vec::new()).is_err());

            let err = RTree::<u32, Cuboid>::builder()
                .max_children(4)
                .min_children(3)
                .create()
                .unwrap_err();
            assert!(err.is_invalid_argument());
            assert!(err.to_string().starts_with("Invalid argument"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
