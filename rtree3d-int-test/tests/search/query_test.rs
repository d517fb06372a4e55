use rtree3d::condition;
use rtree3d::{entry, geometries, Cuboid, Geometry, RTree};
use rtree3d_int_test::test_util::{
    cleanup, create_star_test_context, create_test_context, random_cuboid, run_test,
};

#[test]
fn test_region_search_matches_scan() {
    for before in [create_test_context, create_star_test_context] {
        run_test(
            before,
            |ctx| {
                let mut rng = ctx.rng();
                let cuboids: Vec<Cuboid> = (0..1000)
                    .map(|_| random_cuboid(&mut rng, 300.0, 25.0))
                    .collect::<Result<_, _>>()?;
                let tree: RTree<usize, Cuboid> = ctx.tree();
                let tree = tree.insert_all(cuboids.iter().enumerate().map(|(i, c)| entry(i, *c)));

                for _ in 0..30 {
                    let region = random_cuboid(&mut rng, 300.0, 150.0)?;
                    let mut expected: Vec<usize> = cuboids
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| c.intersects(&region))
                        .map(|(i, _)| i)
                        .collect();
                    let mut found: Vec<usize> = tree.search(&region).map(|e| *e.value()).collect();
                    expected.sort_unstable();
                    found.sort_unstable();
                    assert_eq!(found, expected);

                    let max_distance = 20.0;
                    let expected = cuboids
                        .iter()
                        .filter(|c| c.distance(&region) < max_distance)
                        .count();
                    assert_eq!(tree.search_within(&region, max_distance).count(), expected);
                }
                Ok(())
            },
            |ctx| cleanup(ctx),
        )
    }
}

#[test]
fn test_point_and_sphere_queries() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<&str, Cuboid> = ctx.tree();
            let tree = tree
                .add("unit", geometries::cuboid(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)?)
                .add("slab", geometries::cuboid(-10.0, -10.0, 5.0, 10.0, 10.0, 6.0)?)
                .add("far", geometries::cuboid(50.0, 50.0, 50.0, 51.0, 51.0, 51.0)?);

            let inside: Vec<&str> = tree
                .search_point(&geometries::point(0.5, 0.5, 0.5))
                .map(|e| *e.value())
                .collect();
            assert_eq!(inside, vec!["unit"]);

            let mut near: Vec<&str> = tree
                .search_sphere(&geometries::sphere(0.0, 0.0, 3.0, 2.5)?)
                .map(|e| *e.value())
                .collect();
            near.sort_unstable();
            assert_eq!(near, vec!["slab", "unit"]);

            assert_eq!(tree.search_point(&geometries::point(20.0, 0.0, 0.0)).count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_custom_condition() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<u32, Cuboid> = ctx.tree();
            let tree = (0..100u32).fold(tree, |tree, i| {
                let z = f64::from(i);
                tree.add(i, geometries::cuboid(0.0, 0.0, z, 1.0, 1.0, z + 0.5).unwrap())
            });

            // holds for a node whenever it holds for something inside it
            let high = condition::from_fn(|g: &dyn Geometry| g.mbc().z2() >= 90.0);
            let mut found: Vec<u32> = tree.search_with(high).map(|e| *e.value()).collect();
            found.sort_unstable();
            assert_eq!(found, (90..100).collect::<Vec<_>>());

            assert_eq!(tree.search_with(condition::always()).count(), 100);
            assert_eq!(tree.mbc(), Some(geometries::cuboid(0.0, 0.0, 0.0, 1.0, 1.0, 99.5)?));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_cuboid_distance_is_symmetric() {
    run_test(
        || create_test_context(),
        |ctx| {
            let mut rng = ctx.rng();
            for _ in 0..500 {
                let a = random_cuboid(&mut rng, 50.0, 10.0)?;
                let b = random_cuboid(&mut rng, 50.0, 10.0)?;
                assert_eq!(a.distance(&b), b.distance(&a));
                assert_eq!(a.distance(&b) == 0.0, a.intersects(&b));
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
