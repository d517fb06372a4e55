use rtree3d::{entry, geometries, Point, RTree, Sphere};
use rtree3d_int_test::test_util::{
    cleanup, create_star_test_context, create_test_context, random_point, run_test,
};

#[test]
fn test_nearest_matches_brute_force() {
    for before in [create_test_context, create_star_test_context] {
        run_test(
            before,
            |ctx| {
                let mut rng = ctx.rng();
                let points: Vec<Point> = (0..1500).map(|_| random_point(&mut rng, 100.0)).collect();
                let tree: RTree<usize, Point> = ctx.tree();
                let tree = tree.insert_all(points.iter().enumerate().map(|(i, p)| entry(i, *p)));

                for _ in 0..25 {
                    let query = random_point(&mut rng, 120.0);
                    let mut expected: Vec<f64> =
                        points.iter().map(|p| p.distance_to_point(&query)).collect();
                    expected.sort_by(f64::total_cmp);

                    let found: Vec<f64> = tree
                        .nearest_to_point(&query, f64::INFINITY, 15)
                        .map(|(_, d)| d)
                        .collect();
                    assert_eq!(found.len(), 15);
                    for (got, want) in found.iter().zip(&expected) {
                        assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
                    }
                }
                Ok(())
            },
            |ctx| cleanup(ctx),
        )
    }
}

#[test]
fn test_nearest_respects_max_distance() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<i32, Point> = ctx.tree();
            let tree = (-20..=20).fold(tree, |tree, i| {
                tree.add(i, geometries::point(f64::from(i), 0.0, 0.0))
            });
            let origin = geometries::point(0.0, 0.0, 0.0);

            let found: Vec<(i32, f64)> = tree
                .nearest_to_point(&origin, 2.0, 100)
                .map(|(e, d)| (*e.value(), d))
                .collect();
            assert_eq!(found.len(), 5);
            assert_eq!(found[0], (0, 0.0));
            assert!(found.windows(2).all(|w| w[0].1 <= w[1].1));
            assert!(found.iter().all(|(_, d)| *d <= 2.0));

            assert_eq!(tree.nearest_to_point(&origin, 0.5, 100).count(), 1);
            assert_eq!(tree.nearest_to_point(&origin, f64::INFINITY, 0).count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_nearest_spheres_use_surface_distance() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree: RTree<&str, Sphere> = ctx.tree();
            let tree = tree
                .add("big", geometries::sphere(10.0, 0.0, 0.0, 8.0)?)
                .add("small", geometries::sphere(4.0, 0.0, 0.0, 0.5)?);
            let origin = geometries::point(0.0, 0.0, 0.0);

            let found: Vec<(&str, f64)> = tree
                .nearest_to_point(&origin, f64::INFINITY, 2)
                .map(|(e, d)| (*e.value(), d))
                .collect();
            assert_eq!(found[0].0, "big");
            assert!((found[0].1 - 2.0).abs() < 1e-9);
            assert_eq!(found[1].0, "small");
            assert!((found[1].1 - 3.5).abs() < 1e-9);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
