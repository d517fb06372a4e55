use rtree3d::{geometries, SpatialResult};
use rtree3d_int_test::test_util::{assert_integrity, create_star_test_context, random_point};

fn main() -> SpatialResult<()> {
    colog::init();
    println!("Starting stress test...");
    let ctx = create_star_test_context()?;
    let mut rng = ctx.rng();

    let count = 200_000;
    let points: Vec<_> = (0..count).map(|_| random_point(&mut rng, 1000.0)).collect();

    let start = std::time::Instant::now();
    let mut tree = ctx.tree();
    for (i, point) in points.iter().enumerate() {
        tree = tree.add(i, *point);
    }
    println!("Inserted {} points in {:?}, depth {}", count, start.elapsed(), tree.depth());

    let start = std::time::Instant::now();
    let region = geometries::cuboid(-100.0, -100.0, -100.0, 100.0, 100.0, 100.0)?;
    let found = tree.search(&region).count();
    println!("Found {} points in the centre region in {:?}", found, start.elapsed());

    let start = std::time::Instant::now();
    let mut cursor = tree.entries();
    let mut batches = 0;
    while !cursor.next_batch(1000).is_empty() {
        batches += 1;
    }
    println!("Walked {} batches of entries in {:?}", batches, start.elapsed());

    let start = std::time::Instant::now();
    let origin = geometries::point(0.0, 0.0, 0.0);
    let nearest = tree.nearest_to_point(&origin, f64::INFINITY, 100).count();
    println!("Found {} nearest points in {:?}", nearest, start.elapsed());

    let start = std::time::Instant::now();
    for (i, point) in points.iter().enumerate().step_by(2) {
        tree = tree.delete_value(i, *point, false);
    }
    println!("Deleted half the points in {:?}, {} left", start.elapsed(), tree.size());

    let start = std::time::Instant::now();
    assert_integrity(&tree);
    println!("Checked integrity in {:?}: {:?}", start.elapsed(), tree.stats());

    Ok(())
}
