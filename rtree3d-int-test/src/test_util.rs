use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtree3d::{
    geometries, Cuboid, Geometry, Point, RTree, RTreeBuilder, RTreeConfig, SpatialResult,
};
use std::backtrace::Backtrace;
use std::env;
use std::time::Instant;

/// Environment variable that pins the seed of every randomised test.
pub const SEED_VAR: &str = "RTREE3D_TEST_SEED";

/// Runs a test between its setup and teardown and reports failures with the
/// seed needed to reproduce them.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> SpatialResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> SpatialResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> SpatialResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();
    let mut seed = None;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => {
                seed = Some(ctx.seed());
                match test(ctx.clone()) {
                    Ok(_) => after(ctx)
                        .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                }
            }
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    }));

    let elapsed = start_time.elapsed();
    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    if let Some(seed) = seed {
        eprintln!("Reproduce with {}={}", SEED_VAR, seed);
    }
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed: {}", error);
}

#[derive(Clone, Debug)]
pub struct TestContext {
    seed: u64,
    config: RTreeConfig,
}

impl TestContext {
    pub fn new(seed: u64, config: RTreeConfig) -> Self {
        Self { seed, config }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// A fresh generator, identical for every call on the same context.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// An empty tree using the context's configuration.
    pub fn tree<V, G: Geometry>(&self) -> RTree<V, G> {
        RTree::empty(self.config.clone())
    }
}

pub fn test_seed() -> u64 {
    let seed = env::var(SEED_VAR)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(rand::random);
    log::info!("Using test seed {}", seed);
    seed
}

/// Context with the default configuration: 4 children, quadratic splits.
pub fn create_test_context() -> SpatialResult<TestContext> {
    let config = RTreeBuilder::<(), Cuboid>::new().config()?;
    Ok(TestContext::new(test_seed(), config))
}

/// Context with the R* preset and wider nodes.
pub fn create_star_test_context() -> SpatialResult<TestContext> {
    let config = RTreeBuilder::<(), Cuboid>::new()
        .star()
        .max_children(8)
        .config()?;
    Ok(TestContext::new(test_seed(), config))
}

pub fn cleanup(ctx: TestContext) -> SpatialResult<()> {
    log::debug!("Finished test with seed {}", ctx.seed());
    Ok(())
}

pub fn random_point(rng: &mut StdRng, extent: f64) -> Point {
    geometries::point(
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
    )
}

pub fn random_cuboid(rng: &mut StdRng, extent: f64, max_side: f64) -> SpatialResult<Cuboid> {
    let corner = random_point(rng, extent);
    geometries::cuboid(
        corner.x(),
        corner.y(),
        corner.z(),
        corner.x() + rng.random_range(0.0..max_side),
        corner.y() + rng.random_range(0.0..max_side),
        corner.z() + rng.random_range(0.0..max_side),
    )
}

/// Panics with every violation found if the tree is not well formed.
pub fn assert_integrity<V, G: Geometry>(tree: &RTree<V, G>) {
    let report = tree.check_integrity();
    assert!(
        report.is_valid,
        "integrity check failed after {} nodes: {:#?}",
        report.nodes_checked, report.errors
    );
}
