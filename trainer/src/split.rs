use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle with a seeded RNG and split off `ceil(len * test_fraction)` holdout items.
/// At least one item stays in the training half whenever `samples` is non-empty.
pub fn train_test_split<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    let holdout = ((total as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let holdout = holdout.min(total.saturating_sub(1));
    let test = samples.split_off(total - holdout);

    tracing::info!(train = samples.len(), holdout = test.len(), seed, "dataset split");
    (samples, test)
}
