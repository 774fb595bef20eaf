use std::time::{Duration, Instant};

/// Run `f`, logging how long it took under `name`.
pub fn timed<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let (result, elapsed) = measure(f);
    tracing::info!("{} ran in {:.2}s", name, elapsed.as_secs_f64());
    result
}

pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
