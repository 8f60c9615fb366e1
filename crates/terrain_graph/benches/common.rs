use std::time::Duration;

use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

/// Square terrain edge lengths benchmarked by every group.
pub const SIZES: [usize; 4] = [64, 256, 512, 1024];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in grid cells for a `size` x `size` terrain.
pub fn cells_throughput(size: usize) -> Throughput {
    Throughput::Elements((size * size).max(1) as u64)
}
