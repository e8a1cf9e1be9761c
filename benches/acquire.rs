use std::fmt::Display;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const ITERATIONS: usize = 1 << 12;

type Pool = lendpool::Pool<usize>;

#[derive(Copy, Clone, Debug)]
struct Config {
    pool_size: usize,
    workers: usize,
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w{}s{}", self.workers, self.pool_size)
    }
}

impl Config {
    fn operations_per_worker(&self) -> usize {
        ITERATIONS / self.workers
    }

    async fn run(self, pool: Pool) {
        for _ in 0..self.operations_per_worker() {
            if let Some(resource) = pool.acquire().await {
                pool.release(&resource).await;
            }
        }
    }
}

#[rustfmt::skip]
const CONFIGS: &[Config] = &[
    // 8 workers
    Config { workers:  8, pool_size:  2 },
    Config { workers:  8, pool_size:  8 },
    // 16 workers
    Config { workers: 16, pool_size:  4 },
    Config { workers: 16, pool_size: 16 },
    // 32 workers
    Config { workers: 32, pool_size:  8 },
    Config { workers: 32, pool_size: 32 },
];

fn bench_acquire(cfg: Config) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .unwrap();

    runtime.block_on(async {
        let pool = Pool::new();
        for resource in 0..cfg.pool_size {
            let _ = pool.add(resource).await;
        }
        pool.open();

        let workers: Vec<_> = (0..cfg.workers)
            .map(|_| tokio::spawn(cfg.run(pool.clone())))
            .collect();
        for worker in workers {
            worker.await.unwrap();
        }
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire");
    for &config in CONFIGS {
        group.bench_function(BenchmarkId::new("acquire_release", config), |b| {
            b.iter(|| bench_acquire(config))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
