/*!
 * Random Workload
 *
 * Drives every allocator strategy and every cache policy with the same
 * seeded random workload and reports averaged metrics across several runs.
 * Reimplements the random-test harnesses the core's original prototype used
 * to compare strategies, now over [`memsim::AllocatorKind`] and
 * [`memsim::CacheHierarchy`].
 */

use memsim::allocator::list::FitStrategy;
use memsim::{Allocator, AllocatorKind, CacheHierarchy, CachePolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MEMORY_SIZE: usize = 1024;
const OPERATIONS: usize = 1000;
const RUNS: usize = 10;
const MAX_ALLOC_SIZE: usize = 64;
const MAX_ADDRESS: usize = 1024;
const SEED: u64 = 42;

fn run_list(rng: &mut StdRng, name: &str, strategy: FitStrategy) {
    let (mut frag, mut util, mut fail) = (0.0, 0.0, 0.0);

    for _ in 0..RUNS {
        let mut alloc = AllocatorKind::list(MEMORY_SIZE, strategy);
        let mut active: Vec<i64> = Vec::new();

        for _ in 0..OPERATIONS {
            if active.is_empty() || rng.gen_range(0..100) < 70 {
                let size = rng.gen_range(0..MAX_ALLOC_SIZE) + 1;
                let id = alloc.malloc(size);
                if id >= 0 {
                    active.push(id);
                }
            } else {
                let idx = rng.gen_range(0..active.len());
                alloc.free(active.remove(idx));
            }
        }

        let s = alloc.stats();
        frag += s.external_fragmentation();
        util += s.utilization();
        fail += s.failure_rate();
    }

    println!("Strategy: {}", name);
    println!("Avg External Fragmentation: {:.2}%", frag / RUNS as f64);
    println!("Avg Utilization: {:.2}%", util / RUNS as f64);
    println!("Avg Failure Rate: {:.2}%\n", fail / RUNS as f64);
}

fn run_buddy(rng: &mut StdRng) {
    let (mut frag, mut util, mut fail, mut internal) = (0.0, 0.0, 0.0, 0.0);

    for _ in 0..RUNS {
        let mut alloc = AllocatorKind::buddy(MEMORY_SIZE).expect("1024 is a power of two");
        let mut active: Vec<i64> = Vec::new();

        for _ in 0..OPERATIONS {
            if active.is_empty() || rng.gen_range(0..100) < 70 {
                let size = rng.gen_range(0..MAX_ALLOC_SIZE) + 1;
                let id = alloc.malloc(size);
                if id >= 0 {
                    active.push(id);
                }
            } else {
                let idx = rng.gen_range(0..active.len());
                alloc.free(active.remove(idx));
            }
        }

        let s = alloc.stats();
        frag += s.external_fragmentation();
        util += s.utilization();
        fail += s.failure_rate();
        internal += s.internal_fragmentation();
    }

    println!("Strategy: Buddy");
    println!("Avg External Fragmentation: {:.2}%", frag / RUNS as f64);
    println!("Avg Internal Fragmentation: {:.2}%", internal / RUNS as f64);
    println!("Avg Utilization: {:.2}%", util / RUNS as f64);
    println!("Avg Failure Rate: {:.2}%\n", fail / RUNS as f64);
}

fn run_policy(rng: &mut StdRng, name: &str, policy: CachePolicy) {
    let (mut overall, mut avg_time, mut l1, mut l2, mut l3, mut mem) =
        (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    for _ in 0..RUNS {
        let mut cache = CacheHierarchy::new(policy);
        for _ in 0..OPERATIONS {
            let address = rng.gen_range(0..MAX_ADDRESS);
            cache.access(address);
        }

        let s = cache.stats();
        overall += s.overall_hit_rate();
        avg_time += s.average_access_time();
        l1 += s.l1_hit_rate();
        l2 += s.l2_hit_rate();
        l3 += s.l3_hit_rate();
        mem += s.memory_accesses as f64;
    }

    println!("Policy: {}", name);
    println!("Avg Overall Hit Rate: {:.2}%", overall / RUNS as f64);
    println!("Avg Access Time: {:.2} cycles", avg_time / RUNS as f64);
    println!("Avg L1 Hit Rate: {:.2}%", l1 / RUNS as f64);
    println!("Avg L2 Hit Rate: {:.2}%", l2 / RUNS as f64);
    println!("Avg L3 Hit Rate: {:.2}%", l3 / RUNS as f64);
    println!("Avg Memory Accesses: {:.2}\n", mem / RUNS as f64);
}

fn main() {
    let mut rng = StdRng::seed_from_u64(SEED);

    run_list(&mut rng, "First Fit", FitStrategy::First);
    run_list(&mut rng, "Best Fit", FitStrategy::Best);
    run_list(&mut rng, "Worst Fit", FitStrategy::Worst);
    run_buddy(&mut rng);

    run_policy(&mut rng, "FIFO", CachePolicy::Fifo);
    run_policy(&mut rng, "LRU", CachePolicy::Lru);
    run_policy(&mut rng, "LFU", CachePolicy::Lfu);
}
