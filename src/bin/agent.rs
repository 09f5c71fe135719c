use metricd::core::sampler::alloc::CountingAlloc;
use mimalloc::MiMalloc;

/// Counts allocations for the `Alloc`, `Mallocs`, ... runtime gauges
#[global_allocator]
static GLOBAL: CountingAlloc<MiMalloc> = CountingAlloc::new(MiMalloc);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    metricd::app::agent::run().await
}
