//! Invalidate stage: force the next get to miss

use tracing::info;

use confab_core::cache::CacheStore;
use confab_core::error::ConfabResult;
use confab_core::record::RecordKey;

use crate::args::InvalidateArgs;

pub async fn run(args: InvalidateArgs) -> ConfabResult<()> {
    let store = CacheStore::open(args.cache.store_config()?)?;
    let key = RecordKey::new(args.provider, args.kind, args.id);

    store.invalidate(&key).await?;
    info!("Invalidated {}", key);
    Ok(())
}
