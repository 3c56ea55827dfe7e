/// A macro to simplify read-through caching of provider calls.
///
/// Checks the cache for the key; on a hit the cached value is returned and
/// the block never runs. On a miss (or with no cache configured) the block
/// computes the value, which is stored in the background and returned.
///
/// # Arguments
/// * `$cache`: `Option<&Cache>`. `None` disables caching for the call site,
///   which must not change the observable result.
/// * `$key`: The key to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The async block to execute if the value is not found in cache.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                if let Some(hit) = cache.get_from_cache(&$key).await {
                    tracing::debug!(key = %$key, "Cache hit");
                    Ok(hit)
                } else {
                    let value = $block.await?;
                    cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
            }
            None => $block.await,
        }
    }};
}
