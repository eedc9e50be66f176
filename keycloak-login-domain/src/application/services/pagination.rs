use crate::domain::errors::{DomainError, DomainResult};
use std::future::Future;
use tracing::trace;

/// Page size used for Keycloak list endpoints when none is configured
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Reads pages of `batch_size` from `page_fn(first, max)` until at least `limit`
/// items were collected or the upstream returns a short page.
///
/// The result is not truncated and may hold up to `batch_size - 1` items more
/// than `limit`. Pages are requested one after another.
pub async fn fetch_up_to<T, F, Fut>(
    limit: usize,
    batch_size: usize,
    mut page_fn: F,
) -> DomainResult<Vec<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = DomainResult<Vec<T>>>,
{
    if batch_size == 0 {
        return Err(DomainError::validation(
            "batch_size",
            "Batch size must be greater than 0",
        ));
    }

    let mut items = Vec::new();
    let mut first = 0;

    while items.len() < limit {
        let page = page_fn(first, batch_size).await?;
        let page_len = page.len();
        trace!(first, page_len, "Fetched page");

        items.extend(page);
        if page_len < batch_size {
            break;
        }
        first += batch_size;
    }

    Ok(items)
}
