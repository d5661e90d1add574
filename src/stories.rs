//! Concurrent story fetcher: fans item fetches out over a `JoinSet`, one task
//! per ranked id, and reassembles the results by rank index so completion
//! order never leaks into the page order.

/// What to do when the ranked list runs out before enough story links are
/// found. `Allow` renders the short page; `Error` fails the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShortResult {
    Allow,
    Error,
}

// Roughly a quarter of the front page is job ads, Ask HNs and dead links,
// so the first batch over-fetches by that much.
const OVERFETCH_NUM: usize = 5;
const OVERFETCH_DEN: usize = 4;

fn is_story_link(item: &crate::hn_api::Item) -> bool {
    item.item_type == "story" && item.url.as_deref().is_some_and(|url| !url.is_empty())
}

/// Returns the first `count` externally-linked stories from the current
/// ranking, in rank order. Per-item failures are logged and skipped; only a
/// failure to fetch the ranked list itself is fatal.
pub(crate) async fn get_top_stories<S>(
    cache: &std::sync::Arc<crate::cache::Cache<S>>,
    count: usize,
    short_result: ShortResult,
) -> anyhow::Result<Vec<crate::hn_api::Item>>
where
    S: crate::hn_api::ItemSource + 'static,
{
    let ids = cache.top_ids().await?;

    let mut stories: Vec<(usize, crate::hn_api::Item)> = Vec::with_capacity(count);
    let mut next_rank = 0;

    while stories.len() < count && next_rank < ids.len() {
        let need = ((count - stories.len()) * OVERFETCH_NUM / OVERFETCH_DEN).max(1);
        let batch = &ids[next_rank..(next_rank + need).min(ids.len())];

        let mut join_set: tokio::task::JoinSet<(usize, anyhow::Result<crate::hn_api::Item>)> =
            tokio::task::JoinSet::new();

        for (offset, &id) in batch.iter().enumerate() {
            let rank = next_rank + offset;
            let cache = std::sync::Arc::clone(cache);
            join_set.spawn(async move { (rank, cache.get_item(id).await) });
        }

        let mut results: Vec<(usize, crate::hn_api::Item)> = Vec::with_capacity(batch.len());
        while let Some(res) = join_set.join_next().await {
            match res.expect("JoinSet to work") {
                (rank, Ok(item)) => results.push((rank, item)),
                (rank, Err(e)) => {
                    tracing::error!(rank, error =? e, "Error fetching item, skipping")
                }
            }
        }

        // Tasks finish in arrival order; the page wants rank order.
        results.sort_by_key(|(rank, _)| *rank);
        stories.extend(results.into_iter().filter(|(_, item)| is_story_link(item)));

        next_rank += batch.len();
    }

    stories.truncate(count);

    if stories.len() < count && short_result == ShortResult::Error {
        anyhow::bail!(
            "only {} of {} requested stories available",
            stories.len(),
            count
        );
    }

    Ok(stories.into_iter().map(|(_, item)| item).collect())
}
