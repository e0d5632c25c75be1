use tracing::{debug, info};

use crate::contract::{Issue, IssueTracker, TrackerError};

pub const PAGE_SIZE: u64 = 50;

/// Collect every issue matched by a saved filter, in tracker order.
///
/// An empty `filter_id` or a filter with an empty query gives an empty list.
/// Paging stops once the offset reaches the total reported by the server.
pub async fn fetch_issues_from_filter<T>(
    tracker: &T,
    filter_id: &str,
) -> Result<Vec<Issue>, TrackerError>
where
    T: IssueTracker + ?Sized,
{
    let filter_id = filter_id.trim();
    if filter_id.is_empty() {
        return Ok(Vec::new());
    }
    let jql = tracker.filter_jql(filter_id).await?;
    if jql.trim().is_empty() {
        info!(filter_id, "Filter has no query, nothing to fetch");
        return Ok(Vec::new());
    }

    let mut issues = Vec::new();
    let mut start_at = 0;
    loop {
        let page = tracker.search(&jql, start_at, PAGE_SIZE).await?;
        debug!(filter_id, start_at, hits = page.hits.len(), total = page.total, "Fetched page");
        issues.extend(page.hits.into_iter().map(|hit| Issue {
            link: tracker.browse_url(&hit.key),
            key: hit.key,
            summary: hit.summary,
        }));
        start_at += PAGE_SIZE;
        if start_at >= page.total {
            break;
        }
    }

    info!(filter_id, count = issues.len(), "Fetched issues for filter");
    Ok(issues)
}
