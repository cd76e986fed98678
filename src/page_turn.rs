//! Concurrent automatic page turning.
//!
//! [`auto_page_turn`] fetches the first page of a listing to learn how many
//! pages exist, fetches every remaining page concurrently, and merges all
//! pages into one result in page order, whatever order the fetches finish in.
//!
//! ```no_run
//! use openproject::{auto_page_turn, FilterOptions, List, OpenProjectClient, User};
//!
//! # async fn example() -> openproject::Result<()> {
//! let client = OpenProjectClient::from_env()?;
//! let users = auto_page_turn(FilterOptions::new(), 50, move |filter, offset, page_size| {
//!     let client = client.clone();
//!     async move { User::list_page(&client, &filter, offset, page_size).await }
//! })
//! .await?;
//! println!("{} users", users.len());
//! # Ok(())
//! # }
//! ```
//!
//! All pages are held in memory; prefer single page requests for very large
//! listings.

use std::collections::HashMap;
use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{OpenProjectError, Result};
use crate::pagination::PageResult;

/// Page size used when the caller passes `0`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Index of the page that is fetched first to discover the page count.
const FIRST_PAGE: u32 = 1;

/// What to do when a page after the first one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the failed page out of the merge and record the failure.
    #[default]
    BestEffort,
    /// Abort the remaining fetches and return the first failure.
    FailFast,
}

/// Options for [`auto_page_turn_with`].
#[derive(Debug, Clone, Default)]
pub struct PageTurnOptions {
    /// Requested page size; `0` means [`DEFAULT_PAGE_SIZE`].
    pub page_size: u32,
    /// Handling of failures on pages after the first.
    pub policy: FailurePolicy,
    /// Aborts in-flight fetches when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl PageTurnOptions {
    /// Options with the given page size and best-effort failure handling.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The page size actually requested from the fetcher.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

/// A page that could not be fetched and is missing from the merged result.
#[derive(Debug)]
pub struct PageFailure {
    /// Page index (1-indexed).
    pub page: u32,
    /// Why the page is missing.
    pub error: OpenProjectError,
}

/// Outcome of [`auto_page_turn_with`].
#[derive(Debug)]
pub struct PageTurn<P> {
    /// All successfully fetched pages merged in page order.
    pub result: P,
    /// Pages left out of `result`, in page order.
    pub failures: Vec<PageFailure>,
}

impl<P> PageTurn<P> {
    fn complete(result: P) -> Self {
        Self {
            result,
            failures: Vec::new(),
        }
    }

    /// Returns true if every page made it into the result.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Discard the failure list.
    pub fn into_result(self) -> P {
        self.result
    }
}

/// Fetch every page of a listing concurrently and merge them in page order.
///
/// `fetch` is called with the unchanged `filter`, a 1-indexed page index
/// and the page size. Page 1 is fetched first; its error is returned as is.
/// Failures on later pages are logged and their elements left out; use
/// [`auto_page_turn_with`] to inspect them or to fail fast instead.
///
/// # Errors
///
/// Returns an error if the first page cannot be fetched.
pub async fn auto_page_turn<Q, P, F, Fut>(filter: Q, page_size: u32, fetch: F) -> Result<P>
where
    Q: Clone,
    P: PageResult,
    F: Fn(Q, u32, u32) -> Fut,
    Fut: Future<Output = Result<P>> + Send + 'static,
{
    let turn = auto_page_turn_with(filter, PageTurnOptions::new(page_size), fetch).await?;
    Ok(turn.into_result())
}

/// [`auto_page_turn`] with an explicit failure policy and cancellation.
///
/// # Errors
///
/// Returns an error if the first page cannot be fetched, if the call is
/// cancelled, or, under [`FailurePolicy::FailFast`], if any page fails.
#[tracing::instrument(
    skip_all,
    fields(page_size = options.effective_page_size(), policy = ?options.policy)
)]
pub async fn auto_page_turn_with<Q, P, F, Fut>(
    filter: Q,
    options: PageTurnOptions,
    fetch: F,
) -> Result<PageTurn<P>>
where
    Q: Clone,
    P: PageResult,
    F: Fn(Q, u32, u32) -> Fut,
    Fut: Future<Output = Result<P>> + Send + 'static,
{
    let page_size = options.effective_page_size();
    let cancel = options.cancel.unwrap_or_default();
    if cancel.is_cancelled() {
        return Err(OpenProjectError::Cancelled);
    }

    let first = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(OpenProjectError::Cancelled),
        first = fetch(filter.clone(), FIRST_PAGE, page_size) => first?,
    };

    let total_pages = first.total_pages();
    if total_pages < 2 {
        tracing::debug!(total_pages, "single page listing");
        return Ok(PageTurn::complete(first));
    }

    tracing::debug!(total_pages, page_size, "fetching remaining pages concurrently");

    let mut tasks = JoinSet::new();
    let mut page_of_task = HashMap::with_capacity(total_pages as usize - 1);
    for page in FIRST_PAGE + 1..=total_pages {
        let fut = fetch(filter.clone(), page, page_size);
        let handle = tasks.spawn(async move { (page, fut.await) });
        page_of_task.insert(handle.id(), page);
    }

    // Slot `i` holds page `i + 2`.
    let mut slots: Vec<Option<P>> = (FIRST_PAGE + 1..=total_pages).map(|_| None).collect();
    let mut failures = Vec::new();

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tasks.abort_all();
                tracing::debug!(pending = tasks.len(), "page turn cancelled");
                return Err(OpenProjectError::Cancelled);
            }
            joined = tasks.join_next() => joined,
        };

        let Some(joined) = joined else { break };

        let (page, outcome) = match joined {
            Ok((page, outcome)) => (page, outcome),
            Err(join_error) => {
                let page = page_of_task.get(&join_error.id()).copied().unwrap_or_default();
                let error = OpenProjectError::TaskFailed {
                    page,
                    message: join_error.to_string(),
                };
                (page, Err(error))
            }
        };

        match outcome {
            Ok(result) => slots[(page - FIRST_PAGE - 1) as usize] = Some(result),
            Err(error) => match options.policy {
                FailurePolicy::FailFast => {
                    tasks.abort_all();
                    return Err(OpenProjectError::PageFailed {
                        page,
                        source: Box::new(error),
                    });
                }
                FailurePolicy::BestEffort => {
                    tracing::warn!(
                        page,
                        error = %error,
                        "page fetch failed, leaving it out of the result"
                    );
                    failures.push(PageFailure { page, error });
                }
            },
        }
    }

    let mut merged = first;
    for page in slots.into_iter().flatten() {
        merged.concat_embed(page);
    }

    failures.sort_by_key(|failure| failure.page);

    Ok(PageTurn {
        result: merged,
        failures,
    })
}
