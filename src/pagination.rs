//! Pagination types for OpenProject collection responses.
//!
//! OpenProject wraps every list response in a HAL collection:
//!
//! ```json
//! {
//!   "_type": "Collection",
//!   "total": 25, "count": 10, "pageSize": 10, "offset": 1,
//!   "_embedded": { "elements": [ ... ] }
//! }
//! ```
//!
//! [`Collection`] models that envelope and implements [`PageResult`], the
//! capability the concurrent page turner needs to merge pages.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::{OpenProjectError, Result};
use crate::filter::FilterOptions;

/// A page of a paginated listing that can be merged with its siblings.
///
/// Implemented by [`Collection`] for every resource. Other page types can
/// implement it too; [`auto_page_turn`](crate::auto_page_turn) only relies
/// on this trait.
pub trait PageResult: Send + 'static {
    /// Total number of elements across all pages.
    fn total(&self) -> u64;

    /// Page size used for the request that produced this page.
    fn page_size(&self) -> u32;

    /// Number of pages needed to hold [`total`](PageResult::total) elements.
    ///
    /// A page without a page size is an unpaged listing: it is the only page.
    fn total_pages(&self) -> u32 {
        let total = self.total();
        match self.page_size() {
            0 => u32::from(total > 0),
            size => u32::try_from(total.div_ceil(u64::from(size))).unwrap_or(u32::MAX),
        }
    }

    /// Append the elements of `other` after the elements of `self`.
    ///
    /// No reordering happens here; callers present pages in ascending
    /// page order.
    fn concat_embed(&mut self, other: Self);
}

/// Embedded elements of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedded<T> {
    /// The elements on this page.
    #[serde(default = "Vec::new")]
    pub elements: Vec<T>,
}

impl<T> Default for Embedded<T> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

/// A page of results from the OpenProject API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    /// HAL type (usually `Collection`).
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Total number of elements across all pages.
    #[serde(default)]
    pub total: u64,
    /// Number of elements on this page.
    #[serde(default)]
    pub count: u32,
    /// Number of elements per page.
    #[serde(default)]
    pub page_size: u32,
    /// Page index (1-indexed).
    #[serde(default)]
    pub offset: u32,
    /// The elements.
    #[serde(rename = "_embedded", default = "Embedded::default")]
    pub embedded: Embedded<T>,
}

impl<T> Collection<T> {
    /// Create a page from elements and pagination info.
    #[must_use]
    pub fn new(elements: Vec<T>, total: u64, offset: u32, page_size: u32) -> Self {
        Self {
            kind: Some("Collection".to_string()),
            total,
            count: u32::try_from(elements.len()).unwrap_or(u32::MAX),
            page_size,
            offset,
            embedded: Embedded { elements },
        }
    }

    /// The elements on this page.
    pub fn elements(&self) -> &[T] {
        &self.embedded.elements
    }

    /// Consume the page, returning its elements.
    pub fn into_elements(self) -> Vec<T> {
        self.embedded.elements
    }

    /// Whether more pages follow this one.
    pub fn has_more(&self) -> bool {
        u64::from(self.offset) * u64::from(self.page_size) < self.total
    }

    /// Map the elements to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Collection<U> {
        Collection {
            kind: self.kind,
            total: self.total,
            count: self.count,
            page_size: self.page_size,
            offset: self.offset,
            embedded: Embedded {
                elements: self.embedded.elements.into_iter().map(f).collect(),
            },
        }
    }

    /// Returns true if this page has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embedded.elements.is_empty()
    }

    /// Returns the number of elements on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.embedded.elements.len()
    }

    /// Returns an iterator over the elements in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.embedded.elements.iter()
    }
}

impl<T: Send + 'static> PageResult for Collection<T> {
    fn total(&self) -> u64 {
        self.total
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn concat_embed(&mut self, other: Self) {
        self.embedded.elements.extend(other.embedded.elements);
        self.count = u32::try_from(self.embedded.elements.len()).unwrap_or(u32::MAX);
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.embedded.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.embedded.elements.iter()
    }
}

/// Query parameters of a collection request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page index (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of elements per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// JSON encoded filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

impl PaginationParams {
    /// Create pagination params for a specific page.
    #[must_use]
    pub fn for_page(offset: u32, page_size: u32) -> Self {
        Self {
            offset: Some(offset),
            page_size: Some(page_size),
            filters: None,
        }
    }

    /// Attach filter conditions.
    #[must_use]
    pub fn with_filters(mut self, filter: &FilterOptions) -> Self {
        self.filters = filter.to_query_value();
        self
    }
}

/// Fetch and decode one page of a collection endpoint.
pub(crate) async fn fetch_collection<T: DeserializeOwned>(
    client: &OpenProjectClient,
    path: &str,
    filter: &FilterOptions,
    offset: u32,
    page_size: u32,
) -> Result<Collection<T>> {
    let params = PaginationParams::for_page(offset, page_size).with_filters(filter);
    let response = client.get_with_query(path, &params).await?;
    let page: Collection<T> = response.json().await.map_err(OpenProjectError::HttpError)?;
    Ok(page)
}
