//! The data-source contract and two ready-made sources.

use std::cmp::Ordering;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::record::GridRecord;
use crate::sort::{SortOrder, SortState};

/// One page request issued by the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    /// 1-based page number.
    pub page: u32,
    /// Records per page, always greater than zero.
    pub page_size: u32,
    /// Field to sort by, if sorted.
    pub sort_field: Option<String>,
    /// Direction to sort in, if sorted.
    pub sort_order: Option<SortOrder>,
}

impl FetchRequest {
    /// Unsorted request for `page`.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sort_field: None,
            sort_order: None,
        }
    }

    /// Sets the sort part of the request.
    pub fn with_sort(mut self, sort: &SortState) -> Self {
        self.sort_field = sort.field().map(str::to_string);
        self.sort_order = sort.order();
        self
    }

    /// The sort part of the request.
    pub fn sort(&self) -> SortState {
        SortState::new(self.sort_field.clone(), self.sort_order)
    }

    /// Zero-based index of the first record on the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// A page of records plus the total number of records on the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }

    /// No records at all.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Supplies pages of records to a grid.
///
/// Implementations own their own timeouts; the grid waits for as long as the
/// returned future takes.
///
/// # Example
///
/// ```ignore
/// struct Users { client: ApiClient }
///
/// #[async_trait]
/// impl DataSource<User> for Users {
///     async fn fetch(&self, request: FetchRequest) -> Result<PageResult<User>, FetchError> {
///         let page = self.client.list_users(request.page, request.page_size).await?;
///         Ok(PageResult::new(page.items, page.total))
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    /// Fetches one page.
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<T>, FetchError>;
}

#[async_trait]
impl<T, S> DataSource<T> for Arc<S>
where
    T: Send + 'static,
    S: DataSource<T> + ?Sized,
{
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<T>, FetchError> {
        (**self).fetch(request).await
    }
}

/// Data source backed by an async closure. Built with [`source_fn`].
pub struct FnSource<F> {
    f: F,
}

/// Wraps an async closure as a [`DataSource`].
///
/// ```ignore
/// let source = source_fn(|request: FetchRequest| async move {
///     api.list(request.page, request.page_size).await
/// });
/// ```
pub fn source_fn<F>(f: F) -> FnSource<F> {
    FnSource { f }
}

#[async_trait]
impl<T, F, Fut> DataSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult<T>, FetchError>> + Send,
{
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<T>, FetchError> {
        (self.f)(request).await
    }
}

/// In-memory data source that sorts and slices a shared record list.
///
/// Cheap to clone; clones share the same records, so an owner can mutate the
/// list (e.g. delete a record) and then reload the grid.
#[derive(Debug)]
pub struct MemorySource<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: GridRecord> MemorySource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .map(|g| g.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of all records in storage order.
    pub fn records(&self) -> Vec<T> {
        self.records
            .read()
            .map(|g| g.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Appends a record.
    pub fn push(&self, record: T) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Removes every record whose `field` equals `value`. Returns how many were removed.
    pub fn remove_where(&self, field: &str, value: &str) -> usize {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|record| record.field(field).as_deref() != Some(value));
        before - guard.len()
    }

    /// Computes the page for `request` without going through the async trait.
    pub fn page(&self, request: &FetchRequest) -> PageResult<T> {
        let mut records = self.records();
        if let (Some(field), Some(order)) = (request.sort_field.as_deref(), request.sort_order) {
            records.sort_by(|a, b| {
                let ordering = compare_fields(a.field(field), b.field(field));
                match order {
                    SortOrder::Ascend => ordering,
                    SortOrder::Descend => ordering.reverse(),
                }
            });
        }

        let total = records.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let data = records
            .into_iter()
            .skip(offset)
            .take(request.page_size as usize)
            .collect();
        PageResult::new(data, total)
    }
}

impl<T> Clone for MemorySource<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl<T: GridRecord> DataSource<T> for MemorySource<T> {
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<T>, FetchError> {
        Ok(self.page(&request))
    }
}

/// Compares two field values numerically when both parse as numbers,
/// lexically otherwise. Missing values sort first.
fn compare_fields(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(&b),
        },
    }
}
