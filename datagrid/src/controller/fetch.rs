//! Fetch protocol: mount, reload, paging and sorting.
//!
//! Every fetch gets a sequence number and remembers the request it was
//! issued for. A response is applied only if its request still matches the
//! grid's pagination and sort, and no newer response has been applied
//! already. Everything else is discarded, so responses that resolve out of
//! order never roll the page back.

use crate::column::sort_field_for;
use crate::error::FetchError;
use crate::notify::Notification;
use crate::observer::GridEvent;
use crate::pagination::Pagination;
use crate::record::GridRecord;
use crate::sort::SortState;
use crate::source::{FetchRequest, PageResult};

use super::{GridController, GridInner};

/// Follow-up fetches allowed after the total shrinks below the current page.
const MAX_CLAMP_REFETCHES: u32 = 3;

/// What became of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response is now the visible page.
    Applied,
    /// The response was stale and ignored.
    Discarded,
    /// The data source failed; the previous page is still visible.
    Failed,
}

/// How a resolved fetch was folded into the grid state.
enum Resolution {
    Applied {
        rows: usize,
        total: u64,
        received: usize,
        clamp: Option<Clamp>,
    },
    Discarded,
    Failed(FetchError),
}

/// The page moved back because the total shrank under it.
struct Clamp {
    from: u32,
    to: u32,
    /// Fetch for the new page, unless the refetch budget is spent.
    refetch: Option<(u64, FetchRequest)>,
}

/// Counts one fetch as in flight until dropped.
///
/// Lives across the data source `.await`, so the count also comes down when
/// the owner drops the fetch future before it resolves.
struct InFlight<'a, T: GridRecord> {
    grid: &'a GridController<T>,
}

impl<T: GridRecord> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.grid
            .write(|g| g.in_flight = g.in_flight.saturating_sub(1));
        self.grid.mark_dirty();
    }
}

impl<T> GridInner<T> {
    fn resolve(
        &mut self,
        seq: u64,
        request: &FetchRequest,
        result: Result<PageResult<T>, FetchError>,
        may_refetch: bool,
    ) -> Resolution {
        if seq <= self.last_applied || *request != self.query() {
            return Resolution::Discarded;
        }

        let PageResult { mut data, total } = match result {
            Ok(page) => page,
            Err(error) => return Resolution::Failed(error),
        };

        let received = data.len();
        data.truncate(self.pagination.page_size as usize);
        let rows = data.len();

        self.rows = data;
        self.pagination.total = total;
        self.last_applied = seq;
        // Drag indices referred to the old page
        self.reorder.cancel();

        let clamp = (!self.pagination.is_in_range()).then(|| {
            let from = self.pagination.current_page;
            self.pagination.current_page = self.pagination.last_page();
            Clamp {
                from,
                to: self.pagination.current_page,
                refetch: may_refetch.then(|| self.issue()),
            }
        });

        Resolution::Applied {
            rows,
            total,
            received,
            clamp,
        }
    }
}

impl<T: GridRecord> GridController<T> {
    /// Issue the initial fetch: page 1, no sort.
    ///
    /// Returns `None` if the grid was already mounted.
    pub async fn mount(&self) -> Option<FetchOutcome> {
        let issued = self.write(|g| {
            if g.mounted {
                return None;
            }
            g.mounted = true;
            g.pagination.current_page = 1;
            g.sort = SortState::none();
            Some(g.issue())
        });
        let Some((seq, request)) = issued else {
            log::warn!("Grid {} is already mounted", self.id);
            return None;
        };
        self.mark_dirty();
        self.emit(GridEvent::Mounted);
        Some(self.run_fetch(seq, request).await)
    }

    /// Re-fetch the current page with the current page size and sort.
    ///
    /// Not a user interaction, so it also runs on a disabled grid.
    pub async fn reload(&self) -> FetchOutcome {
        let (seq, request) = self.write(|g| g.issue());
        self.mark_dirty();
        self.run_fetch(seq, request).await
    }

    /// Move to `page` with `page_size`, then fetch it with the current sort.
    ///
    /// Ignored (no state change, no fetch) when the grid is disabled or the
    /// page size is not allowed. Page 0 is treated as page 1.
    pub async fn change_page(&self, page: u32, page_size: u32) -> Option<FetchOutcome> {
        if !self.shared.config.allows_page_size(page_size) {
            log::warn!("Grid {} ignoring page size {}", self.id, page_size);
            return None;
        }
        self.fetch_after("page change", |g| {
            g.pagination.current_page = page.max(1);
            g.pagination.page_size = page_size;
        })
        .await
    }

    /// Move to `page`, keeping the page size.
    pub async fn go_to_page(&self, page: u32) -> Option<FetchOutcome> {
        let page_size = self.pagination().page_size;
        self.change_page(page, page_size).await
    }

    pub async fn next_page(&self) -> Option<FetchOutcome> {
        let pagination = self.pagination();
        if !pagination.has_next() {
            return None;
        }
        self.change_page(pagination.current_page + 1, pagination.page_size)
            .await
    }

    pub async fn prev_page(&self) -> Option<FetchOutcome> {
        let pagination = self.pagination();
        if !pagination.has_prev() {
            return None;
        }
        self.change_page(pagination.current_page - 1, pagination.page_size)
            .await
    }

    /// Switch page size, staying on the current page when it still exists.
    pub async fn change_page_size(&self, page_size: u32) -> Option<FetchOutcome> {
        let current = self.pagination();
        let resized = Pagination {
            page_size: page_size.max(1),
            ..current
        };
        let page = current.current_page.min(resized.last_page());
        self.change_page(page, page_size).await
    }

    /// Header click on `column_key`: cycle its sort and fetch.
    ///
    /// Ignored when the column is not bound to a field or the grid is disabled.
    pub async fn toggle_sort(&self, column_key: &str) -> Option<FetchOutcome> {
        let Some(field) = sort_field_for(&self.shared.columns, column_key) else {
            log::debug!("Grid {}: column {} is not sortable", self.id, column_key);
            return None;
        };
        self.fetch_after("sort", |g| g.sort = g.sort.cycle(field))
            .await
    }

    /// Apply a sort reported by a renderer that runs its own sort cycle.
    pub async fn set_sort(&self, sort: SortState) -> Option<FetchOutcome> {
        if let Some(field) = sort.field()
            && !self
                .shared
                .columns
                .iter()
                .any(|c| c.data_index.as_deref() == Some(field))
        {
            log::debug!("Grid {}: no column sorts on {}", self.id, field);
            return None;
        }
        self.fetch_after("sort", |g| g.sort = sort).await
    }

    /// Apply `update` and fetch, unless the grid is disabled.
    async fn fetch_after(
        &self,
        interaction: &'static str,
        update: impl FnOnce(&mut GridInner<T>),
    ) -> Option<FetchOutcome> {
        let (seq, request) = self.interact(interaction, |g| {
            update(g);
            g.issue()
        })?;
        self.mark_dirty();
        Some(self.run_fetch(seq, request).await)
    }

    async fn run_fetch(&self, mut seq: u64, mut request: FetchRequest) -> FetchOutcome {
        let mut refetches_left = MAX_CLAMP_REFETCHES;
        loop {
            let _in_flight = InFlight { grid: self };
            self.emit(GridEvent::FetchStarted {
                seq,
                request: request.clone(),
            });

            let result = self.shared.source.fetch(request.clone()).await;
            let resolution = self.write(|g| g.resolve(seq, &request, result, refetches_left > 0));

            match resolution {
                Resolution::Discarded => {
                    self.emit(GridEvent::FetchDiscarded { seq, request });
                    return FetchOutcome::Discarded;
                }
                Resolution::Failed(error) => {
                    self.emit(GridEvent::FetchFailed { seq, error });
                    let config = &self.shared.config;
                    self.shared.notifier.notify(
                        Notification::error(config.load_error_message.clone())
                            .with_duration(config.notification_duration()),
                    );
                    return FetchOutcome::Failed;
                }
                Resolution::Applied {
                    rows,
                    total,
                    received,
                    clamp,
                } => {
                    if received > rows {
                        self.emit(GridEvent::RowsTruncated {
                            seq,
                            received,
                            kept: rows,
                        });
                    }
                    self.emit(GridEvent::FetchApplied { seq, rows, total });
                    let keyless = self.read(|g| {
                        g.rows
                            .iter()
                            .filter(|row| self.shared.row_key.key_of(row).is_none())
                            .count()
                    });
                    if keyless > 0 {
                        self.emit(GridEvent::PositionalKeys {
                            seq,
                            rows: keyless,
                        });
                    }

                    let Some(Clamp { from, to, refetch }) = clamp else {
                        return FetchOutcome::Applied;
                    };
                    self.emit(GridEvent::PageClamped { from, to });
                    let Some((next_seq, next_request)) = refetch else {
                        log::warn!(
                            "Grid {}: total kept shrinking, showing page {} without refetching",
                            self.id,
                            to
                        );
                        return FetchOutcome::Applied;
                    };
                    refetches_left -= 1;
                    seq = next_seq;
                    request = next_request;
                }
            }
        }
    }
}
