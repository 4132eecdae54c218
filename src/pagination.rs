//! Pagination
//!
//! Page arithmetic and paginated access to a dataset of records produced by a
//! [`DataSource`]. The dataset is loaded on first demand and kept for the
//! lifetime of the [`Paginator`].
//!
//! Three access modes are offered:
//!
//! - [`get_page`](Paginator::get_page): a plain slice of rows
//! - [`get_hyper`](Paginator::get_hyper): the slice plus navigation metadata
//! - [`get_hyper_index`](Paginator::get_hyper_index): paging by original row
//!   position, which stays consistent when rows are deleted between requests
//!
//! Pages are 1-indexed. Row positions for the indexed mode are 0-indexed.
//!
//! ```
//! use policy_cache::pagination::{InMemorySource, Paginator};
//!
//! let mut pages = Paginator::new(InMemorySource::new((0..25).collect::<Vec<u32>>()));
//!
//! let hyper = pages.get_hyper(3, 10).unwrap();
//! assert_eq!(hyper.data, &[20, 21, 22, 23, 24]);
//! assert_eq!(hyper.page_size, 5);
//! assert_eq!(hyper.next_page, None);
//! assert_eq!(hyper.prev_page, Some(2));
//! assert_eq!(hyper.total_pages, 3);
//! ```

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::ops::Range;
use tracing::debug;

/// Half-open row range covered by a 1-indexed `page` of `page_size` rows.
///
/// A zero page or page size yields the empty range `0..0`.
///
/// ```
/// use policy_cache::pagination::index_range;
///
/// assert_eq!(index_range(1, 7), 0..7);
/// assert_eq!(index_range(3, 15), 30..45);
/// assert_eq!(index_range(0, 10), 0..0);
/// ```
pub fn index_range(page: usize, page_size: usize) -> Range<usize> {
    if page == 0 || page_size == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size);
    start..start.saturating_add(page_size)
}

/// Supplier of the records a [`Paginator`] serves.
pub trait DataSource {
    type Record;
    type Error;

    /// Produces the full dataset, header rows excluded.
    fn load(&mut self) -> Result<Vec<Self::Record>, Self::Error>;
}

/// A [`DataSource`] over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource<R> {
    records: Vec<R>,
}

impl<R> InMemorySource<R> {
    pub fn new(records: Vec<R>) -> Self {
        InMemorySource { records }
    }
}

impl<R> DataSource for InMemorySource<R> {
    type Record = R;
    type Error = Infallible;

    fn load(&mut self) -> Result<Vec<R>, Infallible> {
        Ok(core::mem::take(&mut self.records))
    }
}

/// Errors returned by [`Paginator`].
#[derive(Debug, thiserror::Error)]
pub enum PageError<E> {
    /// A page number or page size was zero.
    #[error("{0} must be a positive integer")]
    InvalidArgument(&'static str),

    /// The start index lies beyond the last resident row.
    #[error("index {index} is beyond the last resident row")]
    IndexOutOfRange { index: usize },

    /// The data source failed to load.
    #[error("data source failed to load")]
    Source(#[source] E),
}

/// A page with navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperPage<'a, R> {
    /// Number of rows actually returned.
    pub page_size: usize,
    pub page: usize,
    pub data: &'a [R],
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
    pub total_pages: usize,
}

/// A page of the deletion-resilient indexed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperIndex<'a, R> {
    /// The requested start index.
    pub index: usize,
    /// Original position of the first row after this page, if the page is
    /// full and more rows remain.
    pub next_index: Option<usize>,
    /// Number of rows actually returned.
    pub page_size: usize,
    pub data: Vec<&'a R>,
}

/// Serves pages from a dataset that is loaded once from a [`DataSource`].
pub struct Paginator<D: DataSource> {
    source: D,
    dataset: Option<Vec<D::Record>>,
    indexed: Option<BTreeMap<usize, D::Record>>,
}

impl<D: DataSource> Paginator<D> {
    pub fn new(source: D) -> Self {
        Paginator {
            source,
            dataset: None,
            indexed: None,
        }
    }

    /// The full dataset, loading it on first demand.
    ///
    /// A failed load is reported and retried on the next call.
    pub fn dataset(&mut self) -> Result<&[D::Record], PageError<D::Error>> {
        if self.dataset.is_none() {
            let records = self.source.load().map_err(PageError::Source)?;
            debug!(records = records.len(), "dataset loaded");
            self.dataset = Some(records);
        }
        Ok(self.dataset.as_deref().unwrap_or_default())
    }

    /// Rows of a 1-indexed page. Pages past the end are empty.
    pub fn get_page(
        &mut self,
        page: usize,
        page_size: usize,
    ) -> Result<&[D::Record], PageError<D::Error>> {
        check_positive(page, page_size)?;
        let range = index_range(page, page_size);
        let data = self.dataset()?;
        if range.start >= data.len() {
            return Ok(&[]);
        }
        Ok(&data[range.start..range.end.min(data.len())])
    }

    /// Like [`get_page`](Self::get_page), with navigation metadata.
    pub fn get_hyper(
        &mut self,
        page: usize,
        page_size: usize,
    ) -> Result<HyperPage<'_, D::Record>, PageError<D::Error>> {
        check_positive(page, page_size)?;
        let range = index_range(page, page_size);
        let data = self.dataset()?;
        let total = data.len();
        let rows = if range.start >= total {
            &data[..0]
        } else {
            &data[range.start..range.end.min(total)]
        };

        Ok(HyperPage {
            page_size: rows.len(),
            page,
            data: rows,
            next_page: page.checked_add(1).filter(|_| range.end < total),
            prev_page: (range.start > 0).then_some(page - 1),
            total_pages: total.div_ceil(page_size),
        })
    }
}

impl<D> Paginator<D>
where
    D: DataSource,
    D::Record: Clone,
{
    /// The dataset keyed by original row position. Rows removed through
    /// [`remove_indexed`](Self::remove_indexed) are absent.
    pub fn indexed_dataset(&mut self) -> Result<&BTreeMap<usize, D::Record>, PageError<D::Error>> {
        let indexed: &BTreeMap<usize, D::Record> = self.indexed()?;
        Ok(indexed)
    }

    /// Up to `page_size` rows whose original position is at least `index`.
    ///
    /// Deleting rows between calls never skips or repeats a row when paging
    /// with the returned `next_index`.
    pub fn get_hyper_index(
        &mut self,
        index: usize,
        page_size: usize,
    ) -> Result<HyperIndex<'_, D::Record>, PageError<D::Error>> {
        if page_size == 0 {
            return Err(PageError::InvalidArgument("page size"));
        }
        let indexed: &BTreeMap<usize, D::Record> = self.indexed()?;
        match indexed.keys().next_back() {
            Some(&last) if index <= last => {}
            _ => return Err(PageError::IndexOutOfRange { index }),
        }

        let mut rows = indexed.range(index..);
        let data: Vec<&D::Record> = rows.by_ref().take(page_size).map(|(_, row)| row).collect();
        let next_index = if data.len() == page_size {
            rows.next().map(|(&i, _)| i)
        } else {
            None
        };

        Ok(HyperIndex {
            index,
            next_index,
            page_size: data.len(),
            data,
        })
    }

    /// Deletes the row at original position `index` from the indexed view.
    pub fn remove_indexed(&mut self, index: usize) -> Result<Option<D::Record>, PageError<D::Error>> {
        Ok(self.indexed()?.remove(&index))
    }

    fn indexed(&mut self) -> Result<&mut BTreeMap<usize, D::Record>, PageError<D::Error>> {
        if self.indexed.is_none() {
            let indexed: BTreeMap<usize, D::Record> =
                self.dataset()?.iter().cloned().enumerate().collect();
            self.indexed = Some(indexed);
        }
        Ok(self.indexed.get_or_insert_with(BTreeMap::new))
    }
}

impl<D: DataSource> core::fmt::Debug for Paginator<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Paginator")
            .field("loaded", &self.dataset.as_ref().map(Vec::len))
            .field("indexed", &self.indexed.as_ref().map(BTreeMap::len))
            .finish()
    }
}

fn check_positive<E>(page: usize, page_size: usize) -> Result<(), PageError<E>> {
    if page == 0 {
        return Err(PageError::InvalidArgument("page"));
    }
    if page_size == 0 {
        return Err(PageError::InvalidArgument("page size"));
    }
    Ok(())
}
