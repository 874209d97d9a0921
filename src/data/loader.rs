//! Row loader seam: the asynchronous source of row batches.

use std::future::Future;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::LoadError;
use crate::types::Row;

pub type LoadResult = Result<Vec<Row>, LoadError>;

/// Produces the ordered rows for an inclusive index range.
///
/// A rejection leaves the requested page failed; the cache retries it the next
/// time the page becomes visible.
pub trait RowLoader {
    fn load(&self, start: usize, end: usize) -> LocalBoxFuture<'static, LoadResult>;
}

impl<F, Fut> RowLoader for F
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = LoadResult> + 'static,
{
    fn load(&self, start: usize, end: usize) -> LocalBoxFuture<'static, LoadResult> {
        self(start, end).boxed_local()
    }
}

/// Serves rows from a vector that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    rows: Rc<Vec<Row>>,
}

impl InMemoryLoader {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Rc::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowLoader for InMemoryLoader {
    fn load(&self, start: usize, end: usize) -> LocalBoxFuture<'static, LoadResult> {
        let batch = if start <= end {
            self.rows
                .get(start..=end.min(self.rows.len().saturating_sub(1)))
                .map(<[Row]>::to_vec)
        } else {
            None
        };
        let result = batch.ok_or_else(|| LoadError::new(start, end, "range outside dataset"));
        future::ready(result).boxed_local()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::new(i64::try_from(i).unwrap(), i)).collect()
    }

    #[test]
    fn in_memory_loader_serves_inclusive_range() {
        let loader = InMemoryLoader::new(rows(10));
        let batch = block_on(loader.load(2, 4)).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].index, 2);
        assert_eq!(batch[2].index, 4);
    }

    #[test]
    fn in_memory_loader_rejects_out_of_range() {
        let loader = InMemoryLoader::new(rows(10));
        assert!(block_on(loader.load(20, 30)).is_err());
        // Tail is clamped to the dataset
        assert_eq!(block_on(loader.load(8, 30)).unwrap().len(), 2);
    }

    #[test]
    fn closures_are_loaders() {
        let loader = |start: usize, end: usize| async move {
            Ok::<_, LoadError>((start..=end).map(|i| Row::new(0_i64, i)).collect::<Vec<_>>())
        };
        assert_eq!(block_on(RowLoader::load(&loader, 0, 9)).unwrap().len(), 10);
    }
}
