//! Record sources
//!
//! A [`RecordSource`] yields entities one page at a time in a stable order
//! (page ascending, then row ascending within a page). The pipeline converts
//! each item to a [`Record`](crate::record::Record) before schema inference.

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::VecDeque;

/// A finite, ordered sequence of entity batches
#[async_trait]
pub trait RecordSource: Send {
    /// Entity type; must serialize to a mapping
    type Item: Serialize + Send;

    /// Next batch, or `None` when exhausted
    async fn next_page(&mut self) -> Result<Option<Vec<Self::Item>>>;
}

/// In-memory source over pre-built pages
#[derive(Debug, Clone, Default)]
pub struct VecSource<T> {
    pages: VecDeque<Vec<T>>,
}

impl<T> VecSource<T> {
    /// Source yielding `pages` in order
    pub fn new(pages: Vec<Vec<T>>) -> Self {
        Self {
            pages: pages.into(),
        }
    }

    /// Source yielding all items as one page
    pub fn single_page(items: Vec<T>) -> Self {
        Self::new(vec![items])
    }
}

#[async_trait]
impl<T: Serialize + Send> RecordSource for VecSource<T> {
    type Item = T;

    async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        Ok(self.pages.pop_front())
    }
}
