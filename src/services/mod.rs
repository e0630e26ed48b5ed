//! Business logic services

pub mod authors;
pub mod books;
pub mod existence;
pub mod relations;
pub mod validation;

use std::sync::Arc;

use crate::{error::AppResult, repository::RecordStore};

pub use validation::RequestValidator;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    pub authors: authors::AuthorService,
    store: Arc<dyn RecordStore>,
}

impl Services {
    /// Create all services over one record store and validator
    pub fn new(store: Arc<dyn RecordStore>, validator: RequestValidator) -> Self {
        Self {
            books: books::BookService::new(store.clone(), validator.clone()),
            authors: authors::AuthorService::new(store.clone(), validator),
            store,
        }
    }

    /// Open and commit an empty transaction to prove the store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.store.begin().await?.commit().await
    }
}
