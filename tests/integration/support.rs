//! Shared test doubles

use async_trait::async_trait;
use coin_alert::price::{PriceSource, SourceError};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns queued results in order, then repeats the last successful value
pub struct ScriptedSource {
    results: Mutex<VecDeque<Result<Decimal, SourceError>>>,
    last: Mutex<Option<Decimal>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(results: Vec<Result<Decimal, SourceError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_current(&self) -> Result<Decimal, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.results.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => {
                *self.last.lock().unwrap() = Some(value);
                Ok(value)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .lock()
                .unwrap()
                .ok_or_else(|| SourceError::new("script exhausted")),
        }
    }
}

pub fn fail(reason: &str) -> Result<Decimal, SourceError> {
    Err(SourceError::new(reason))
}
