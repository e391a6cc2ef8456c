use anyhow::Result;
use async_trait::async_trait;
use cqlmap::{save_entity, Driver, DriverError, Query, QueryError, Registry, Rows, Value};

use crate::fixtures::{tweet, Tweet};
use crate::support::MemoryDriver;

#[tokio::test]
async fn empty_result_reports_done_on_first_next() -> Result<()> {
    let registry = Registry::new();
    let driver = MemoryDriver::new();

    let mut iter = Query::<Tweet>::new(&registry)?
        .filter("timeline =", "nobody")
        .run(&driver)
        .await;
    let mut dst = Tweet::default();
    let err = iter.next(&mut dst).await.unwrap_err();
    assert!(err.is_done());
    Ok(())
}

#[tokio::test]
async fn iterates_matching_rows_until_done() -> Result<()> {
    let registry = Registry::new();
    let driver = MemoryDriver::new();
    for text in ["one", "two", "three"] {
        save_entity(&driver, &registry, &tweet("me", text)).await?;
    }
    save_entity(&driver, &registry, &tweet("other", "elsewhere")).await?;

    let mut iter = Query::<Tweet>::new(&registry)?
        .filter("timeline =", "me")
        .run(&driver)
        .await;
    let mut seen = Vec::new();
    let mut row = Tweet::default();
    loop {
        match iter.next(&mut row).await {
            Ok(()) => seen.push(row.text.clone()),
            Err(err) if err.is_done() => break,
            Err(err) => return Err(err.into()),
        }
    }
    assert_eq!(seen, vec!["one", "two", "three"]);

    // the cursor is closed; later pulls keep reporting Done
    assert!(iter.next(&mut row).await.unwrap_err().is_done());
    assert!(iter.close().await.is_ok());
    Ok(())
}

#[tokio::test]
async fn limit_truncates_the_result_set() -> Result<()> {
    let registry = Registry::new();
    let driver = MemoryDriver::new();
    for text in ["one", "two", "three"] {
        save_entity(&driver, &registry, &tweet("me", text)).await?;
    }

    let mut iter = Query::<Tweet>::new(&registry)?
        .filter("timeline =", "me")
        .limit(2)
        .run(&driver)
        .await;
    let mut count = 0;
    let mut row = Tweet::default();
    while iter.next(&mut row).await.is_ok() {
        count += 1;
    }
    assert_eq!(count, 2);
    Ok(())
}

#[tokio::test]
async fn first_returns_done_for_an_empty_result_set() -> Result<()> {
    let registry = Registry::new();
    let driver = MemoryDriver::new();

    let mut dst = Tweet::default();
    let err = Query::<Tweet>::new(&registry)?
        .filter("timeline =", "nobody")
        .first(&driver, &mut dst)
        .await
        .unwrap_err();
    assert!(err.is_done());
    Ok(())
}

#[tokio::test]
async fn first_captures_one_row_and_closes() -> Result<()> {
    let registry = Registry::new();
    let driver = MemoryDriver::new();
    let original = tweet("me", "only one");
    save_entity(&driver, &registry, &original).await?;

    let mut dst = Tweet::default();
    Query::<Tweet>::new(&registry)?
        .filter("timeline =", "me")
        .first(&driver, &mut dst)
        .await?;
    assert_eq!(dst, original);
    Ok(())
}

/// Driver whose cursor fails on close: exhaustion must surface the close
/// error instead of the Done sentinel.
struct FragileDriver;

struct FragileRows {
    columns: Vec<String>,
}

#[async_trait]
impl Driver for FragileDriver {
    async fn query(&self, _cql: &str, _values: &[Value]) -> Result<Box<dyn Rows>, DriverError> {
        Ok(Box::new(FragileRows { columns: Vec::new() }))
    }

    async fn execute(&self, _cql: &str, _values: &[Value]) -> Result<(), DriverError> {
        Ok(())
    }
}

#[async_trait]
impl Rows for FragileRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn scan(&mut self) -> Option<Vec<Value>> {
        None
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        Err(DriverError::new("cursor teardown failed"))
    }
}

#[tokio::test]
async fn close_errors_at_exhaustion_propagate() -> Result<()> {
    let registry = Registry::new();
    let mut iter = Query::<Tweet>::new(&registry)?.run(&FragileDriver).await;
    let mut dst = Tweet::default();
    let err = iter.next(&mut dst).await.unwrap_err();
    match err {
        QueryError::Driver(inner) => assert_eq!(inner.to_string(), "cursor teardown failed"),
        other => panic!("expected driver error, got {other:?}"),
    }
    Ok(())
}
