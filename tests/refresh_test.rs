//! Refresh pipeline tests
//!
//! Drives the full fetch → join → session flow against an in-memory XML source.

use std::collections::HashMap;

use async_trait::async_trait;
use pubdash::error::{AppError, Result};
use pubdash::models::RepositoryConfig;
use pubdash::pipeline::run_refresh;
use pubdash::query::{DepartmentFilter, PageSize};
use pubdash::services::RepositoryApi;
use pubdash::session::Session;
use pubdash::utils::{XmlSource, xml};
use serde_json::Value;

#[derive(Default)]
struct StubSource {
    documents: HashMap<String, String>,
}

impl StubSource {
    fn with(mut self, path: &str, body: &str) -> Self {
        self.documents.insert(path.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl XmlSource for StubSource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        match self.documents.get(path) {
            Some(body) => xml::parse(body),
            None => Err(AppError::fetch(path, "503 Service Unavailable")),
        }
    }
}

const COLLECTIONS: &str = "\
<collections>
  <collection><id>10</id><name>Department of Aeronautics</name><numberItems>2</numberItems></collection>
  <collection><id>20</id><name>Department of Bioengineering</name><numberItems>1</numberItems></collection>
</collections>";

const AERO_ITEMS: &str = "\
<items>
  <item>
    <id>4242</id>
    <name>Wing flutter</name>
    <lastModified>2017-09-01 12:00:00.0</lastModified>
    <metadata><key>dc.contributor.author</key><value>Okafor, C.</value></metadata>
    <metadata><key>dc.contributor.author</key><value>Lindqvist, E.</value></metadata>
    <metadata><key>dc.title</key><value>Wing flutter</value></metadata>
  </item>
  <item>
    <id>51</id>
    <name>Page 42 study</name>
    <metadata><key>dc.contributor.author</key><value>Smith, A.</value></metadata>
  </item>
</items>";

fn config() -> RepositoryConfig {
    RepositoryConfig {
        item_limit: 500,
        ..RepositoryConfig::default()
    }
}

fn items_path(id: &str) -> String {
    format!("/collections/{id}/items?expand=metadata&limit=500")
}

#[tokio::test]
async fn test_failed_department_is_isolated() {
    let source = StubSource::default()
        .with("/communities/5/collections", COLLECTIONS)
        .with(&items_path("10"), AERO_ITEMS);
    let api = RepositoryApi::new(source, config());

    let outcome = run_refresh(&api, 4).await;
    assert_eq!(outcome.departments.len(), 2);
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records.iter().all(|r| r.department_id == "10"));
    assert!(outcome.records.iter().all(|r| r.department_name == "Aeronautics"));
    assert_eq!(outcome.failed_departments.len(), 1);
    assert_eq!(outcome.failed_departments[0].department_id, "20");
}

#[tokio::test]
async fn test_department_listing_failure_yields_empty_catalog() {
    let api = RepositoryApi::new(StubSource::default(), config());
    let outcome = run_refresh(&api, 4).await;
    assert!(outcome.departments.is_empty());
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn test_single_item_department_is_normalized() {
    let source = StubSource::default()
        .with("/communities/5/collections", COLLECTIONS)
        .with(&items_path("10"), AERO_ITEMS)
        .with(
            &items_path("20"),
            "<items><item><id>7</id><name>Tissue scaffolds</name>\
             <metadata><key>dc.contributor.author</key><value>Mbeki, T.</value></metadata>\
             </item></items>",
        );
    let api = RepositoryApi::new(source, config());

    let outcome = run_refresh(&api, 1).await;
    let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["4242", "51", "7"]);
    assert_eq!(outcome.records[2].metadata.len(), 1);
    assert_eq!(outcome.records[0].metadata.len(), 3);
}

#[tokio::test]
async fn test_session_search_over_refreshed_catalog() {
    let source = StubSource::default()
        .with("/communities/5/collections", COLLECTIONS)
        .with(&items_path("10"), AERO_ITEMS)
        .with(
            &items_path("20"),
            "<items><item><id>8</id><name>Gait analysis</name></item></items>",
        );
    let api = RepositoryApi::new(source, config());

    let mut session = Session::new(PageSize::Ten, "Department of ");
    run_refresh(&api, 2).await.apply(&mut session);
    assert_eq!(session.records().len(), 3);

    session
        .select_department(DepartmentFilter::Department("20".into()))
        .unwrap();
    assert_eq!(session.view().total_matches, 1);

    session.set_search("42");
    let view = session.view();
    let ids: Vec<_> = view.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["4242", "51"]);

    let stats = session.stats(2024);
    assert_eq!(stats.total, 1);
    assert_eq!(stats.declared_total, 1);
}

#[tokio::test]
async fn test_department_flag_after_failed_listing_shows_empty_state() {
    let api = RepositoryApi::new(StubSource::default(), config());

    let mut session = Session::new(PageSize::Ten, "Department of ");
    run_refresh(&api, 2).await.apply(&mut session);
    session
        .select_department_or_all(DepartmentFilter::Department("10".into()))
        .unwrap();

    let view = session.view();
    assert_eq!(view.total_matches, 0);
    assert_eq!(view.empty_message.as_deref(), Some("No articles found."));
    assert_eq!(session.stats(2024).total, 0);
}
