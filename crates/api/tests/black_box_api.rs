use std::sync::Arc;

use reqwest::StatusCode;

use stockroom_api::app::router_with;
use stockroom_api::app::services::{AppServices, StockTable};
use stockroom_api::context::SessionStore;
use stockroom_infra::table::{Column, Filter, StockRecord};
use stockroom_infra::{AppConfig, InMemoryTable, TableClient, TableError};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod (no table URL configured, so the shared store is in memory).
        let app = stockroom_api::app::build_app(&AppConfig::default()).unwrap();
        Self::serve(app).await
    }

    async fn spawn_with_table(table: StockTable) -> Self {
        Self::spawn_with(SessionStore::new(), table).await
    }

    async fn spawn_with(sessions: SessionStore, table: StockTable) -> Self {
        let services = AppServices::new(sessions, table, "test table");
        Self::serve(router_with(Arc::new(services))).await
    }

    async fn serve(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A browser: keeps its session cookie between requests.
fn browser() -> reqwest::Client {
    reqwest::Client::builder().cookie_store(true).build().unwrap()
}

async fn post(
    client: &reqwest::Client,
    srv: &TestServer,
    path: &str,
    form: &[(&str, &str)],
) -> (StatusCode, String) {
    let res = client.post(srv.url(path)).form(form).send().await.unwrap();
    let status = res.status();
    (status, res.text().await.unwrap())
}

async fn get(client: &reqwest::Client, srv: &TestServer, path: &str) -> (StatusCode, String) {
    let res = client.get(srv.url(path)).send().await.unwrap();
    let status = res.status();
    (status, res.text().await.unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_visit_sets_session_cookie() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/ledger")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("stockroom_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn ledger_widget_scenario() {
    let srv = TestServer::spawn().await;
    let client = browser();

    let form = [("name", "widget"), ("quantity", "5")];
    let (status, body) = post(&client, &srv, "/ledger/add", &form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Added new item WIDGET with quantity 5."));
    assert!(body.contains("<tr><td>1</td><td>WIDGET</td><td>5</td></tr>"));

    let form = [("name", " Widget "), ("quantity", "3")];
    let (status, body) = post(&client, &srv, "/ledger/add", &form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<tr><td>1</td><td>WIDGET</td><td>8</td></tr>"));

    let (status, body) = post(
        &client,
        &srv,
        "/ledger/adjust",
        &[("name", "WIDGET"), ("direction", "issue"), ("amount", "8")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("WIDGET reached 0 and was removed"));
    assert!(body.contains("The stockroom is <strong>empty</strong>"));

    let (status, body) = post(
        &client,
        &srv,
        "/ledger/adjust",
        &[("name", "WIDGET"), ("direction", "issue"), ("amount", "1")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("WIDGET is not in the stockroom."));
    assert!(body.contains("The stockroom is <strong>empty</strong>"));
}

#[tokio::test]
async fn ledger_rejects_invalid_input_without_changes() {
    let srv = TestServer::spawn().await;
    let client = browser();

    post(&client, &srv, "/ledger/add", &[("name", "bolt"), ("quantity", "2")]).await;

    for form in [
        vec![("name", "   "), ("quantity", "4")],
        vec![("name", "bolt"), ("quantity", "0")],
        vec![("name", "bolt"), ("quantity", "lots")],
        vec![("name", "bolt")],
    ] {
        let (status, body) = post(&client, &srv, "/ledger/add", &form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "form {form:?}");
        assert!(body.contains("<tr><td>1</td><td>BOLT</td><td>2</td></tr>"));
    }

    let (status, body) = post(
        &client,
        &srv,
        "/ledger/adjust",
        &[("name", "bolt"), ("direction", "issue"), ("amount", "3")],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("Cannot issue 3 of BOLT: only 2 in stock."));
    assert!(body.contains("<tr><td>1</td><td>BOLT</td><td>2</td></tr>"));
}

#[tokio::test]
async fn ledger_remove_requires_confirmation() {
    let srv = TestServer::spawn().await;
    let client = browser();
    post(&client, &srv, "/ledger/add", &[("name", "crate"), ("quantity", "40")]).await;

    let (status, _) = post(&client, &srv, "/ledger/remove", &[("name", "CRATE")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let form = [("name", "CRATE"), ("confirm", "yes")];
    let (status, body) = post(&client, &srv, "/ledger/remove", &form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("CRATE was removed from the stockroom (40 discarded)."));
    assert!(body.contains("The stockroom is <strong>empty</strong>"));
}

#[tokio::test]
async fn sessions_do_not_share_ledgers() {
    let srv = TestServer::spawn().await;
    let alice = browser();
    let bob = browser();

    post(&alice, &srv, "/ledger/add", &[("name", "secret"), ("quantity", "1")]).await;

    let (_, body) = get(&bob, &srv, "/ledger").await;
    assert!(!body.contains("SECRET"));

    let (_, body) = get(&alice, &srv, "/ledger").await;
    assert!(body.contains("SECRET"));
}

#[tokio::test]
async fn catalog_add_duplicate_and_remove() {
    let srv = TestServer::spawn().await;
    let client = browser();

    let (status, _) = post(&client, &srv, "/catalog/add", &[("name", "wrench")]).await;
    assert_eq!(status, StatusCode::OK);
    post(&client, &srv, "/catalog/add", &[("name", "anvil")]).await;

    let (status, body) = post(&client, &srv, "/catalog/add", &[("name", "Wrench ")]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("WRENCH is already in the stockroom."));

    let anvil = body.find("<li>ANVIL</li>").unwrap();
    let wrench = body.find("<li>WRENCH</li>").unwrap();
    assert!(anvil < wrench);

    let (status, _) = post(&client, &srv, "/catalog/remove", &[("name", "drill")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post(&client, &srv, "/catalog/remove", &[("name", "ANVIL")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<li>ANVIL</li>"));
}

#[tokio::test]
async fn user_text_is_escaped() {
    let srv = TestServer::spawn().await;
    let client = browser();

    let (_, body) = post(&client, &srv, "/catalog/add", &[("name", "<script>x</script>")]).await;
    assert!(body.contains("&lt;SCRIPT&gt;X&lt;/SCRIPT&gt;"));
    assert!(!body.contains("<SCRIPT>"));
}

#[tokio::test]
async fn store_is_shared_across_sessions() {
    let srv = TestServer::spawn_with_table(Arc::new(InMemoryTable::new())).await;
    let alice = browser();
    let bob = browser();

    let form = [("name", "pallet"), ("quantity", "3")];
    let (status, _) = post(&alice, &srv, "/store/add", &form).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &bob,
        &srv,
        "/store/adjust",
        &[("name", "PALLET"), ("direction", "receive"), ("amount", "2")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Received 2 of PALLET. New quantity: 5."));

    let (_, body) = get(&alice, &srv, "/store").await;
    assert!(body.contains("<tr><td>1</td><td>PALLET</td><td>5</td></tr>"));
    assert!(body.contains("test table"));
}

#[tokio::test]
async fn store_widget_scenario() {
    let srv = TestServer::spawn().await;
    let client = browser();

    post(&client, &srv, "/store/add", &[("name", "widget"), ("quantity", "5")]).await;
    let form = [("name", " Widget "), ("quantity", "3")];
    let (_, body) = post(&client, &srv, "/store/add", &form).await;
    assert!(body.contains("<tr><td>1</td><td>WIDGET</td><td>8</td></tr>"));

    let (status, body) = post(
        &client,
        &srv,
        "/store/adjust",
        &[("name", "widget"), ("direction", "issue"), ("amount", "8")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("The stockroom is <strong>empty</strong>"));

    let (status, _) = post(
        &client,
        &srv,
        "/store/adjust",
        &[("name", "widget"), ("direction", "issue"), ("amount", "1")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_views_do_not_store_sessions() {
    let sessions = SessionStore::new();
    let srv = TestServer::spawn_with(sessions.clone(), Arc::new(InMemoryTable::new())).await;

    // No cookie store: every request is a new visitor.
    let visitor = reqwest::Client::new();
    for path in ["/ledger", "/catalog", "/store"].iter().cycle().take(60) {
        let (status, _) = get(&visitor, &srv, path).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert!(sessions.is_empty());

    let client = browser();
    get(&client, &srv, "/ledger").await;
    post(&client, &srv, "/catalog/add", &[("name", "saw")]).await;
    assert_eq!(sessions.len(), 1);
}

/// Table whose full listing always fails; single-row reads and writes work.
struct ListingDown {
    inner: InMemoryTable,
}

#[async_trait::async_trait]
impl TableClient for ListingDown {
    async fn select_all_ordered_by(&self, _: Column) -> Result<Vec<StockRecord>, TableError> {
        Err(TableError::Unavailable("listing down".to_string()))
    }

    async fn select_where(&self, filter: &Filter) -> Result<Vec<StockRecord>, TableError> {
        self.inner.select_where(filter).await
    }

    async fn insert(&self, record: &StockRecord) -> Result<(), TableError> {
        self.inner.insert(record).await
    }

    async fn update(&self, record: &StockRecord, filter: &Filter) -> Result<u64, TableError> {
        self.inner.update(record, filter).await
    }

    async fn delete(&self, filter: &Filter) -> Result<u64, TableError> {
        self.inner.delete(filter).await
    }
}

#[tokio::test]
async fn store_write_is_reported_even_when_listing_fails() {
    let table = Arc::new(ListingDown {
        inner: InMemoryTable::new(),
    });
    let srv = TestServer::spawn_with_table(table.clone()).await;
    let client = browser();

    let form = [("name", "widget"), ("quantity", "5")];
    let (status, body) = post(&client, &srv, "/store/add", &form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Added new item WIDGET with quantity 5."));
    assert!(body.contains("The stock list could not be loaded right now."));
    assert!(!body.contains("Nothing was changed"));

    let rows = table.select_where(&Filter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].name.as_str(), rows[0].quantity), ("WIDGET", 5));

    let (status, body) = get(&client, &srv, "/store").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("The stock list could not be loaded right now."));
}
