use std::marker::PhantomData;
use std::time::Duration;
use async_trait::async_trait;
use rand::Rng;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::copies::domain::model::CopyEntity;
use crate::copies::repository::CopyRepository;
use crate::core::domain::{Configuration, Identifiable};
use crate::core::library::{LibraryError, LibraryResult, LoanStatus};
use crate::core::repository::{find_by_id, Repository};
use crate::core::session::SessionContext;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;
use crate::utils::http::build_http_client;

const BACKOFF_BASE_MS: u64 = 100;
const BACKOFF_JITTER_MS: u64 = 50;
const MAX_BODY_IN_ERROR: usize = 200;

/// A record the Catalog Store exposes as a REST collection.
pub trait RestResource: Identifiable + Clone + Sized + 'static {
    type Wire: Serialize + DeserializeOwned + Send + Sync;
    const KIND: &'static str;

    fn list_path() -> &'static str;
    fn create_path() -> &'static str;
    // None when the collection does not support the operation
    fn update_path(&self) -> Option<String>;
    fn delete_path(id: &str) -> Option<String>;
    fn to_wire(&self) -> Self::Wire;
    fn from_wire(wire: Self::Wire) -> LibraryResult<Self>;
}

/// HTTP client for the Catalog Store.
///
/// Every request carries the configured timeout. Idempotent requests (GET, PUT, DELETE) that
/// fail at the transport level are retried up to `max_retries` times with a jittered backoff;
/// POST is sent exactly once.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::PUT | Method::DELETE)
}

fn backoff_delay(attempt: u32) -> Duration {
    let jitter = rand::thread_rng().gen_range(0..BACKOFF_JITTER_MS);
    Duration::from_millis(BACKOFF_BASE_MS * attempt as u64 + jitter)
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_BODY_IN_ERROR).collect()
}

impl CatalogClient {
    pub fn new(config: &Configuration) -> LibraryResult<Self> {
        Ok(Self {
            http: build_http_client(&config.client)?,
            base_url: config.catalog_url.trim_end_matches('/').to_string(),
            max_retries: config.client.max_retries,
        })
    }

    pub async fn execute(&self, ctx: Option<&SessionContext>, method: Method, path: &str,
                         query: &[(&str, &str)], body: Option<&Value>) -> LibraryResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let attempts = if is_idempotent(&method) { self.max_retries + 1 } else { 1 };
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.execute_once(ctx, method.clone(), url.as_str(), query, body).await {
                Ok(value) => {
                    return Ok(value);
                }
                Err(err) if err.retryable() && attempt < attempts => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!("{} {} failed on attempt {}/{}, retrying in {:?}: {}",
                        method, url, attempt, attempts, delay, err);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::warn!("{} {} failed: {}", method, url, err);
                    return Err(err);
                }
            }
        }
    }

    async fn execute_once(&self, ctx: Option<&SessionContext>, method: Method, url: &str,
                          query: &[(&str, &str)], body: Option<&Value>) -> LibraryResult<Value> {
        let mut req = self.http.request(method.clone(), url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(ctx) = ctx {
            req = req.bearer_auth(ctx.token());
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!("{} {} -> {}", method, url, status);
        if !status.is_success() {
            return Err(LibraryError::from_status(
                status.as_u16(), format!("{} {} {}", method, url, truncate(text.as_str())).as_str()));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // some endpoints answer with a bare message
        Ok(serde_json::from_str(text.as_str()).unwrap_or(Value::String(text)))
    }

    pub async fn get(&self, ctx: &SessionContext, path: &str) -> LibraryResult<Value> {
        self.execute(Some(ctx), Method::GET, path, &[], None).await
    }

    pub async fn post<B: Serialize>(&self, ctx: Option<&SessionContext>, path: &str, body: &B) -> LibraryResult<Value> {
        let body = serde_json::to_value(body)?;
        self.execute(ctx, Method::POST, path, &[], Some(&body)).await
    }

    pub async fn put<B: Serialize>(&self, ctx: &SessionContext, path: &str, body: &B) -> LibraryResult<Value> {
        let body = serde_json::to_value(body)?;
        self.execute(Some(ctx), Method::PUT, path, &[], Some(&body)).await
    }

    pub async fn delete(&self, ctx: &SessionContext, path: &str) -> LibraryResult<Value> {
        self.execute(Some(ctx), Method::DELETE, path, &[], None).await
    }
}

// Invalid records are dropped from lists so one bad row does not hide the others.
pub(crate) fn decode_list<E: RestResource>(value: Value) -> LibraryResult<Vec<E>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => vec![],
        other => {
            return Err(LibraryError::serialization(
                format!("expected a list of {} but got {}", E::KIND, truncate(other.to_string().as_str())).as_str()));
        }
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let decoded = serde_json::from_value::<E::Wire>(item)
            .map_err(LibraryError::from)
            .and_then(E::from_wire);
        match decoded {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!("skipping invalid {} record: {}", E::KIND, err),
        }
    }
    Ok(records)
}

// The stored record when the store echoes one, otherwise None.
// An object without an id is an acknowledgement such as {"message": ..}, not a record.
pub(crate) fn decode_one<E: RestResource>(value: Value) -> LibraryResult<Option<E>> {
    let has_id = |v: &Value| match v.get("id") {
        None | Some(Value::Null) => false,
        Some(Value::String(id)) => !id.trim().is_empty(),
        Some(_) => true,
    };
    match value {
        Value::Object(_) if has_id(&value) => {
            let wire: E::Wire = serde_json::from_value(value)?;
            E::from_wire(wire).map(Some)
        }
        _ => Ok(None),
    }
}

pub struct RestRepository<E: RestResource> {
    client: CatalogClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: RestResource> RestRepository<E> {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: RestResource> Repository<E> for RestRepository<E> {
    async fn list(&self, ctx: &SessionContext) -> LibraryResult<Vec<E>> {
        let value = self.client.get(ctx, E::list_path()).await?;
        decode_list(value)
    }

    async fn create(&self, ctx: &SessionContext, entity: &E) -> LibraryResult<E> {
        let value = self.client.post(Some(ctx), E::create_path(), &entity.to_wire()).await?;
        match decode_one(value)? {
            Some(stored) => Ok(stored),
            None => {
                tracing::debug!("catalog store did not echo the new {}", E::KIND);
                Ok(entity.clone())
            }
        }
    }

    async fn update(&self, ctx: &SessionContext, entity: &E) -> LibraryResult<E> {
        let path = entity.update_path().ok_or_else(|| LibraryError::runtime(
            format!("{} records cannot be updated", E::KIND).as_str(), None))?;
        let value = self.client.put(ctx, path.as_str(), &entity.to_wire()).await?;
        Ok(decode_one(value)?.unwrap_or_else(|| entity.clone()))
    }

    async fn delete(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        let path = E::delete_path(id).ok_or_else(|| LibraryError::runtime(
            format!("{} records cannot be deleted", E::KIND).as_str(), None))?;
        self.client.delete(ctx, path.as_str()).await.map(|_| ())
    }
}

impl BookRepository for RestRepository<BookEntity> {}

impl CopyRepository for RestRepository<CopyEntity> {}

impl MemberRepository for RestRepository<MemberEntity> {}

#[async_trait]
impl LoanRepository for RestRepository<LoanEntity> {
    async fn change_status(&self, ctx: &SessionContext, id: &str, status: LoanStatus) -> LibraryResult<LoanEntity> {
        let path = format!("/api/loan/changeStatus/{}", id);
        let value = self.client.execute(
            Some(ctx), Method::PUT, path.as_str(), &[("status", status.label())], None).await?;
        match decode_one::<LoanEntity>(value)? {
            Some(loan) => Ok(loan),
            None => {
                let loans = self.list(ctx).await?;
                find_by_id(&loans, LoanEntity::KIND, id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use crate::books::domain::model::BookEntity;
    use crate::core::domain::{ClientOptions, Configuration};
    use crate::core::library::{LibraryError, LoanStatus};
    use crate::core::repository::Repository;
    use crate::core::session::SessionContext;
    use crate::gateway::rest::{CatalogClient, RestRepository};
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::repository::LoanRepository;

    #[derive(Clone, Default)]
    struct Stub {
        calls: Arc<AtomicUsize>,
    }

    async fn list_books(State(stub): State<Stub>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or("");
        if auth != "Bearer t0k" {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad token"})));
        }
        (StatusCode::OK, Json(json!([
            {"id": 1, "title": "Germinal", "totalCopies": 2, "availableCopies": 1},
            {"id": 2},
            {"id": 3, "title": "Nana", "totalCopies": "x"}
        ])))
    }

    async fn add_loan(State(stub): State<Stub>) -> StatusCode {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(300)).await;
        StatusCode::CREATED
    }

    async fn slow_list(State(stub): State<Stub>) -> Json<Value> {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(300)).await;
        Json(json!([]))
    }

    async fn change_status(State(stub): State<Stub>, Query(q): Query<std::collections::HashMap<String, String>>) -> (StatusCode, String) {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        if q.get("status").map(String::as_str) != Some("Retourné") {
            return (StatusCode::BAD_REQUEST, "bad status".to_string());
        }
        (StatusCode::OK, "Statut mis à jour".to_string())
    }

    async fn returned_loans() -> Json<Value> {
        Json(json!([
            {"id": 7, "status": "RETURNED", "member": {"id": 1}, "bookCopies": [{"id": 3}],
             "loanDate": "2024-03-01", "dueDate": "2024-03-10", "returnDate": "2024-03-05"}
        ]))
    }

    async fn acknowledge(State(stub): State<Stub>) -> Json<Value> {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        Json(json!({"message": "Emprunt enregistré"}))
    }

    async fn acknowledged_status() -> Json<Value> {
        Json(json!({"message": "Statut mis à jour"}))
    }

    async fn conflict() -> (StatusCode, &'static str) {
        (StatusCode::CONFLICT, "copy not available")
    }

    fn spawn_stub(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener).unwrap().serve(app.into_make_service());
        tokio::spawn(server);
        addr
    }

    fn client(addr: SocketAddr, timeout_ms: u64, max_retries: u32) -> CatalogClient {
        let mut config = Configuration::new(format!("http://{}", addr).as_str());
        config.client = ClientOptions { timeout_ms, max_retries };
        CatalogClient::new(&config).unwrap()
    }

    fn ctx() -> SessionContext {
        SessionContext::new("t0k", "1")
    }

    #[tokio::test]
    async fn test_should_forward_bearer_and_skip_invalid_records() {
        let stub = Stub::default();
        let addr = spawn_stub(Router::new()
            .route("/api/book/listBooks", get(list_books))
            .with_state(stub.clone()));
        let repo: RestRepository<BookEntity> = RestRepository::new(client(addr, 2_000, 1));

        let books = repo.list(&ctx()).await.expect("should list books");
        assert_eq!(1, books.len());
        assert_eq!("Germinal", books[0].title.as_str());

        let err = repo.list(&SessionContext::new("other", "1")).await.unwrap_err();
        assert!(matches!(err, LibraryError::Auth { .. }));
        // 401 is not a transport failure, so no retry
        assert_eq!(2, stub.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_map_conflict_status() {
        let addr = spawn_stub(Router::new().route("/api/loan/addLoan", post(conflict)));
        let repo: RestRepository<LoanEntity> = RestRepository::new(client(addr, 2_000, 1));
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let loan = LoanEntity::new("1", &["3".to_string()], d(1), d(10));
        let err = repo.create(&ctx(), &loan).await.unwrap_err();
        assert!(matches!(err, LibraryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_should_retry_idempotent_request_on_timeout() {
        let stub = Stub::default();
        let addr = spawn_stub(Router::new()
            .route("/api/book/listBooks", get(slow_list))
            .with_state(stub.clone()));
        let repo: RestRepository<BookEntity> = RestRepository::new(client(addr, 100, 2));
        let err = repo.list(&ctx()).await.unwrap_err();
        assert!(matches!(err, LibraryError::Network { retryable: true, .. }));
        assert_eq!(3, stub.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_never_retry_post() {
        let stub = Stub::default();
        let addr = spawn_stub(Router::new()
            .route("/api/loan/addLoan", post(add_loan))
            .with_state(stub.clone()));
        let repo: RestRepository<LoanEntity> = RestRepository::new(client(addr, 100, 3));
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let loan = LoanEntity::new("1", &["3".to_string()], d(1), d(10));
        let err = repo.create(&ctx(), &loan).await.unwrap_err();
        assert!(matches!(err, LibraryError::Network { .. }));
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(1, stub.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_send_french_label_and_refetch_loan() {
        let stub = Stub::default();
        let addr = spawn_stub(Router::new()
            .route("/api/loan/changeStatus/:id", put(change_status))
            .route("/api/loan/listLoan", get(returned_loans))
            .with_state(stub.clone()));
        let repo: RestRepository<LoanEntity> = RestRepository::new(client(addr, 2_000, 0));
        let loan = repo.change_status(&ctx(), "7", LoanStatus::Returned).await.expect("should change status");
        assert_eq!(LoanStatus::Returned, loan.status);
        assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 5), loan.return_date);
        assert_eq!(1, stub.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_accept_acknowledgement_without_record() {
        let stub = Stub::default();
        let addr = spawn_stub(Router::new()
            .route("/api/loan/addLoan", post(acknowledge))
            .route("/api/loan/changeStatus/:id", put(acknowledged_status))
            .route("/api/loan/listLoan", get(returned_loans))
            .with_state(stub.clone()));
        let repo: RestRepository<LoanEntity> = RestRepository::new(client(addr, 2_000, 0));
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let loan = LoanEntity::new("1", &["3".to_string()], d(1), d(10));

        let created = repo.create(&ctx(), &loan).await.expect("acknowledged create should succeed");
        assert_eq!(loan, created);
        assert_eq!(1, stub.calls.load(Ordering::SeqCst));

        let returned = repo.change_status(&ctx(), "7", LoanStatus::Returned).await
            .expect("acknowledged status change should succeed");
        assert_eq!(LoanStatus::Returned, returned.status);
    }

    #[tokio::test]
    async fn test_should_refuse_unsupported_operations() {
        let addr = spawn_stub(Router::new());
        let repo: RestRepository<LoanEntity> = RestRepository::new(client(addr, 2_000, 0));
        assert!(matches!(repo.delete(&ctx(), "1").await, Err(LibraryError::Runtime { .. })));
    }
}
