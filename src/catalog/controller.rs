use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use crate::books::domain::model::{BookEntity, BookForm};
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::add_copy_cmd::{AddCopyCommand, AddCopyCommandRequest, AddCopyCommandResponse};
use crate::catalog::command::available_copies_cmd::{AvailableCopiesCommand, AvailableCopiesCommandRequest, AvailableCopiesCommandResponse};
use crate::catalog::command::book_categories_cmd::{BookCategoriesCommand, BookCategoriesCommandRequest, BookCategoriesCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::list_copies_cmd::{ListCopiesCommand, ListCopiesCommandRequest, ListCopiesCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::remove_copy_cmd::{RemoveCopyCommand, RemoveCopyCommandRequest, RemoveCopyCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::catalog::command::update_copy_cmd::{UpdateCopyCommand, UpdateCopyCommandRequest, UpdateCopyCommandResponse};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::copies::domain::model::CopyEntity;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;

fn build_service(state: &AppState) -> Box<dyn CatalogService> {
    factory::create_catalog_service(&state.config, &state.handles)
}

pub async fn list_books(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<ListQuery>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let res = ListBooksCommand::new(build_service(&state)).execute(ListBooksCommandRequest::new(ctx, query)).await?;
    Ok(Json(res))
}

pub async fn book_categories(
    State(state): State<AppState>,
    ctx: SessionContext) -> Result<Json<BookCategoriesCommandResponse>, ServerError> {
    let res = BookCategoriesCommand::new(build_service(&state)).execute(BookCategoriesCommandRequest::new(ctx)).await?;
    Ok(Json(res))
}

pub async fn add_book(
    State(state): State<AppState>,
    ctx: SessionContext,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let form: BookForm = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(build_service(&state)).execute(AddBookCommandRequest::new(ctx, BookEntity::from(form))).await?;
    Ok(Json(res))
}

pub async fn update_book(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(book_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let book: BookEntity = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::new(ctx, book_id.as_str(), book);
    let res = UpdateBookCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn remove_book(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(book_id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest::new(ctx, book_id.as_str());
    let res = RemoveBookCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn list_copies(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<ListQuery>) -> Result<Json<ListCopiesCommandResponse>, ServerError> {
    let res = ListCopiesCommand::new(build_service(&state)).execute(ListCopiesCommandRequest::new(ctx, query)).await?;
    Ok(Json(res))
}

pub async fn available_copies(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<ListQuery>) -> Result<Json<AvailableCopiesCommandResponse>, ServerError> {
    let req = AvailableCopiesCommandRequest::new(ctx, query.search);
    let res = AvailableCopiesCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn add_copy(
    State(state): State<AppState>,
    ctx: SessionContext,
    json: Json<Value>) -> Result<Json<AddCopyCommandResponse>, ServerError> {
    let copy: CopyEntity = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddCopyCommand::new(build_service(&state)).execute(AddCopyCommandRequest::new(ctx, copy)).await?;
    Ok(Json(res))
}

pub async fn update_copy(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(copy_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateCopyCommandResponse>, ServerError> {
    let copy: CopyEntity = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateCopyCommandRequest::new(ctx, copy_id.as_str(), copy);
    let res = UpdateCopyCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn remove_copy(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(copy_id): Path<String>) -> Result<Json<RemoveCopyCommandResponse>, ServerError> {
    let req = RemoveCopyCommandRequest::new(ctx, copy_id.as_str());
    let res = RemoveCopyCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use crate::app;
    use crate::books::domain::model::BookEntity;
    use crate::copies::domain::model::CopyEntity;
    use crate::core::controller::AppState;
    use crate::core::domain::Configuration;
    use crate::core::library::CopyStatus;
    use crate::gateway::factory::memory_handles;
    use crate::gateway::memory::MemoryCatalog;

    fn state() -> AppState {
        let catalog = MemoryCatalog::new();
        catalog.seed(vec![BookEntity::new("Germinal", Some("Zola"), 1).with_id("B1")],
                     vec![CopyEntity::new("B1", Some("A1"), CopyStatus::Borrowed).with_id("C1")],
                     vec![], vec![]).unwrap();
        AppState::with_handles(Configuration::new("http://unused"), memory_handles(catalog))
    }

    fn request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_should_add_and_list_books() {
        let app = app(state());
        let res = app.clone().oneshot(request(Method::POST, "/books",
                                               json!({"title": "Nana", "author": "Zola", "category": "Roman", "totalCopies": 2})))
            .await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
        assert_eq!(2, body_json(res).await["book"]["availableCopies"]);

        let res = app.clone().oneshot(request(Method::GET, "/books?search=zola&sort=asc", json!({}))).await.unwrap();
        assert_eq!(2, body_json(res).await["books"]["total"]);

        let res = app.oneshot(request(Method::GET, "/books/categories", json!({}))).await.unwrap();
        assert_eq!(json!(["Roman"]), body_json(res).await["categories"]);
    }

    #[tokio::test]
    async fn test_should_refuse_releasing_borrowed_copy() {
        let app = app(state());
        let res = app.clone().oneshot(request(Method::PUT, "/copies/C1",
                                               json!({"book": {"id": "B1"}, "status": "AVAILABLE"}))).await.unwrap();
        assert_eq!(StatusCode::CONFLICT, res.status());

        let res = app.clone().oneshot(request(Method::DELETE, "/copies/C1", json!({}))).await.unwrap();
        assert_eq!(StatusCode::CONFLICT, res.status());

        let res = app.oneshot(request(Method::GET, "/copies/available", json!({}))).await.unwrap();
        assert_eq!(json!([]), body_json(res).await["copies"]);
    }
}
