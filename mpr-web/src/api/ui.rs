//! UI Routes - server-rendered HTML pages

use axum::{extract::State, response::Html, routing::get, Router};

use crate::error::ApiResult;
use crate::pages::Page;
use crate::AppState;

/// Build page routes (`/cadastro` GET lives with the registration routes)
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/busca", get(search_page))
        .route("/envolvidos", get(involved_page))
        .route("/fontes", get(sources_page))
}

pub(crate) async fn render(state: &AppState, page: Page) -> ApiResult<Html<String>> {
    state.templates.render(page).await.map(Html)
}

/// GET /
async fn home_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Home).await
}

/// GET /busca
///
/// The record list itself is fetched by the page from /api/dados.
async fn search_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Search).await
}

/// GET /envolvidos
async fn involved_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Involved).await
}

/// GET /fontes
async fn sources_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Sources).await
}
