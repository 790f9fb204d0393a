//! Category management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::state::AppState;
use crate::store::StoreError;

/// Add category form.
#[derive(Debug, Deserialize)]
pub struct AddCategoryForm {
    #[serde(default)]
    pub name: String,
}

/// Rename category form.
#[derive(Debug, Deserialize)]
pub struct RenameCategoryForm {
    pub old: String,
    #[serde(default)]
    pub new: String,
}

/// Delete category form.
#[derive(Debug, Deserialize)]
pub struct DeleteCategoryForm {
    pub name: String,
}

/// A row of the category table.
#[derive(Clone)]
pub struct CategoryRow {
    pub label: String,
    pub product_count: usize,
}

/// Category manager template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories.html")]
pub struct CategoriesTemplate {
    pub page: PageContext,
    pub categories: Vec<CategoryRow>,
    pub error: Option<String>,
    pub new_name: String,
}

/// Render the manager, optionally with a rejected submission.
async fn render(
    state: &AppState,
    page: PageContext,
    error: Option<String>,
    new_name: String,
) -> Result<CategoriesTemplate> {
    let list = state.categories().list().await?;
    let catalog = state.products().catalog().await?;

    let categories = list
        .display()
        .map(|label| CategoryRow {
            label: label.to_string(),
            product_count: catalog.in_category(label).count(),
        })
        .collect();

    Ok(CategoriesTemplate {
        page,
        categories,
        error,
        new_name,
    })
}

/// Re-render with the rejection for category errors; anything else propagates.
async fn rejected(
    state: &AppState,
    page: PageContext,
    err: StoreError,
    new_name: String,
) -> Result<Response> {
    match err {
        StoreError::Category(e) => {
            tracing::debug!(error = %e, "Category change rejected");
            let template = render(state, page, Some(e.to_string()), new_name).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
        other => Err(AppError::from(other)),
    }
}

/// Category manager handler.
#[instrument(skip(state, page))]
pub async fn index(State(state): State<AppState>, page: PageContext) -> Result<impl IntoResponse> {
    render(&state, page, None, String::new()).await
}

/// Add category handler.
#[instrument(skip(state, session, page))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<AddCategoryForm>,
) -> Result<Response> {
    match state.categories().add(&form.name).await {
        Ok(label) => {
            Flash::success(format!("Category \"{label}\" has been added"))
                .push(&session)
                .await?;
            Ok(Redirect::to("/admin/categories").into_response())
        }
        Err(e) => rejected(&state, page, e, form.name).await,
    }
}

/// Rename category handler. Products move to the new label.
#[instrument(skip(state, session, page))]
pub async fn rename(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<RenameCategoryForm>,
) -> Result<Response> {
    match state.categories().rename(&form.old, &form.new).await {
        Ok((label, moved)) => {
            Flash::success(format!(
                "Category \"{}\" renamed to \"{label}\" ({moved} products updated)",
                form.old.trim()
            ))
            .push(&session)
            .await?;
            Ok(Redirect::to("/admin/categories").into_response())
        }
        Err(e) => rejected(&state, page, e, String::new()).await,
    }
}

/// Delete category handler. Products keep their label.
#[instrument(skip(state, session, page))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<DeleteCategoryForm>,
) -> Result<Response> {
    match state.categories().remove(&form.name).await {
        Ok(()) => {
            Flash::success(format!("Category \"{}\" has been deleted", form.name.trim()))
                .push(&session)
                .await?;
            Ok(Redirect::to("/admin/categories").into_response())
        }
        Err(e) => rejected(&state, page, e, String::new()).await,
    }
}
