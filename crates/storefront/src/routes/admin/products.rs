//! Product management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{CategoryList, ProductId, ProductInput, ValidationErrors};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::products::{CategoryOption, ProductView};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Products table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
    pub total: usize,
    pub search_query: String,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub page: PageContext,
    pub title: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub form: ProductInput,
    pub featured: bool,
    pub categories: Vec<CategoryOption>,
    pub errors: ValidationErrors,
}

impl ProductFormTemplate {
    fn new(
        page: PageContext,
        target: Option<ProductId>,
        form: ProductInput,
        categories: &CategoryList,
        errors: ValidationErrors,
    ) -> Self {
        let (title, action, submit_label) = match target {
            Some(id) => ("Edit Product", format!("/admin/products/{id}"), "Update Product"),
            None => ("Add New Product", "/admin/products".to_string(), "Add Product"),
        };
        let selected = form.category.trim().to_string();
        Self {
            page,
            title,
            action,
            submit_label,
            featured: form.is_featured(),
            categories: categories
                .display()
                .map(|label| CategoryOption {
                    label: label.to_string(),
                    selected: label == selected,
                })
                .collect(),
            form,
            errors,
        }
    }
}

fn parse_id(id: &str) -> Result<ProductId> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("product {id}")))
}

/// Products table handler.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.products().catalog().await?;
    let search_query = query.q.unwrap_or_default();
    let products = catalog
        .admin_search(&search_query)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(ProductsIndexTemplate {
        page,
        products,
        total: catalog.len(),
        search_query,
    })
}

/// New product form handler.
#[instrument(skip(state, page))]
pub async fn new_product(State(state): State<AppState>, page: PageContext) -> Result<impl IntoResponse> {
    let categories = state.categories().list().await?;
    Ok(ProductFormTemplate::new(
        page,
        None,
        ProductInput::default(),
        &categories,
        ValidationErrors::new(),
    ))
}

/// Create product handler.
#[instrument(skip(state, session, page, input))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(input): Form<ProductInput>,
) -> Result<Response> {
    let categories = state.categories().list().await?;
    match input.validate(&categories) {
        Ok(fields) => {
            let product = state.products().create(fields).await?;
            Flash::success(format!("{} has been added", product.name))
                .push(&session)
                .await?;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(errors) => {
            tracing::debug!(errors = errors.len(), "Product form rejected");
            let template = ProductFormTemplate::new(page, None, input, &categories, errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

/// Edit product form handler.
#[instrument(skip(state, page))]
pub async fn edit(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let product = state
        .products()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let categories = state.categories().list().await?;

    Ok(ProductFormTemplate::new(
        page,
        Some(id),
        ProductInput::from_product(&product),
        &categories,
        ValidationErrors::new(),
    ))
}

/// Update product handler.
#[instrument(skip(state, session, page, input))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Path(id): Path<String>,
    Form(input): Form<ProductInput>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let categories = state.categories().list().await?;
    match input.validate(&categories) {
        Ok(fields) => {
            let product = state.products().update(id, fields).await?;
            Flash::success(format!("{} has been updated", product.name))
                .push(&session)
                .await?;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(errors) => {
            let template = ProductFormTemplate::new(page, Some(id), input, &categories, errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

/// Delete product handler.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_id(&id)?;
    let product = state.products().delete(id).await?;
    Flash::success(format!("{} has been deleted", product.name))
        .push(&session)
        .await?;
    Ok(Redirect::to("/admin/products"))
}
