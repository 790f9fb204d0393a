//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use shopfront_core::{ALL_CATEGORY, Product, ProductId, ProductQuery, SortOrder};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Related products shown under a product's details.
const RELATED_LIMIT: usize = 4;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub image: String,
    pub featured: bool,
    pub rating: String,
    pub stars: String,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_u64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            category: product.category.clone(),
            image: product.image.clone(),
            featured: product.featured,
            rating: product.rating.to_string(),
            stars: product.rating.glyphs(),
            stock: product.stock,
            in_stock: product.in_stock(),
        }
    }
}

/// A category filter link.
#[derive(Clone)]
pub struct CategoryOption {
    pub label: String,
    pub selected: bool,
}

/// A sort dropdown entry.
#[derive(Clone)]
pub struct SortOption {
    pub param: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryOption>,
    pub sort_options: Vec<SortOption>,
    pub category: String,
    pub search: String,
    pub featured_only: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
    pub related_products: Vec<ProductView>,
}

/// Display product listing page.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.products().catalog().await?;
    let category_list = state.categories().list().await?;

    let active = query.category();
    let products = query.apply(&catalog).into_iter().map(ProductView::from).collect();

    let categories = category_list
        .all()
        .iter()
        .map(|label| CategoryOption {
            label: label.clone(),
            selected: label == active,
        })
        .collect();

    let sort = query.sort_order();
    let sort_options = SortOrder::ALL
        .iter()
        .map(|order| SortOption {
            param: order.param(),
            label: order.label(),
            selected: *order == sort,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        page,
        products,
        categories,
        sort_options,
        category: if active == ALL_CATEGORY {
            String::new()
        } else {
            active.to_string()
        },
        search: query.search_term().unwrap_or_default().to_string(),
        featured_only: query.featured_only(),
    })
}

/// Display product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound("that product".to_string());

    let id: ProductId = id.parse().map_err(|_| not_found())?;
    let catalog = state.products().catalog().await?;
    let product = catalog.get(id).ok_or_else(not_found)?;

    let related_products = catalog
        .in_category(&product.category)
        .filter(|p| p.id != product.id)
        .take(RELATED_LIMIT)
        .map(ProductView::from)
        .collect();

    Ok(ProductShowTemplate {
        page,
        product: ProductView::from(product),
        related_products,
    })
}
