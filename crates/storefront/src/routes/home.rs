//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use shopfront_core::catalog::seed;

use super::products::ProductView;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Featured products shown on the home page.
const FEATURED_LIMIT: usize = 4;

/// A category tile linking to the filtered listing.
#[derive(Clone)]
pub struct CategoryTile {
    pub name: String,
    pub image: &'static str,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub featured: Vec<ProductView>,
    pub categories: Vec<CategoryTile>,
}

/// Display the home page.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> Result<impl IntoResponse> {
    let catalog = state.products().catalog().await?;
    let categories = state.categories().list().await?;

    let featured = catalog
        .featured()
        .take(FEATURED_LIMIT)
        .map(ProductView::from)
        .collect();

    let categories = categories
        .display()
        .map(|name| CategoryTile {
            name: name.to_string(),
            image: seed::category_image(name),
        })
        .collect();

    Ok(HomeTemplate {
        page,
        featured,
        categories,
    })
}
