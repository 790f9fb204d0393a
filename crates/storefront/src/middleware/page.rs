//! Per-page chrome shared by every full-page template.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;

use super::CspNonce;
use crate::models::{Flash, load_cart};

/// What the base layout needs: nonce, cart badge, pending flash, active path.
///
/// Extracting it consumes the pending flash, so take it only in handlers
/// that render a page.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(page: PageContext) -> impl IntoResponse {
///     MyTemplate { page, /* ... */ }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PageContext {
    pub nonce: String,
    pub cart_count: u32,
    pub flash: Option<Flash>,
    pub path: String,
}

impl PageContext {
    /// Whether the current page is under `prefix`, for nav highlighting.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.path == "/"
        } else {
            self.path.starts_with(prefix)
        }
    }

    /// Whether this is an admin page.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_active("/admin")
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CspNonce(nonce)) = CspNonce::from_request_parts(parts, state).await;

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session layer missing",
        ))?;

        let cart_count = load_cart(&session).await.item_count();
        let flash = Flash::take(&session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read flash from session");
            None
        });

        Ok(Self {
            nonce,
            cart_count,
            flash,
            path: parts
                .extensions
                .get::<OriginalUri>()
                .map_or_else(|| parts.uri.path().to_string(), |uri| uri.path().to_string()),
        })
    }
}
