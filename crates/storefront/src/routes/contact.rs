//! Contact form route handlers.
//!
//! Accepted messages are appended to the local message collection.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{ContactForm, ValidationErrors};

use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactForm,
    pub errors: ValidationErrors,
}

/// Display the contact form.
#[instrument(skip(page))]
pub async fn show(page: PageContext) -> impl IntoResponse {
    ContactTemplate {
        page,
        form: ContactForm::default(),
        errors: ValidationErrors::new(),
    }
}

/// Store a contact message.
#[instrument(skip(state, session, page, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let message = match form.validate(Utc::now()) {
        Ok(message) => message,
        Err(errors) => {
            let template = ContactTemplate { page, form, errors };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    state.messages().append(message).await?;
    Flash::success("Thank you for your message! We'll get back to you soon.")
        .push(&session)
        .await?;

    Ok(Redirect::to("/contact").into_response())
}
