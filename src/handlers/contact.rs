//! "Contact Us" submissions

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::responses::ContactResponse;
use super::AppState;
use crate::models::content::NewContact;
use crate::utils::errors::{CmsError, Result};
use crate::utils::helpers::non_empty;
use crate::utils::logging::{log_record_action, log_validation_failure};

pub async fn submit_contact(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewContact>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let Json(mut contact) = payload.map_err(|e| CmsError::InvalidInput(e.body_text()))?;
    contact.phone_number = non_empty(contact.phone_number);
    contact.message = non_empty(contact.message);

    let errors = contact.validate();
    if !errors.is_empty() {
        log_validation_failure("Contact", &errors);
        return Err(CmsError::Validation(errors));
    }

    let contact = state.db.content.create_contact(contact).await?;
    log_record_action("Contact", &contact.id.to_string(), "create", None);
    Ok((StatusCode::CREATED, Json(contact.into())))
}
