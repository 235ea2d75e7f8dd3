use common::error::{AppError, Res};
use common::http::ApiClient;
use log::info;
use models::Id;
use models::dtos::form::{CreateFormRequest, FormResponse, FormsResponse, UpdateFormRequest};
use models::models::form::Form;

use crate::misc::validate::validate_form;

/// Gets every form owned by the caller.
pub async fn list_forms(api: &ApiClient) -> Res<Vec<Form>> {
    let res: FormsResponse = api.get("/api/forms", "Failed to load forms").await?;
    Ok(res.forms)
}

/// Gets one form. A form that does not exist (or belongs to someone else)
/// is [`AppError::NotFound`].
pub async fn get_form(api: &ApiClient, id: &Id) -> Res<Form> {
    let res: FormResponse = api
        .get(&format!("/api/forms/{}", id), "Form not found")
        .await?;
    Ok(res.form)
}

/// Creates a form after validating it locally.
///
/// # Errors
///
/// * [`AppError::Validation`] for local or server field errors, keyed by input name
/// * [`AppError::LimitReached`] when the plan's form limit is used up (HTTP 403)
pub async fn create_form(api: &ApiClient, req: &CreateFormRequest) -> Res<Form> {
    let req = validate_form(req)?;
    let res: FormResponse = api
        .post("/api/forms", &req, "Failed to create form. Please try again.")
        .await
        .map_err(|err| match err {
            AppError::Forbidden(msg) => AppError::LimitReached(msg),
            other => other,
        })?;
    info!("Created form {} ({})", res.form.id, res.form.endpoint_id);
    Ok(res.form)
}

pub async fn update_form(api: &ApiClient, id: &Id, req: &UpdateFormRequest) -> Res<Form> {
    let req = validate_form(req)?;
    let res: FormResponse = api
        .put(&format!("/api/forms/{}", id), &req, "Failed to update form")
        .await?;
    Ok(res.form)
}

/// Deletes a form and all of its submissions.
///
/// `confirm` runs first; if it declines, no request is made and `false`
/// is returned.
pub async fn delete_form(api: &ApiClient, id: &Id, confirm: impl FnOnce() -> bool) -> Res<bool> {
    if !confirm() {
        return Ok(false);
    }
    let _: serde_json::Value = api
        .delete(&format!("/api/forms/{}", id), "Failed to delete form")
        .await?;
    info!("Deleted form {}", id);
    Ok(true)
}
