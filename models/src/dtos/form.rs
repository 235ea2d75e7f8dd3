use serde::{Deserialize, Serialize};

use crate::models::form::Form;

/// Body of `POST /api/forms`; keys match the input names the backend uses
/// in its field errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    pub email_notifications: bool,
    pub spam_protection: bool,
}

/// Body of `PUT /api/forms/{id}`.
pub type UpdateFormRequest = CreateFormRequest;

impl From<&Form> for UpdateFormRequest {
    fn from(form: &Form) -> Self {
        UpdateFormRequest {
            name: form.name.clone(),
            redirect_url: form.redirect_url.clone(),
            email_notifications: form.email_notifications,
            spam_protection: form.spam_protection,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FormResponse {
    pub form: Form,
}

#[derive(Debug, Deserialize)]
pub struct FormsResponse {
    #[serde(default)]
    pub forms: Vec<Form>,
}
