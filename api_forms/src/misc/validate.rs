use std::collections::BTreeMap;

use common::error::{AppError, Res};
use models::dtos::form::CreateFormRequest;
use url::Url;

/// Checks a create/update body and returns it trimmed, with a blank
/// redirect URL dropped.
///
/// Field errors are keyed by the backend's input names (`name`,
/// `redirectUrl`) so they line up with server-side errors.
pub fn validate_form(req: &CreateFormRequest) -> Res<CreateFormRequest> {
    let mut errors = BTreeMap::new();

    let name = req.name.trim();
    if name.is_empty() {
        errors.insert("name".to_string(), "Form name is required".to_string());
    }

    let redirect_url = req
        .redirect_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    if let Some(url) = redirect_url {
        if !is_web_url(url) {
            errors.insert("redirectUrl".to_string(), "Must be a valid URL".to_string());
        }
    }

    if let Some(message) = errors.values().next().cloned() {
        return Err(AppError::Validation {
            message,
            fields: errors,
        });
    }

    Ok(CreateFormRequest {
        name: name.to_string(),
        redirect_url: redirect_url.map(str::to_string),
        email_notifications: req.email_notifications,
        spam_protection: req.spam_protection,
    })
}

fn is_web_url(s: &str) -> bool {
    Url::parse(s)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, redirect: Option<&str>) -> CreateFormRequest {
        CreateFormRequest {
            name: name.to_string(),
            redirect_url: redirect.map(str::to_string),
            email_notifications: true,
            spam_protection: true,
        }
    }

    #[test]
    fn trims_and_drops_blank_redirect() {
        let out = validate_form(&req("  Contact  ", Some("  "))).unwrap();
        assert_eq!(out.name, "Contact");
        assert_eq!(out.redirect_url, None);
    }

    #[test]
    fn accepts_https_redirect() {
        let out = validate_form(&req("Contact", Some("https://example.com/thanks"))).unwrap();
        assert_eq!(out.redirect_url.as_deref(), Some("https://example.com/thanks"));
    }

    #[test]
    fn reports_each_field() {
        match validate_form(&req(" ", Some("ftp:/nowhere"))).unwrap_err() {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields["name"], "Form name is required");
                assert_eq!(fields["redirectUrl"], "Must be a valid URL");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
