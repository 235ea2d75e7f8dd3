use common::error::Res;
use common::http::ApiClient;
use models::Id;
use models::dtos::submission::{SubmissionFilters, SubmissionPage, total_pages};
use models::models::form::Form;

/// Fetches one page of a form's submissions.
///
/// Pages are 1-based and purely server-side; nothing is cached between
/// calls. Missing page counts are derived from the total.
///
/// # Arguments
///
/// * `form_id` - Form whose submissions are listed
/// * `page` - Page to fetch, starting at 1
/// * `per_page` - Page size
/// * `filters` - Date range, search term and sort, applied by the backend
pub async fn list_submissions(
    api: &ApiClient,
    form_id: &Id,
    page: u32,
    per_page: u32,
    filters: &SubmissionFilters,
) -> Res<SubmissionPage> {
    let page = page.max(1);
    let mut query = vec![("page", page.to_string()), ("perPage", per_page.to_string())];
    query.extend(filters.to_query());

    let mut res: SubmissionPage = api
        .get_query(
            &format!("/api/forms/{}/submissions", form_id),
            &query,
            "Failed to load submissions",
        )
        .await?;

    if res.total_pages.is_none() {
        res.total_pages = Some(match res.total_submissions {
            Some(total) => total_pages(total, per_page),
            None => 1,
        });
    }
    if res.current_page.is_none() {
        res.current_page = Some(page);
    }
    Ok(res)
}

pub async fn delete_submission(api: &ApiClient, form_id: &Id, submission_id: &Id) -> Res<()> {
    let _: serde_json::Value = api
        .delete(
            &format!("/api/forms/{}/submissions/{}", form_id, submission_id),
            "Failed to delete submission",
        )
        .await?;
    Ok(())
}

/// Downloads the backend's CSV export with `filters` applied. The bytes
/// are returned untouched.
pub async fn export_csv(api: &ApiClient, form_id: &Id, filters: &SubmissionFilters) -> Res<Vec<u8>> {
    api.get_bytes(
        &format!("/api/forms/{}/submissions/export", form_id),
        &filters.to_query(),
        "Failed to export submissions",
    )
    .await
}

/// `<form name>-submissions.csv`, with path separators replaced.
pub fn export_file_name(form: &Form) -> String {
    let name = form.name.trim();
    let name = if name.is_empty() { "form" } else { name };
    format!("{}-submissions.csv", name.replace(['/', '\\'], "-"))
}
