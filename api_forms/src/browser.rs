//! Paged view over one form's submissions.

use common::error::Res;
use common::http::ApiClient;
use log::debug;
use models::Id;
use models::dtos::submission::SubmissionFilters;
use models::models::submission::Submission;

use crate::services::submission::{delete_submission, list_submissions};

/// Holds exactly one server page at a time. Changing page or filters
/// re-fetches; filters always restart at page 1.
#[derive(Debug, Clone)]
pub struct SubmissionBrowser {
    form_id: Id,
    per_page: u32,
    page: u32,
    filters: SubmissionFilters,
    submissions: Vec<Submission>,
    total_pages: u32,
    total_submissions: Option<u64>,
}

impl SubmissionBrowser {
    pub fn new(form_id: Id, per_page: u32) -> Self {
        SubmissionBrowser {
            form_id,
            per_page: per_page.max(1),
            page: 1,
            filters: SubmissionFilters::default(),
            submissions: Vec::new(),
            total_pages: 1,
            total_submissions: None,
        }
    }

    /// Sets the filters before the first load.
    pub fn with_filters(mut self, filters: SubmissionFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn form_id(&self) -> &Id {
        &self.form_id
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_submissions(&self) -> Option<u64> {
        self.total_submissions
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn filters(&self) -> &SubmissionFilters {
        &self.filters
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Looks a submission up in the loaded page.
    pub fn get_submission(&self, id: &Id) -> Option<&Submission> {
        self.submissions.iter().find(|s| &s.id == id)
    }

    /// Fetches the current page.
    pub async fn load(&mut self, api: &ApiClient) -> Res<()> {
        let res = list_submissions(api, &self.form_id, self.page, self.per_page, &self.filters)
            .await?;
        self.submissions = res.submissions;
        self.total_pages = res.total_pages.unwrap_or(1).max(1);
        self.total_submissions = res.total_submissions;
        debug!(
            "Loaded page {}/{} of form {}",
            self.page, self.total_pages, self.form_id
        );
        Ok(())
    }

    /// Returns `false` without a request when already on the last page.
    pub async fn next_page(&mut self, api: &ApiClient) -> Res<bool> {
        if !self.has_next() {
            return Ok(false);
        }
        self.goto(api, self.page + 1).await?;
        Ok(true)
    }

    pub async fn prev_page(&mut self, api: &ApiClient) -> Res<bool> {
        if !self.has_prev() {
            return Ok(false);
        }
        self.goto(api, self.page - 1).await?;
        Ok(true)
    }

    /// Loads `page`, clamped to at least 1. On failure the previous page
    /// stays selected.
    pub async fn goto(&mut self, api: &ApiClient, page: u32) -> Res<()> {
        let previous = self.page;
        self.page = page.max(1);
        if let Err(err) = self.load(api).await {
            self.page = previous;
            return Err(err);
        }
        Ok(())
    }

    pub async fn set_filters(&mut self, api: &ApiClient, filters: SubmissionFilters) -> Res<()> {
        self.filters = filters;
        self.page = 1;
        self.load(api).await
    }

    /// Deletes a submission after `confirm` approves.
    ///
    /// The row leaves the loaded page once the backend accepts. If that
    /// empties a page other than the first, the browser steps back one
    /// page; either way the page is re-fetched so totals stay right.
    pub async fn delete(
        &mut self,
        api: &ApiClient,
        id: &Id,
        confirm: impl FnOnce() -> bool,
    ) -> Res<bool> {
        if !confirm() {
            return Ok(false);
        }
        delete_submission(api, &self.form_id, id).await?;

        self.submissions.retain(|s| &s.id != id);
        if let Some(total) = self.total_submissions.as_mut() {
            *total = total.saturating_sub(1);
        }
        if self.submissions.is_empty() && self.page > 1 {
            self.page -= 1;
        }
        self.load(api).await?;
        Ok(true)
    }
}
