use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::submission::Submission;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Filters shared by the submission listing and the CSV export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl SubmissionFilters {
    /// Query parameters; unset filters are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.date_from {
            query.push(("dateFrom", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            query.push(("dateTo", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            query.push(("sortBy", sort_by.clone()));
            query.push(("sortOrder", self.sort_order.to_string()));
        }
        query
    }
}

/// One server-side page of submissions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPage {
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default, alias = "total_submissions", alias = "total")]
    pub total_submissions: Option<u64>,
    #[serde(default, alias = "total_pages")]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "current_page", alias = "page")]
    pub current_page: Option<u32>,
}

/// `ceil(total / per_page)`, at least 1.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    total.div_ceil(per_page).max(1) as u32
}
