pub mod browser;
pub mod dashboard;

pub mod services {
    pub mod form;
    pub mod stats;
    pub mod submission;
}

pub mod misc {
    pub mod embed;
    pub mod validate;
}

pub use browser::SubmissionBrowser;
pub use dashboard::Dashboard;
