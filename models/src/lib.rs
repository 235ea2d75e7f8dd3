pub mod de;

pub mod models {
    pub mod form;
    pub mod payment;
    pub mod plan;
    pub mod stats;
    pub mod submission;
    pub mod subscription;
    pub mod user;
}

pub mod dtos {
    pub mod auth;
    pub mod form;
    pub mod pay;
    pub mod sub;
    pub mod submission;
}

pub use de::Id;
