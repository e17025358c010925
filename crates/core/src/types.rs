/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Storefront customer ids are numeric in the platform's API.
pub type CustomerId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
