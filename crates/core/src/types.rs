/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Visit identifiers are UUID v7, assigned at check-in.
pub type VisitId = uuid::Uuid;

/// Money in the deployment's currency unit. Never rounded in core.
pub type Amount = f64;
