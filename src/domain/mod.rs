// Domain layer - Entities derived from the dashboard artifacts
pub mod churn;
pub mod dashboard;
pub mod kpi;
pub mod sales;
pub mod table;
