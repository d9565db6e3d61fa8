pub mod health;
pub mod meta_data;
pub mod metrics;
