pub mod simulated;
pub mod static_tables;
