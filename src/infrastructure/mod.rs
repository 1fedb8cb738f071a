pub mod artifacts;
pub mod providers;
