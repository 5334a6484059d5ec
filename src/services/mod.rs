pub mod association;
pub mod dashboard;
pub mod debounce;
