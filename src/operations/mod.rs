pub mod catalog;
pub mod classify;
pub mod generation;
pub mod openings;
pub mod provision;
pub mod query;
pub mod report;
