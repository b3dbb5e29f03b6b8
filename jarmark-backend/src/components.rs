pub mod admin;
pub mod form;
pub mod main;
pub mod submission;
