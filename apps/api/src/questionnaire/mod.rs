// Questionnaire: catalog, per-user session state, and the JSON presentation layer.

pub mod catalog;
pub mod handlers;
pub mod session;
pub mod store;
pub mod view;
