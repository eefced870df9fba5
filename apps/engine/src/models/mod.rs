pub mod form;
pub mod generated;
pub mod history;
pub mod settings;
