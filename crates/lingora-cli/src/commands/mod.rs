pub mod compile;
pub mod generate_template;
pub mod import_csv;
pub mod new_locale;
pub mod resolve;
pub mod update;
