pub mod dataset;
pub mod report;


pub use dataset::{build_dataset, year_creation, Summary};
pub use report::{export_spreadsheet, mean, render_table, report_mean};
