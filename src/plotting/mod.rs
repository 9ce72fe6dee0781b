pub mod chart;
pub mod styles;


pub use chart::{plot_by_year, plot_file_name, plot_title};
pub use styles::{parse_color, ChartStyle, ChartTheme};
