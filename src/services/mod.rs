pub mod results_source;
