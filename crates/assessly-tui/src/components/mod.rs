pub mod results_table;
