pub mod aligned_table;
pub mod parser;
pub mod topology_table;
pub mod trace_reader;
