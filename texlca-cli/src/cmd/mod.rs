pub mod extract_rgi;
pub mod group_lines;
pub mod group_metadata;
pub mod lca;
