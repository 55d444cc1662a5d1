pub mod consensus;
pub mod fasta;
pub mod grouping;
pub mod lca;
pub mod lineage;
pub mod lines;
pub mod metadata;
pub mod progress;
pub mod rgi;
pub mod table;

#[doc(hidden)]
pub mod _internal_test_data;
