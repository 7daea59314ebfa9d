pub mod content_check;
pub mod smoke_test;
pub mod structure_check;
