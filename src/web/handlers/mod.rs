pub mod docs;
pub mod predict;
pub mod root;
