//! Local persistence for uploaded documents

pub mod documents;
