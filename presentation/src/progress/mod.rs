//! Progress reporting while queries are processed

pub mod reporter;
