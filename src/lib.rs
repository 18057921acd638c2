pub mod cloner;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod harness;
pub mod labeler;
pub mod tagger;
pub mod ui;

pub use error::{DocsSyncError, Result};
