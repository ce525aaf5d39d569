pub mod analysis;
pub mod config;
pub mod consts;
pub mod error;
pub mod layout;
pub mod parser;

// Re-export commonly used types
pub use analysis::{
    labels::Label,
    resolver::{LabelResolver, ResolvedLabel},
};
pub use parser::{Task, resolve::FailurePolicy};
