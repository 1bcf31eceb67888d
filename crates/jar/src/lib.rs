mod error;
mod jar;

pub use error::JarError;
pub use jar::{ClassSummary, Jar};
