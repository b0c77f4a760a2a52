mod convert;
mod document;
mod fetch;
mod inline;

pub use convert::convert;
pub use document::{DocumentConfig, Heading, MATH_SCRIPT_SRC};
pub use fetch::{ByteFetcher, FetchError, FsByteFetcher};
