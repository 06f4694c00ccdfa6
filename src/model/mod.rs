mod entry;
mod scorecard;

pub use entry::*;
pub use scorecard::*;
