//! Track discovery and metadata.

mod model;
mod probe;
mod scan;

pub use model::Track;
pub use probe::probe;
pub use scan::scan;

#[cfg(test)]
mod tests;
