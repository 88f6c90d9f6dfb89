// HTTP routes
pub mod health;
pub mod index;
pub mod scan;

pub use health::*;
pub use index::*;
pub use scan::*;
