pub mod manifest;
pub mod phrase;
pub mod review;
pub mod summary;

pub use manifest::*;
pub use phrase::*;
pub use review::*;
pub use summary::*;
