pub mod apply;
pub mod diff;
pub mod review;

pub use apply::{apply, ApplyArgs};
pub use diff::{diff, DiffArgs};
pub use review::{review, ReviewArgs};
