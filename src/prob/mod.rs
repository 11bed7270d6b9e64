pub mod combinatorics;
pub mod hypergeometric;
pub mod multivariate;

pub use combinatorics::{choose, factorial};
pub use hypergeometric::{at_least, at_least_three, at_least_two, exactly, exactly_three, exactly_two};
pub use multivariate::{joint_at_least, joint_exact};
