pub mod copy;
pub mod link;

pub use copy::copy_tree;
pub use link::{is_symlink, switch_symlink};
