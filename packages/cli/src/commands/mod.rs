pub mod edit;
pub mod fmt;
pub mod show;
pub mod tree;

pub use edit::{edit, EditArgs};
pub use fmt::{fmt, FmtArgs};
pub use show::{show, ShowArgs};
pub use tree::{tree, TreeArgs};
