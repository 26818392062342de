//! Client-side state: which row is editing, which rows have a mutation in
//! flight, and the driver that sends mutations and re-reads the list.

mod list;
mod row;
mod session;

pub use list::*;
pub use row::*;
pub use session::*;
