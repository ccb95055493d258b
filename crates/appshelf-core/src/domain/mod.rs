//! Domain types for the catalog and the host permission model.

mod item;
mod permission;

pub use item::Item;
pub use permission::Permission;
