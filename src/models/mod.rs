pub mod inventory;
pub mod permission;
pub mod product;
pub mod role;
pub mod user;
pub mod warehouse;
