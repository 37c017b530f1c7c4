pub mod alias;
pub mod classify;
pub mod multi;
pub mod origin;
