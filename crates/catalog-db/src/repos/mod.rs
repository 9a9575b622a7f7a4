pub mod account;
pub mod category;
pub mod generic;
pub mod product;
