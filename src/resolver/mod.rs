pub mod alias;
pub mod files;
pub mod tsconfig;
