pub mod recipe;
pub mod recipe_attr;
pub mod token;
pub mod user;
