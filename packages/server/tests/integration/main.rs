mod common;

mod auth;
mod ingredient;
mod shopping_list;
mod user;
