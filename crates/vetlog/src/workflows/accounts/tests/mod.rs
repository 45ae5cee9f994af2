mod common;
mod users;
