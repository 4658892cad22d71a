pub mod graphql;
pub mod guard;
pub mod identity;
pub mod jwt;
pub mod password;
