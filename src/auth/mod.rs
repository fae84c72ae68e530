pub mod authorization;
pub mod identity;
pub mod jwks;
pub mod jwt;
pub mod middleware;
pub mod password;
