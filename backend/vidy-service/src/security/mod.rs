pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys, TokenPair, TokenType};
pub use password::{hash_password, verify_password};
