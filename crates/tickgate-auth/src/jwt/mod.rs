//! JWT token encoding, decoding, and wire claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::TokenClaims;
pub use decoder::JwtValidator;
pub use encoder::{IssuedToken, JwtEncoder};
