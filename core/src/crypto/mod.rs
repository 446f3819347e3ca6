pub mod types;
pub mod block;
pub mod gf128;
pub mod aead;
pub mod memory;
pub mod nonce;

pub use types::*;
pub use aead::*;
pub use memory::*;
pub use nonce::*;
