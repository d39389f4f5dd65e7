//! Security adapters: the opaque password hashing capability.

mod bcrypt_password_hasher;

pub use bcrypt_password_hasher::BcryptPasswordHasher;
