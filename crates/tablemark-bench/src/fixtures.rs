//! Random entity generation for the benchmark workload.
//!
//! One `StdRng` is created per process and threaded through every call.
//! Reseeding from a coarse time source per call produces correlated output in
//! tight loops, so the generator is never reseeded mid-run.

use rand::rngs::StdRng;
use rand::Rng;
use uuid::Uuid;

use tablemark_store::{Customer, EntityKey};

/// Alphabet for generated strings: uppercase letters and digits.
pub const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Domain suffix appended to generated email local parts.
pub const EMAIL_DOMAIN: &str = "contoso.com";

/// Length of the random local part of generated emails.
pub const EMAIL_LOCAL_LEN: usize = 6;

/// Phone number assigned at creation time.
pub const INITIAL_PHONE: &str = "425-555-0102";

/// Phone number written by the replace phase.
pub const REPLACEMENT_PHONE: &str = "425-555-5555";

/// Length of the random bio payload.
pub const BIO_LEN: usize = 1000;

/// Generate a string of exactly `len` characters drawn uniformly from
/// [`ALPHABET`].
///
/// There is no uniqueness guarantee beyond the statistical improbability of
/// collision, and the output is not suitable for secrets.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Build a customer with a fresh random identity and field values.
///
/// Partition and row keys are independent UUIDv4 strings, the email is a
/// random local part under [`EMAIL_DOMAIN`], the phone number starts at
/// [`INITIAL_PHONE`], and the bio is [`BIO_LEN`] random characters.
pub fn random_customer(rng: &mut StdRng) -> Customer {
    Customer::new(
        EntityKey::new(Uuid::new_v4().to_string(), Uuid::new_v4().to_string()),
        format!("{}@{}", random_string(rng, EMAIL_LOCAL_LEN), EMAIL_DOMAIN),
        INITIAL_PHONE,
        random_string(rng, BIO_LEN),
    )
}
