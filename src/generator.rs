use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Issuer prefix for every generated card number
pub const CARD_NUMBER_PREFIX: &str = "4532";

/// Source of identifiers, session tokens and card credentials.
///
/// Kept behind a trait so a stronger source can replace the default one
/// without touching handlers.
pub trait CredentialGenerator: Send + Sync {
    /// Unique id for a stored record
    fn record_id(&self) -> String;

    /// Opaque bearer token handed out at login
    fn session_token(&self) -> String;

    /// 16-digit card number starting with [`CARD_NUMBER_PREFIX`]
    fn card_number(&self) -> String;

    /// 3-digit card verification value
    fn cvv(&self) -> String;
}

/// UUIDv4 ids and tokens; card numbers and CVVs from a PRNG re-seeded from
/// the wall clock on every call.
///
/// The PRNG output is predictable and must not be treated as secret material.
pub struct ClockSeededGenerator;

impl ClockSeededGenerator {
    fn digits(count: usize) -> String {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        let mut rng = StdRng::seed_from_u64(seed);
        random_digits(&mut rng, count)
    }
}

impl CredentialGenerator for ClockSeededGenerator {
    fn record_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn session_token(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn card_number(&self) -> String {
        format!("{}{}", CARD_NUMBER_PREFIX, Self::digits(12))
    }

    fn cvv(&self) -> String {
        Self::digits(3)
    }
}

pub fn random_digits<R: Rng>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
