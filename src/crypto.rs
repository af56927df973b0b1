//! Invite code generation.

use rand::Rng;

/// Default invite code length in characters.
pub const DEFAULT_CODE_LENGTH: usize = 16;

/// Shortest code [`RandomCodeGenerator`] emits.
pub const MIN_CODE_LENGTH: usize = 1;

/// Source of invite codes.
///
/// The default implementation is [`RandomCodeGenerator`]. Codes do not have
/// to be unique on their own: the invite action re-draws on collision.
///
/// # Example
///
/// ```rust
/// use townhall::crypto::{CodeGenerator, RandomCodeGenerator};
///
/// let generator = RandomCodeGenerator::new(12);
/// assert_eq!(generator.generate().len(), 12);
/// ```
pub trait CodeGenerator: Send + Sync {
    /// Produce a candidate invite code.
    fn generate(&self) -> String;
}

/// Alphanumeric codes drawn from the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator emitting codes of `length` characters, raised to
    /// [`MIN_CODE_LENGTH`] if shorter.
    #[must_use]
    pub fn new(length: usize) -> Self {
        if length < MIN_CODE_LENGTH {
            log::warn!(
                target: "townhall",
                "msg=\"invite code length raised\", requested={length}, used={MIN_CODE_LENGTH}"
            );
        }
        Self {
            length: length.max(MIN_CODE_LENGTH),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code(self.length)
    }
}

/// Generates a random alphanumeric code (a-z, A-Z, 0-9).
///
/// Each character carries about 5.95 bits of entropy.
///
/// ```rust
/// use townhall::crypto::generate_code;
///
/// let code = generate_code(16);
/// assert_eq!(code.len(), 16);
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}
