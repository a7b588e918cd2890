//! Public endpoint token generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of a generated token.
pub const TOKEN_LENGTH: usize = 11;

/// Generate a random alphanumeric token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
