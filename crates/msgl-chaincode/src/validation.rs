//! Argument checks that run before any ledger access.

use std::fmt;

use crate::error::{ChaincodeError, ChaincodeResult};

/// Accepted argument count for a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arity {
    /// Fewest arguments accepted.
    pub min: usize,
    /// Most arguments accepted.
    pub max: usize,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

pub fn check_arity<S: AsRef<str>>(args: &[S], arity: Arity) -> ChaincodeResult<()> {
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(ChaincodeError::ArgumentCount {
            expected: arity,
            actual: args.len(),
        })
    }
}

/// Reject the first argument that is empty or longer than `max_len`
/// characters. Positions are zero-based.
pub fn sanitize_arguments<S: AsRef<str>>(args: &[S], max_len: usize) -> ChaincodeResult<()> {
    for (position, arg) in args.iter().enumerate() {
        let arg = arg.as_ref();
        if arg.is_empty() {
            return Err(ChaincodeError::EmptyArgument { position });
        }
        if arg.chars().count() > max_len {
            return Err(ChaincodeError::ArgumentTooLong {
                position,
                max: max_len,
            });
        }
    }
    Ok(())
}

/// Parse a signed decimal integer argument.
pub fn parse_integer(value: &str, position: usize) -> ChaincodeResult<i64> {
    value.parse().map_err(|_| ChaincodeError::NotNumeric {
        position,
        value: value.to_string(),
    })
}
