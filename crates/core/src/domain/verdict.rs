// Result Classifier

use serde::{Deserialize, Serialize};

/// Outcome of a command that actually ran on the remote host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    /// Exit code 0 is compliant, everything else is not
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }

    pub fn is_success(self) -> bool {
        self == Verdict::Success
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Success => write!(f, "SUCCESS"),
            Verdict::Failure => write!(f, "FAILURE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_success() {
        assert_eq!(Verdict::from_exit_code(0), Verdict::Success);
        assert!(Verdict::from_exit_code(0).is_success());
    }

    #[test]
    fn test_non_zero_is_failure() {
        for code in [1, 3, 127, 255, -1] {
            assert_eq!(Verdict::from_exit_code(code), Verdict::Failure);
        }
    }
}
