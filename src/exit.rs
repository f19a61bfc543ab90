// src/exit.rs
//! Standardized process exit codes for `siteforge`.
//!
//! Provides a stable contract for CI pipelines: 0 means the site passed every
//! gate, 1 means the verdict was FAIL.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ForgeExit {
    /// Overall verdict PASS.
    Success = 0,
    /// Overall verdict FAIL (including any hard-gate abort).
    CheckFailed = 1,
    /// Invocation or configuration could not be used.
    InvalidInput = 2,
}

impl ForgeExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for ForgeExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<crate::types::Verdict> for ForgeExit {
    fn from(verdict: crate::types::Verdict) -> Self {
        match verdict {
            crate::types::Verdict::Pass => Self::Success,
            crate::types::Verdict::Fail => Self::CheckFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    #[test]
    fn verdict_maps_to_exit_code() {
        assert_eq!(ForgeExit::from(Verdict::Pass).code(), 0);
        assert_eq!(ForgeExit::from(Verdict::Fail).code(), 1);
        assert_eq!(ForgeExit::InvalidInput.code(), 2);
    }
}
