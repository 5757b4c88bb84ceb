use super::error::EngineError;
use super::registry::Capabilities;
use tracing::debug;

/// Output-mode flags of a request, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestFlags {
    pub batched: bool,
    pub broken_up: bool,
    /// Reserved. Only meaningful together with `batched` and currently has no effect.
    pub batched_grid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputForm {
    /// Summed potential with its grid.
    Combined,
    /// Separate monopole, dipole and quadrupole contributions.
    BrokenUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Single(OutputForm),
    Batch(OutputForm),
}

impl DispatchMode {
    pub fn form(self) -> OutputForm {
        match self {
            DispatchMode::Single(form) | DispatchMode::Batch(form) => form,
        }
    }

    pub fn is_batched(self) -> bool {
        matches!(self, DispatchMode::Batch(_))
    }
}

impl RequestFlags {
    pub fn new(batched: bool, broken_up: bool, batched_grid: bool) -> Self {
        Self {
            batched,
            broken_up,
            batched_grid,
        }
    }

    /// Resolves the flags into a dispatch mode, or rejects combinations that do not
    /// name one, including forms the model cannot produce.
    pub fn validate(&self, capabilities: &Capabilities) -> Result<DispatchMode, EngineError> {
        if self.batched_grid && !self.batched {
            return Err(EngineError::InvalidFlags(
                "batched_grid requires batched mode".to_string(),
            ));
        }
        if !capabilities.multipoles {
            return Err(EngineError::InvalidFlags(
                "model does not predict multipoles".to_string(),
            ));
        }
        if self.broken_up && !capabilities.broken_up {
            return Err(EngineError::InvalidFlags(
                "model does not support broken-up output".to_string(),
            ));
        }
        if self.batched && !capabilities.batched {
            return Err(EngineError::InvalidFlags(
                "model does not support batched requests".to_string(),
            ));
        }
        if self.batched_grid {
            debug!("batched_grid is reserved and has no effect");
        }

        let form = if self.broken_up {
            OutputForm::BrokenUp
        } else {
            OutputForm::Combined
        };
        Ok(if self.batched {
            DispatchMode::Batch(form)
        } else {
            DispatchMode::Single(form)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(batched: bool, broken_up: bool, batched_grid: bool) -> Result<DispatchMode, EngineError> {
        RequestFlags::new(batched, broken_up, batched_grid).validate(&Capabilities::ALL)
    }

    #[test]
    fn flag_table_resolves_to_expected_modes() {
        use DispatchMode::*;
        use OutputForm::*;

        assert_eq!(mode(false, false, false).unwrap(), Single(Combined));
        assert_eq!(mode(false, true, false).unwrap(), Single(BrokenUp));
        assert_eq!(mode(true, false, false).unwrap(), Batch(Combined));
        assert_eq!(mode(true, true, false).unwrap(), Batch(BrokenUp));
        assert_eq!(mode(true, false, true).unwrap(), Batch(Combined));
        assert_eq!(mode(true, true, true).unwrap(), Batch(BrokenUp));
    }

    #[test]
    fn batched_grid_without_batched_is_invalid() {
        assert!(matches!(mode(false, false, true), Err(EngineError::InvalidFlags(_))));
        assert!(matches!(mode(false, true, true), Err(EngineError::InvalidFlags(_))));
    }

    #[test]
    fn capabilities_restrict_allowed_modes() {
        let no_breakdown = Capabilities {
            broken_up: false,
            ..Capabilities::ALL
        };
        assert!(RequestFlags::new(false, false, false).validate(&no_breakdown).is_ok());
        assert!(matches!(
            RequestFlags::new(false, true, false).validate(&no_breakdown),
            Err(EngineError::InvalidFlags(_))
        ));

        let single_only = Capabilities {
            batched: false,
            ..Capabilities::ALL
        };
        assert!(RequestFlags::new(true, false, false).validate(&single_only).is_err());

        let no_multipoles = Capabilities {
            multipoles: false,
            ..Capabilities::ALL
        };
        assert!(RequestFlags::default().validate(&no_multipoles).is_err());
    }
}
