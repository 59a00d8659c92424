use thiserror::Error;

/// The single authoritative phase of one capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Previewing,
    Saved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the share sheet. Not an error.
    Cancelled,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    SaveRequested { share_available: bool },
    ShareFinished(ShareOutcome),
    PreviewCancelled,
    /// The host print dialog closed. Success and cancel are not
    /// distinguished by the print boundary.
    PrintDismissed,
}

/// Side effect the host layer must run after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    OpenShare,
    Finalize,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaptureWarning {
    #[error("Please provide a title and a brief preview for the incident.")]
    MissingFields,
    #[error("Could not share incident. Please try saving as PDF.")]
    ShareFailed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub command: Option<Command>,
    pub warning: Option<CaptureWarning>,
}

impl Step {
    fn to(phase: Phase) -> Self {
        Self {
            phase,
            command: None,
            warning: None,
        }
    }

    fn run(phase: Phase, command: Command) -> Self {
        Self {
            phase,
            command: Some(command),
            warning: None,
        }
    }

    fn warn(phase: Phase, warning: CaptureWarning) -> Self {
        Self {
            phase,
            command: None,
            warning: Some(warning),
        }
    }
}

/// A draft may leave `Editing` once both trimmed fields are non-empty.
pub fn draft_ready(title: &str, preview: &str) -> bool {
    !title.trim().is_empty() && !preview.trim().is_empty()
}

/// Plain-text composed report, used as the share payload and the preview
/// heading.
pub fn report_text(date: &str, title: &str, preview: &str) -> String {
    format!("Incident Report\n\nDate: {date}\nTitle: {title}\nDetails: {preview}")
}

/// One exhaustive transition of the capture flow. Stray events (a print
/// notification while editing, a share outcome while previewing, anything
/// after `Saved`) leave the phase untouched.
pub fn step(phase: Phase, draft_ready: bool, event: CaptureEvent) -> Step {
    match (phase, event) {
        (Phase::Editing, CaptureEvent::SaveRequested { .. }) if !draft_ready => {
            Step::warn(Phase::Editing, CaptureWarning::MissingFields)
        }
        (
            Phase::Editing,
            CaptureEvent::SaveRequested {
                share_available: true,
            },
        ) => Step::run(Phase::Editing, Command::OpenShare),
        (
            Phase::Editing,
            CaptureEvent::SaveRequested {
                share_available: false,
            },
        ) => Step::to(Phase::Previewing),
        (Phase::Editing, CaptureEvent::ShareFinished(ShareOutcome::Shared)) => {
            Step::run(Phase::Saved, Command::Finalize)
        }
        (Phase::Editing, CaptureEvent::ShareFinished(ShareOutcome::Cancelled)) => {
            Step::to(Phase::Editing)
        }
        (Phase::Editing, CaptureEvent::ShareFinished(ShareOutcome::Failed)) => {
            Step::warn(Phase::Previewing, CaptureWarning::ShareFailed)
        }
        (Phase::Editing, CaptureEvent::PreviewCancelled | CaptureEvent::PrintDismissed) => {
            Step::to(Phase::Editing)
        }
        (Phase::Previewing, CaptureEvent::PreviewCancelled) => Step::to(Phase::Editing),
        (Phase::Previewing, CaptureEvent::PrintDismissed) if draft_ready => {
            Step::run(Phase::Saved, Command::Finalize)
        }
        (Phase::Previewing, CaptureEvent::PrintDismissed) => {
            Step::warn(Phase::Previewing, CaptureWarning::MissingFields)
        }
        (
            Phase::Previewing,
            CaptureEvent::SaveRequested { .. } | CaptureEvent::ShareFinished(_),
        ) => Step::to(Phase::Previewing),
        (Phase::Saved, _) => Step::to(Phase::Saved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_ready_trims_whitespace() {
        assert!(draft_ready("Lost wallet", "Left on bus 12"));
        assert!(!draft_ready("   ", "Left on bus 12"));
        assert!(!draft_ready("Lost wallet", "\n\t"));
        assert!(!draft_ready("", ""));
    }

    #[test]
    fn invalid_draft_blocks_preview() {
        let step = step(
            Phase::Editing,
            false,
            CaptureEvent::SaveRequested {
                share_available: false,
            },
        );

        assert_eq!(step.phase, Phase::Editing);
        assert_eq!(step.warning, Some(CaptureWarning::MissingFields));
        assert_eq!(step.command, None);
    }

    #[test]
    fn valid_draft_enters_preview_without_share() {
        let step = step(
            Phase::Editing,
            true,
            CaptureEvent::SaveRequested {
                share_available: false,
            },
        );

        assert_eq!(step.phase, Phase::Previewing);
        assert_eq!(step.command, None);
        assert_eq!(step.warning, None);
    }

    #[test]
    fn share_capable_save_opens_the_share_sheet() {
        let step = step(
            Phase::Editing,
            true,
            CaptureEvent::SaveRequested {
                share_available: true,
            },
        );

        assert_eq!(step.phase, Phase::Editing);
        assert_eq!(step.command, Some(Command::OpenShare));
    }

    #[test]
    fn share_cancel_is_a_quiet_no_op() {
        let step = step(
            Phase::Editing,
            true,
            CaptureEvent::ShareFinished(ShareOutcome::Cancelled),
        );

        assert_eq!(step.phase, Phase::Editing);
        assert_eq!(step.command, None);
        assert_eq!(step.warning, None);
    }

    #[test]
    fn share_failure_falls_back_to_preview() {
        let step = step(
            Phase::Editing,
            true,
            CaptureEvent::ShareFinished(ShareOutcome::Failed),
        );

        assert_eq!(step.phase, Phase::Previewing);
        assert_eq!(step.warning, Some(CaptureWarning::ShareFailed));
    }

    #[test]
    fn share_success_finalizes() {
        let step = step(
            Phase::Editing,
            true,
            CaptureEvent::ShareFinished(ShareOutcome::Shared),
        );

        assert_eq!(step.phase, Phase::Saved);
        assert_eq!(step.command, Some(Command::Finalize));
    }

    #[test]
    fn preview_cancel_returns_to_editing() {
        let step = step(Phase::Previewing, true, CaptureEvent::PreviewCancelled);
        assert_eq!(step.phase, Phase::Editing);
        assert_eq!(step.command, None);
    }

    #[test]
    fn print_dismissal_finalizes_a_valid_draft() {
        let step = step(Phase::Previewing, true, CaptureEvent::PrintDismissed);
        assert_eq!(step.phase, Phase::Saved);
        assert_eq!(step.command, Some(Command::Finalize));
    }

    #[test]
    fn print_dismissal_revalidates() {
        let step = step(Phase::Previewing, false, CaptureEvent::PrintDismissed);
        assert_eq!(step.phase, Phase::Previewing);
        assert_eq!(step.warning, Some(CaptureWarning::MissingFields));
        assert_eq!(step.command, None);
    }

    #[test]
    fn stray_events_leave_the_phase_untouched() {
        let stray = [
            (Phase::Editing, CaptureEvent::PrintDismissed),
            (Phase::Editing, CaptureEvent::PreviewCancelled),
            (
                Phase::Previewing,
                CaptureEvent::ShareFinished(ShareOutcome::Shared),
            ),
            (
                Phase::Previewing,
                CaptureEvent::SaveRequested {
                    share_available: true,
                },
            ),
            (Phase::Saved, CaptureEvent::PrintDismissed),
            (
                Phase::Saved,
                CaptureEvent::ShareFinished(ShareOutcome::Failed),
            ),
        ];

        for (phase, event) in stray {
            let step = step(phase, true, event);
            assert_eq!(step.phase, phase);
            assert_eq!(step.command, None);
            assert_eq!(step.warning, None);
        }
    }

    #[test]
    fn report_text_matches_the_shared_layout() {
        let text = report_text("3/1/2024, 8:30:00 AM", "Lost wallet", "Left on bus 12");
        assert_eq!(
            text,
            "Incident Report\n\nDate: 3/1/2024, 8:30:00 AM\nTitle: Lost wallet\nDetails: Left on bus 12"
        );
    }
}
