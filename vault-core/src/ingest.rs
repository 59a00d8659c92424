use crate::model::Attachment;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use thiserror::Error;

pub const MAX_ATTACHMENTS: usize = 5;
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata of a picked file, known before its content is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub kind: String,
    pub size: u64,
}

/// Per-file rejection. The display text is the user-facing copy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You can upload a maximum of 5 files.")]
    TooMany,
    #[error("File {name} is too large. Max 10MB allowed.")]
    TooLarge { name: String },
    #[error("Could not read file {name}. It was not attached.")]
    ReadFailed { name: String },
}

/// Outcome of one asynchronous file read, reported into the reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestEvent {
    Loaded { attachment: Attachment },
    Failed { name: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchPlan {
    /// Indices into the candidate slice that may start reading.
    pub accepted: Vec<usize>,
    pub rejections: Vec<Rejection>,
}

/// Admission check over one batch of picked files. Files beyond the
/// attachment cap and files over the size limit are rejected individually;
/// the rest of the batch still proceeds. An oversized file does not consume
/// capacity. `current_total` counts attached plus in-flight reads.
pub fn plan_batch(current_total: usize, files: &[PendingFile]) -> BatchPlan {
    let mut plan = BatchPlan::default();
    let mut room = MAX_ATTACHMENTS.saturating_sub(current_total);

    for (index, file) in files.iter().enumerate() {
        if room == 0 {
            plan.rejections.push(Rejection::TooMany);
            continue;
        }
        if file.size > MAX_FILE_BYTES {
            plan.rejections.push(Rejection::TooLarge {
                name: file.name.clone(),
            });
            continue;
        }
        room -= 1;
        plan.accepted.push(index);
    }

    plan
}

pub fn ingest_channel() -> (UnboundedSender<IngestEvent>, UnboundedReceiver<IngestEvent>) {
    unbounded()
}

/// Reducer for read completions. Finished attachments append in completion
/// order; a failed read or an over-cap arrival yields a rejection for the
/// caller to surface. Append-only: an event never reorders or replaces
/// entries already in the list.
pub fn apply(attachments: &mut Vec<Attachment>, event: IngestEvent) -> Option<Rejection> {
    match event {
        IngestEvent::Loaded { attachment } => {
            if attachments.len() >= MAX_ATTACHMENTS {
                return Some(Rejection::TooMany);
            }
            attachments.push(attachment);
            None
        }
        IngestEvent::Failed { name } => Some(Rejection::ReadFailed { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> PendingFile {
        PendingFile {
            name: name.into(),
            kind: "image/png".into(),
            size,
        }
    }

    fn attachment(name: &str) -> Attachment {
        Attachment {
            name: name.into(),
            kind: "image/png".into(),
            data_url: format!("data:image/png;base64,{name}"),
        }
    }

    #[test]
    fn sixth_file_is_rejected() {
        let plan = plan_batch(5, &[file("sixth.png", 10)]);
        assert!(plan.accepted.is_empty());
        assert_eq!(plan.rejections, vec![Rejection::TooMany]);
    }

    #[test]
    fn size_limit_is_inclusive_at_ten_mebibytes() {
        let plan = plan_batch(
            0,
            &[
                file("exact.png", 10 * 1024 * 1024),
                file("over.png", 10 * 1024 * 1024 + 1),
                file("eleven.mov", 11 * 1024 * 1024),
            ],
        );

        assert_eq!(plan.accepted, vec![0]);
        assert_eq!(
            plan.rejections,
            vec![
                Rejection::TooLarge {
                    name: "over.png".into()
                },
                Rejection::TooLarge {
                    name: "eleven.mov".into()
                },
            ]
        );
    }

    #[test]
    fn batch_partially_succeeds() {
        let plan = plan_batch(
            3,
            &[
                file("ok-1.png", 100),
                file("huge.mov", 50 * 1024 * 1024),
                file("ok-2.png", 100),
                file("overflow.png", 100),
            ],
        );

        assert_eq!(plan.accepted, vec![0, 2]);
        assert_eq!(
            plan.rejections,
            vec![
                Rejection::TooLarge {
                    name: "huge.mov".into()
                },
                Rejection::TooMany,
            ]
        );
    }

    #[test]
    fn oversized_file_does_not_consume_capacity() {
        let plan = plan_batch(
            4,
            &[file("huge.mov", 50 * 1024 * 1024), file("small.png", 100)],
        );

        assert_eq!(plan.accepted, vec![1]);
        assert_eq!(
            plan.rejections,
            vec![Rejection::TooLarge {
                name: "huge.mov".into()
            }]
        );
    }

    #[test]
    fn completions_append_in_arrival_order() {
        let mut attachments = Vec::new();

        for name in ["late.png", "early.png"] {
            let rejection = apply(
                &mut attachments,
                IngestEvent::Loaded {
                    attachment: attachment(name),
                },
            );
            assert!(rejection.is_none());
        }

        let names: Vec<_> = attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["late.png", "early.png"]);
    }

    #[test]
    fn read_failure_surfaces_and_drops_the_file() {
        let mut attachments = vec![attachment("kept.png")];

        let rejection = apply(
            &mut attachments,
            IngestEvent::Failed {
                name: "broken.mp4".into(),
            },
        );

        assert_eq!(
            rejection,
            Some(Rejection::ReadFailed {
                name: "broken.mp4".into()
            })
        );
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn reducer_enforces_cap_on_arrival() {
        let mut attachments: Vec<_> = (0..MAX_ATTACHMENTS)
            .map(|n| attachment(&format!("file-{n}.png")))
            .collect();

        let rejection = apply(
            &mut attachments,
            IngestEvent::Loaded {
                attachment: attachment("extra.png"),
            },
        );

        assert_eq!(rejection, Some(Rejection::TooMany));
        assert_eq!(attachments.len(), MAX_ATTACHMENTS);
    }

    #[test]
    fn rejection_copy_matches_the_toasts() {
        assert_eq!(
            Rejection::TooMany.to_string(),
            "You can upload a maximum of 5 files."
        );
        assert_eq!(
            Rejection::TooLarge {
                name: "clip.mov".into()
            }
            .to_string(),
            "File clip.mov is too large. Max 10MB allowed."
        );
    }
}
