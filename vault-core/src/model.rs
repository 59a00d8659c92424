use serde::{Deserialize, Serialize};

/// An inline-encoded file owned by exactly one incident.
///
/// The persisted field names (`type`, `dataUrl`) are part of the stored
/// document shape and must not drift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "dataUrl")]
    pub data_url: String,
}

/// One logged incident report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub date: String,
    pub preview: String,
    pub attachments: Vec<Attachment>,
}

/// A finished capture payload, before the store assigns id and date.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewIncident {
    pub title: String,
    pub preview: String,
    pub attachments: Vec<Attachment>,
}
