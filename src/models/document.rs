use serde::{Deserialize, Serialize};

/// What kind of paperwork a tracked record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentKind {
    SimpleCopy,
    ElectronicFiling,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::SimpleCopy => "simple_copy",
            DocumentKind::ElectronicFiling => "electronic_filing",
        }
    }
}

/// The office's fixed set of notary codes. Signature locations resolve to
/// `SIGNATURE_<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Notary {
    A,
    B,
}

impl Notary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notary::A => "A",
            Notary::B => "B",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub protocol_number: String,
    pub kind: DocumentKind,
    pub notary: Notary,
    pub done: bool,
    pub created_by: String,
    pub current_location: String,
    pub notes: String,
    pub qr_image: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One step of a document's movement trail. Entries are append-only; the
/// latest entry's `place` always equals the document's `current_location`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocationEntry {
    pub place: String,
    pub actor: String,
    pub recorded_at: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentWithHistory {
    #[serde(flatten)]
    pub document: Document,
    pub location_history: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub protocol_number: String,
    pub kind: DocumentKind,
    pub notary: Notary,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub document_id: String,
    /// Menu option code for roles that pick from a menu; omitted for roles
    /// whose target is implied (counter, notary, desk staff).
    pub target_place: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub document_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDoneRequest {
    pub done: bool,
}

/// Query parameters accepted by the document listing.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentFilter {
    /// Substring match on the protocol number.
    pub protocol_number: Option<String>,
    pub notary: Option<Notary>,
    pub kind: Option<DocumentKind>,
    pub done: Option<bool>,
    /// Substring match on the current location.
    pub location: Option<String>,
}
