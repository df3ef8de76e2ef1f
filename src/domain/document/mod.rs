//! Document module - generated PDFs owned by a single user.
//!
//! Documents are immutable once created. The owning user may delete them;
//! nobody else can see that they exist.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DocumentId, DomainError, Money, Timestamp, UserId};

/// The four document templates the portal can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    AffiliationCertificate,
    PaymentReceipt,
    CourseCertificate,
    MembershipForm,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::AffiliationCertificate => "affiliation_certificate",
            DocumentType::PaymentReceipt => "payment_receipt",
            DocumentType::CourseCertificate => "course_certificate",
            DocumentType::MembershipForm => "membership_form",
        }
    }

    /// Human-readable title printed on the document and used in listings.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::AffiliationCertificate => "Certificado de afiliación",
            DocumentType::PaymentReceipt => "Recibo de pago",
            DocumentType::CourseCertificate => "Certificado de curso",
            DocumentType::MembershipForm => "Ficha de afiliación",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "affiliation_certificate" => Ok(DocumentType::AffiliationCertificate),
            "payment_receipt" => Ok(DocumentType::PaymentReceipt),
            "course_certificate" => Ok(DocumentType::CourseCertificate),
            "membership_form" => Ok(DocumentType::MembershipForm),
            other => Err(DomainError::validation(
                "type",
                format!("Unknown document type: {}", other),
            )),
        }
    }
}

/// Type-specific extras recorded alongside the payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// A generated PDF belonging to exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    owner: UserId,
    doc_type: DocumentType,
    title: String,
    file_name: String,
    #[serde(with = "payload_base64")]
    payload: Vec<u8>,
    size: usize,
    #[serde(default)]
    metadata: DocumentMetadata,
    created_at: Timestamp,
}

impl Document {
    pub fn new(
        owner: UserId,
        doc_type: DocumentType,
        payload: Vec<u8>,
        metadata: DocumentMetadata,
    ) -> Self {
        let id = DocumentId::new();
        let created_at = Timestamp::now();
        let file_name = format!(
            "{}-{}.pdf",
            doc_type.as_str().replace('_', "-"),
            created_at.as_datetime().format("%Y%m%d%H%M%S")
        );
        Self {
            id,
            owner,
            doc_type,
            title: doc_type.title().to_string(),
            file_name,
            size: payload.len(),
            payload,
            metadata,
            created_at,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_base64(&self) -> String {
        BASE64.encode(&self.payload)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

mod payload_base64 {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_records_size_and_owner() {
        let owner = UserId::new();
        let doc = Document::new(
            owner,
            DocumentType::PaymentReceipt,
            b"%PDF-1.4 test".to_vec(),
            DocumentMetadata::default(),
        );

        assert_eq!(doc.size(), 13);
        assert!(doc.is_owned_by(&owner));
        assert!(!doc.is_owned_by(&UserId::new()));
        assert!(doc.file_name().starts_with("payment-receipt-"));
        assert!(doc.file_name().ends_with(".pdf"));
    }

    #[test]
    fn payload_serializes_as_base64() {
        let doc = Document::new(
            UserId::new(),
            DocumentType::MembershipForm,
            vec![0, 1, 2, 255],
            DocumentMetadata::default(),
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["payload"], "AAEC/w==");

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back.payload(), &[0, 1, 2, 255]);
    }

    #[test]
    fn document_type_parses_wire_names() {
        assert_eq!(
            "course_certificate".parse::<DocumentType>().unwrap(),
            DocumentType::CourseCertificate
        );
        assert!("invoice".parse::<DocumentType>().is_err());
    }
}
