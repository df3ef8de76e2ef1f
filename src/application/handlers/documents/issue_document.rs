//! IssueDocumentHandler - renders one of the member documents, stores it and
//! links it to its owner.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::document::{Document, DocumentMetadata, DocumentType};
use crate::domain::foundation::{ErrorCode, EventId, PaymentId, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{
    DocumentRenderer, DocumentRepository, EventRepository, RenderRequest, UserRepository,
};

/// Which document to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    /// Requires an active membership.
    AffiliationCertificate,
    MembershipForm,
    /// Requires enrolment in the course.
    CourseCertificate { course_id: EventId },
    /// Receipt for an entry already in the payment history.
    PaymentReceipt { payment_id: PaymentId },
}

#[derive(Debug, Clone)]
pub struct IssueDocumentCommand {
    pub user_id: UserId,
    pub kind: DocumentKind,
}

#[derive(Debug, Clone)]
pub struct IssueDocumentResult {
    pub document: Document,
}

pub struct IssueDocumentHandler {
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
    events: Arc<dyn EventRepository>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl IssueDocumentHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentRepository>,
        events: Arc<dyn EventRepository>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            users,
            documents,
            events,
            renderer,
        }
    }

    pub async fn handle(
        &self,
        cmd: IssueDocumentCommand,
    ) -> Result<IssueDocumentResult, ApplicationError> {
        let mut user = self.users.find_by_id(&cmd.user_id).await?.ok_or_else(|| {
            ApplicationError::not_found(ErrorCode::UserNotFound, "Usuario no encontrado")
        })?;

        let document = self.render(&user, &cmd.kind).await?;
        self.documents.save(&document).await?;

        match cmd.kind {
            DocumentKind::PaymentReceipt { payment_id } => {
                user.attach_receipt(payment_id, document.id());
            }
            _ => user.link_document(document.id()),
        }
        self.users.update(&user).await?;

        tracing::info!(
            user_id = %user.id,
            document_id = %document.id(),
            doc_type = %document.doc_type(),
            size = document.size(),
            "Document issued"
        );

        Ok(IssueDocumentResult { document })
    }

    async fn render(&self, user: &User, kind: &DocumentKind) -> Result<Document, ApplicationError> {
        let (doc_type, rendered, metadata) = match kind {
            DocumentKind::AffiliationCertificate => {
                if !user.membership.is_active_at(Timestamp::now()) {
                    return Err(ApplicationError::forbidden(
                        "El certificado de afiliación requiere una cuota vigente",
                    ));
                }
                let rendered = self
                    .renderer
                    .render(RenderRequest::AffiliationCertificate { user })?;
                (DocumentType::AffiliationCertificate, rendered, DocumentMetadata::default())
            }
            DocumentKind::MembershipForm => {
                let rendered = self.renderer.render(RenderRequest::MembershipForm { user })?;
                (DocumentType::MembershipForm, rendered, DocumentMetadata::default())
            }
            DocumentKind::CourseCertificate { course_id } => {
                let course = self
                    .events
                    .find_by_id(course_id)
                    .await?
                    .filter(|e| e.is_course())
                    .ok_or_else(|| {
                        ApplicationError::not_found(ErrorCode::EventNotFound, "Curso no encontrado")
                    })?;
                if !course.is_enrolled(&user.id) {
                    return Err(ApplicationError::forbidden("No estás inscrito en este curso"));
                }
                let rendered = self.renderer.render(RenderRequest::CourseCertificate {
                    user,
                    course: &course,
                })?;
                let metadata = DocumentMetadata {
                    course_name: Some(course.details.title.clone()),
                    ..Default::default()
                };
                (DocumentType::CourseCertificate, rendered, metadata)
            }
            DocumentKind::PaymentReceipt { payment_id } => {
                let payment = user
                    .payment_history
                    .iter()
                    .find(|p| &p.id == payment_id)
                    .ok_or_else(|| {
                        ApplicationError::validation("paymentId", "Pago no encontrado")
                    })?;
                let rendered = self
                    .renderer
                    .render(RenderRequest::PaymentReceipt { user, payment })?;
                let metadata = DocumentMetadata {
                    amount: Some(payment.amount),
                    currency: Some(payment.currency.clone()),
                    session_id: payment.session_id.clone(),
                    ..Default::default()
                };
                (DocumentType::PaymentReceipt, rendered, metadata)
            }
        };
        Ok(Document::new(user.id, doc_type, rendered.bytes, metadata))
    }
}
