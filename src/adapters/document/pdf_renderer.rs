//! PDF renderer for member documents.

use crate::domain::event::Event;
use crate::domain::foundation::Timestamp;
use crate::domain::user::{PaymentEntry, User};
use crate::ports::{DocumentRenderer, RenderError, RenderRequest, RenderedDocument};

use super::pdf_writer::{Font, PdfPage, PAGE_HEIGHT, PAGE_WIDTH};

const MARGIN: f32 = 72.0;
const WRAP_CHARS: usize = 80;

/// Renders certificates, receipts and forms with the union letterhead.
#[derive(Debug, Clone)]
pub struct PdfDocumentRenderer {
    organization: String,
}

impl PdfDocumentRenderer {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    fn letterhead(&self, page: &mut PdfPage, title: &str) -> f32 {
        page.frame(36.0, 36.0, PAGE_WIDTH - 72.0, PAGE_HEIGHT - 72.0);
        page.centered(PAGE_HEIGHT - 100.0, 18.0, Font::Bold, &self.organization);
        page.rule(MARGIN, PAGE_WIDTH - MARGIN, PAGE_HEIGHT - 115.0);
        page.centered(PAGE_HEIGHT - 160.0, 22.0, Font::Bold, title);
        PAGE_HEIGHT - 220.0
    }

    fn footer(&self, page: &mut PdfPage, issued: Timestamp) {
        page.rule(MARGIN, PAGE_WIDTH - MARGIN, 110.0);
        page.text(
            MARGIN,
            90.0,
            9.0,
            Font::Regular,
            &format!("Emitido el {} por {}", issued.to_display_date(), self.organization),
        );
    }

    fn affiliation_certificate(&self, user: &User) -> Result<PdfPage, RenderError> {
        let name = member_name(user, "affiliation_certificate")?;
        let mut page = PdfPage::new("Certificado de afiliación");
        let mut y = self.letterhead(&mut page, "CERTIFICADO DE AFILIACIÓN");

        y = page.paragraph(
            MARGIN,
            y,
            12.0,
            WRAP_CHARS,
            &format!(
                "{} certifica que {}, con correo electrónico {}, figura como persona afiliada \
                 a esta organización.",
                self.organization, name, user.email
            ),
        );
        y -= 20.0;
        if let Some(start) = user.membership.start_date {
            page.text(
                MARGIN,
                y,
                12.0,
                Font::Regular,
                &format!("Fecha de alta: {}", start.to_display_date()),
            );
            y -= 18.0;
        }
        if let Some(expiry) = user.membership.expiry_date {
            page.text(
                MARGIN,
                y,
                12.0,
                Font::Regular,
                &format!("Vigente hasta: {}", expiry.to_display_date()),
            );
        }
        self.footer(&mut page, Timestamp::now());
        Ok(page)
    }

    fn payment_receipt(&self, user: &User, payment: &PaymentEntry) -> Result<PdfPage, RenderError> {
        let name = member_name(user, "payment_receipt")?;
        if payment.description.trim().is_empty() {
            return Err(RenderError::MissingData {
                document: "payment_receipt",
                field: "description",
            });
        }
        let mut page = PdfPage::new("Recibo de pago");
        let mut y = self.letterhead(&mut page, "RECIBO DE PAGO");

        let rows = [
            ("Recibo nº", payment.id.to_string()),
            ("Persona afiliada", name.to_string()),
            ("Correo electrónico", user.email.to_string()),
            ("Concepto", payment.description.clone()),
            (
                "Importe",
                format!("{} {}", payment.amount, payment.currency.to_uppercase()),
            ),
            ("Fecha de pago", payment.paid_at.to_display_date()),
        ];
        for (label, value) in rows {
            page.text(MARGIN, y, 12.0, Font::Bold, &format!("{}:", label));
            page.text(MARGIN + 150.0, y, 12.0, Font::Regular, &value);
            y -= 22.0;
        }
        if let Some(session) = &payment.session_id {
            page.text(MARGIN, y - 10.0, 8.0, Font::Regular, &format!("Ref. {}", session));
        }
        self.footer(&mut page, Timestamp::now());
        Ok(page)
    }

    fn course_certificate(&self, user: &User, course: &Event) -> Result<PdfPage, RenderError> {
        let name = member_name(user, "course_certificate")?;
        if course.details.title.trim().is_empty() {
            return Err(RenderError::MissingData {
                document: "course_certificate",
                field: "course",
            });
        }
        let mut page = PdfPage::new("Certificado de curso");
        let mut y = self.letterhead(&mut page, "CERTIFICADO DE APROVECHAMIENTO");

        page.centered(y, 12.0, Font::Regular, "Se certifica que");
        y -= 30.0;
        page.centered(y, 18.0, Font::Bold, name);
        y -= 30.0;
        page.centered(y, 12.0, Font::Regular, "ha completado el curso");
        y -= 30.0;
        page.centered(y, 16.0, Font::Bold, &course.details.title);
        y -= 30.0;

        let mut facts = Vec::new();
        if let Some(hours) = course.details.hours {
            facts.push(format!("Duración: {} horas", hours));
        }
        if let Some(date) = course.details.ends_at.or(course.details.starts_at) {
            facts.push(format!("Fecha: {}", date.to_display_date()));
        }
        if !facts.is_empty() {
            page.centered(y, 12.0, Font::Regular, &facts.join("  ·  "));
        }
        self.footer(&mut page, Timestamp::now());
        Ok(page)
    }

    fn membership_form(&self, user: &User) -> Result<PdfPage, RenderError> {
        let name = member_name(user, "membership_form")?;
        let mut page = PdfPage::new("Ficha de afiliación");
        let mut y = self.letterhead(&mut page, "FICHA DE AFILIACIÓN");

        let not_given = || "-".to_string();
        let rows = [
            ("Nombre", name.to_string()),
            ("Correo electrónico", user.email.to_string()),
            (
                "Teléfono",
                user.profile.phone.clone().unwrap_or_else(not_given),
            ),
            (
                "Departamento",
                user.profile.department.clone().unwrap_or_else(not_given),
            ),
            ("Fecha de registro", user.created_at.to_display_date()),
        ];
        for (label, value) in rows {
            page.text(MARGIN, y, 12.0, Font::Bold, &format!("{}:", label));
            page.text(MARGIN + 150.0, y, 12.0, Font::Regular, &value);
            page.rule(MARGIN + 150.0, PAGE_WIDTH - MARGIN, y - 4.0);
            y -= 28.0;
        }
        y -= 40.0;
        page.text(MARGIN, y, 12.0, Font::Regular, "Firma:");
        page.rule(MARGIN + 60.0, MARGIN + 260.0, y - 4.0);
        self.footer(&mut page, Timestamp::now());
        Ok(page)
    }
}

impl Default for PdfDocumentRenderer {
    fn default() -> Self {
        Self::new("Sindicato")
    }
}

impl DocumentRenderer for PdfDocumentRenderer {
    fn render(&self, request: RenderRequest<'_>) -> Result<RenderedDocument, RenderError> {
        let page = match request {
            RenderRequest::AffiliationCertificate { user } => self.affiliation_certificate(user)?,
            RenderRequest::PaymentReceipt { user, payment } => self.payment_receipt(user, payment)?,
            RenderRequest::CourseCertificate { user, course } => {
                self.course_certificate(user, course)?
            }
            RenderRequest::MembershipForm { user } => self.membership_form(user)?,
        };
        Ok(RenderedDocument::new(page.finish()))
    }
}

fn member_name<'a>(user: &'a User, document: &'static str) -> Result<&'a str, RenderError> {
    let name = user.profile.name.trim();
    if name.is_empty() {
        return Err(RenderError::MissingData {
            document,
            field: "name",
        });
    }
    Ok(name)
}
