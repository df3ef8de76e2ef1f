//! HTML email templates.
//!
//! Every interpolated value is HTML-escaped. Subjects are plain text.

use crate::domain::foundation::Money;
use crate::domain::submission::{AffiliationRequest, ContactMessage};
use crate::domain::suggestion::Suggestion;

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\"><title>{title}</title></head>",
            "<body style=\"font-family:Arial,sans-serif;color:#1f2937;max-width:600px;margin:0 auto\">",
            "<div style=\"background:#b91c1c;color:#fff;padding:16px 24px\"><h1 style=\"margin:0;font-size:20px\">{title}</h1></div>",
            "<div style=\"padding:24px\">{body}</div>",
            "<div style=\"padding:12px 24px;font-size:12px;color:#6b7280\">Este es un mensaje automático, por favor no respondas a este correo.</div>",
            "</body></html>"
        ),
        title = escape_html(title),
        body = body,
    )
}

pub fn welcome(name: &str) -> RenderedEmail {
    let body = format!(
        "<p>Hola {},</p><p>Tu cuenta en el portal del sindicato se ha creado correctamente. \
         Ya puedes acceder a tus documentos, cursos y avisos.</p>\
         <p>Hemos generado tu ficha de afiliación y la encontrarás en la sección de documentos.</p>",
        escape_html(name)
    );
    RenderedEmail {
        subject: "Bienvenido/a al sindicato".to_string(),
        html: layout("Bienvenido/a", &body),
    }
}

pub fn password_changed(name: &str) -> RenderedEmail {
    let body = format!(
        "<p>Hola {},</p><p>La contraseña de tu cuenta se ha cambiado correctamente.</p>\
         <p>Si no has sido tú, ponte en contacto con la secretaría inmediatamente.</p>",
        escape_html(name)
    );
    RenderedEmail {
        subject: "Tu contraseña ha sido cambiada".to_string(),
        html: layout("Cambio de contraseña", &body),
    }
}

pub fn payment_confirmation(name: &str, amount: Money, currency: &str, description: &str) -> RenderedEmail {
    let body = format!(
        "<p>Hola {},</p><p>Hemos recibido tu pago de <strong>{} {}</strong> en concepto de {}.</p>\
         <p>El recibo está disponible en la sección de documentos del portal.</p>",
        escape_html(name),
        amount,
        escape_html(&currency.to_uppercase()),
        escape_html(description)
    );
    RenderedEmail {
        subject: "Pago recibido".to_string(),
        html: layout("Confirmación de pago", &body),
    }
}

pub fn suggestion_status_changed(suggestion: &Suggestion) -> RenderedEmail {
    let excerpt: String = suggestion.message.chars().take(200).collect();
    let notes = suggestion
        .admin_notes
        .as_deref()
        .map(|n| format!("<p><strong>Notas:</strong> {}</p>", escape_html(n)))
        .unwrap_or_default();
    let body = format!(
        "<p>Hola {},</p><p>Tu sugerencia ha cambiado al estado <strong>{}</strong>.</p>\
         <blockquote style=\"border-left:3px solid #d1d5db;padding-left:12px;color:#4b5563\">{}</blockquote>{}",
        escape_html(suggestion.name.as_deref().unwrap_or("compañero/a")),
        suggestion.status.label(),
        escape_html(&excerpt),
        notes
    );
    RenderedEmail {
        subject: format!("Tu sugerencia: {}", suggestion.status.label()),
        html: layout("Actualización de tu sugerencia", &body),
    }
}

pub fn contact_received(message: &ContactMessage) -> RenderedEmail {
    let body = format!(
        "<p><strong>Nombre:</strong> {}</p><p><strong>Email:</strong> {}</p>\
         <p><strong>Asunto:</strong> {}</p><p>{}</p>",
        escape_html(&message.name),
        escape_html(message.email.as_str()),
        escape_html(&message.subject),
        escape_html(&message.message)
    );
    RenderedEmail {
        subject: format!("Nuevo mensaje de contacto: {}", message.subject),
        html: layout("Nuevo mensaje de contacto", &body),
    }
}

pub fn affiliation_received(request: &AffiliationRequest) -> RenderedEmail {
    let optional = |label: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|v| format!("<p><strong>{}:</strong> {}</p>", label, escape_html(v)))
            .unwrap_or_default()
    };
    let body = format!(
        "<p><strong>Nombre:</strong> {}</p><p><strong>Email:</strong> {}</p>{}{}{}{}",
        escape_html(&request.name),
        escape_html(request.email.as_str()),
        optional("Teléfono", &request.phone),
        optional("Departamento", &request.department),
        optional("Centro de trabajo", &request.workplace),
        optional("Comentarios", &request.comments),
    );
    RenderedEmail {
        subject: format!("Nueva solicitud de afiliación: {}", request.name),
        html: layout("Nueva solicitud de afiliación", &body),
    }
}
