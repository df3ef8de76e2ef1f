//! Minimal single-page PDF 1.4 writer.
//!
//! Supports the two standard Helvetica faces, text, horizontal rules and
//! rectangles. Text is encoded as WinAnsi so Spanish accents render with the
//! built-in fonts; characters outside that code page become `?`.

use std::fmt::Write as _;
use std::io::Write as _;

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// Rough average glyph width as a fraction of the font size.
    fn average_width(&self) -> f32 {
        match self {
            Font::Regular => 0.5,
            Font::Bold => 0.55,
        }
    }
}

#[derive(Debug, Default)]
pub struct PdfPage {
    /// Raw content stream; text runs are WinAnsi bytes, not UTF-8.
    content: Vec<u8>,
    title: String,
}

impl PdfPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            content: Vec::new(),
            title: title.into(),
        }
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, font: Font, text: &str) -> &mut Self {
        let _ = write!(
            self.content,
            "BT /{} {:.1} Tf {:.2} {:.2} Td (",
            font.resource(),
            size,
            x,
            y
        );
        self.content.extend_from_slice(&escape_text(text));
        self.content.extend_from_slice(b") Tj ET\n");
        self
    }

    /// Text horizontally centred on the page.
    pub fn centered(&mut self, y: f32, size: f32, font: Font, text: &str) -> &mut Self {
        let width = text.chars().count() as f32 * size * font.average_width();
        let x = ((PAGE_WIDTH - width) / 2.0).max(36.0);
        self.text(x, y, size, font, text)
    }

    /// Left-aligned paragraph wrapped at `max_chars`. Returns the y below it.
    pub fn paragraph(&mut self, x: f32, y: f32, size: f32, max_chars: usize, text: &str) -> f32 {
        let mut line_y = y;
        for line in wrap(text, max_chars) {
            self.text(x, line_y, size, Font::Regular, &line);
            line_y -= size * 1.4;
        }
        line_y
    }

    pub fn rule(&mut self, x1: f32, x2: f32, y: f32) -> &mut Self {
        let _ = writeln!(self.content, "0.5 w {:.2} {:.2} m {:.2} {:.2} l S", x1, y, x2, y);
        self
    }

    pub fn frame(&mut self, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        let _ = writeln!(self.content, "1.5 w {:.2} {:.2} {:.2} {:.2} re S", x, y, w, h);
        self
    }

    /// Serialise the page into a complete PDF file.
    pub fn finish(self) -> Vec<u8> {
        let stream = self.content;
        let objects: Vec<Vec<u8>> = vec![
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
            b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> /Contents 4 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT
            )
            .into_bytes(),
            {
                let mut obj = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
                obj.extend_from_slice(&stream);
                obj.extend_from_slice(b"\nendstream");
                obj
            },
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_vec(),
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_vec(),
            {
                let mut info = b"<< /Producer (union-portal) /Title (".to_vec();
                info.extend_from_slice(&escape_text(&self.title));
                info.extend_from_slice(b") >>");
                info
            },
        ];

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = writeln!(xref, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            objects.len(),
            xref_at
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

/// Encode as WinAnsi and escape PDF string delimiters.
fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            '\n' | '\r' | '\t' => out.push(b' '),
            ' '..='~' => out.push(c as u8),
            '€' => out.push(0x80),
            '–' => out.push(0x96),
            '—' => out.push(0x97),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Greedy word wrap.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
