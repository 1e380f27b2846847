//! Message detail formatting.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::constants::MAX_NUMBERED_ATTACHMENTS;
use crate::mail::MessageDetail;

use super::columns::format_date;

pub const SEPARATOR_WIDTH: usize = 80;
pub const BROWSER_HINT: &str = "Press 'o' to open HTML in browser";
pub const ATTACHMENT_HINT: &str = "Press '1-9' to download attachment, 'shift+a' to download all";

/// Where the displayed body text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource {
    Text,
    /// Converted from HTML; the original can be opened in a browser
    Html,
    /// HTML that could not be converted, shown as-is
    RawHtml,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLine {
    /// 1-based; `None` past the digit keys
    pub number: Option<usize>,
    pub filename: String,
    pub content_type: String,
    pub size: String,
}

impl AttachmentLine {
    pub fn marker(&self) -> String {
        match self.number {
            Some(n) => format!("  {}. ", n),
            None => "  - ".to_string(),
        }
    }

    pub fn details(&self) -> String {
        format!(" ({}, {})", self.content_type, self.size)
    }

    fn width(&self) -> usize {
        self.marker().width() + self.filename.width() + self.details().width()
    }
}

/// Render-ready detail screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub from: String,
    pub subject: String,
    pub date: String,
    pub body: String,
    pub source: BodySource,
    pub attachments: Vec<AttachmentLine>,
    /// Column width the body was wrapped to
    pub width: usize,
}

impl DetailView {
    pub fn can_open_in_browser(&self) -> bool {
        matches!(self.source, BodySource::Html | BodySource::RawHtml)
    }

    pub fn attachments_title(&self) -> String {
        format!("📎 Attachments ({})", self.attachments.len())
    }

    /// Screen rows of the detail screen once wrapped at `width`: headers and
    /// separator, blank, body, then the optional browser and attachment blocks.
    /// Never less than the rows actually drawn.
    pub fn row_count(&self) -> usize {
        let row = |cols: usize| rows(cols, self.width);

        let mut total = row("From: ".width() + self.from.width())
            + row("Subject: ".width() + self.subject.width())
            + row("Date: ".width() + self.date.width())
            + row(SEPARATOR_WIDTH)
            + 1;
        total += self.body.lines().map(|line| row(line.width())).sum::<usize>();
        if self.can_open_in_browser() {
            total += 1 + row(BROWSER_HINT.width());
        }
        if !self.attachments.is_empty() {
            total += 1 + row(self.attachments_title().width());
            total += self.attachments.iter().map(|a| row(a.width())).sum::<usize>();
            total += 1 + row(ATTACHMENT_HINT.width());
        }
        total
    }
}

/// Rows a line of `cols` columns takes when wrapped at `width`
fn rows(cols: usize, width: usize) -> usize {
    cols.div_ceil(width.max(1)).max(1)
}

/// Break every line so none is wider than `width` columns
fn hard_wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut col = 0;
        for ch in line.chars() {
            // Control characters are drawn as a space
            let w = ch.width().unwrap_or(1);
            if col + w > width && col > 0 {
                out.push('\n');
                col = 0;
            }
            out.push(ch);
            col += w;
        }
    }
    out
}

/// Size in kilobytes with one decimal, e.g. `12.5 KB`
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Plain text wins; HTML is converted to text wrapped at `width`
fn body_text(detail: &MessageDetail, width: usize) -> (String, BodySource) {
    if !detail.text.trim().is_empty() {
        return (detail.text.clone(), BodySource::Text);
    }
    if !detail.has_html() {
        return (String::new(), BodySource::Empty);
    }

    let html = detail.html_document();
    match html2text::from_read(html.as_bytes(), width.max(20)) {
        Ok(text) => (text.trim_end().to_string(), BodySource::Html),
        Err(e) => {
            tracing::debug!("HTML conversion failed for {}: {}", detail.id(), e);
            (html, BodySource::RawHtml)
        }
    }
}

pub fn build_detail(detail: &MessageDetail, date_format: &str, width: usize) -> DetailView {
    let (body, source) = body_text(detail, width);
    let body = hard_wrap(&body, width);

    let attachments = detail
        .attachments
        .iter()
        .enumerate()
        .map(|(i, attachment)| AttachmentLine {
            number: (i < MAX_NUMBERED_ATTACHMENTS).then_some(i + 1),
            filename: attachment.filename.clone(),
            content_type: attachment.content_type.clone(),
            size: format_size(attachment.size),
        })
        .collect();

    DetailView {
        from: detail.summary.from.address.clone(),
        subject: detail.summary.subject.clone(),
        date: format_date(&detail.summary.created_at, date_format, "%d/%m/%Y %H:%M:%S"),
        body,
        source,
        attachments,
        width,
    }
}
