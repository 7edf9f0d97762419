use serde::{Serialize, Deserialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::ai_agent::error::{AnalysisError, AnalysisResult};
use crate::ai_agent::utils::response::truncate_chars;

/// Uploaded text is cut to this many characters before it reaches a prompt.
pub const MAX_DOCUMENT_CHARS: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
  Pdf,
  Xbrl,
  Text,
}

impl DocumentKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      DocumentKind::Pdf => "pdf",
      DocumentKind::Xbrl => "xbrl",
      DocumentKind::Text => "text",
    }
  }

  /// An explicit kind wins; otherwise the file extension decides.
  pub fn detect(file_name: &str, declared: Option<&str>) -> AnalysisResult<Self> {
    if let Some(declared) = declared.map(str::trim).filter(|d| !d.is_empty()) {
      return declared.parse::<DocumentKind>().map_err(|_| AnalysisError::UnsupportedDocumentType(declared.to_string()));
    }

    let extension: String = Path::new(file_name).extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| ext.to_lowercase())
      .unwrap_or_default();
    match extension.as_str() {
      "pdf" => Ok(DocumentKind::Pdf),
      "xbrl" | "xml" => Ok(DocumentKind::Xbrl),
      "txt" | "md" | "csv" => Ok(DocumentKind::Text),
      _ => Err(AnalysisError::UnsupportedDocumentType(file_name.to_string())),
    }
  }
}

impl fmt::Display for DocumentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for DocumentKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "pdf" => Ok(DocumentKind::Pdf),
      "xbrl" | "xml" => Ok(DocumentKind::Xbrl),
      "text" | "txt" | "other-text" => Ok(DocumentKind::Text),
      _ => Err(format!("Unknown document kind: {}", s)),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestedDocument {
  pub name: String,
  pub kind: DocumentKind,
  pub text: String,
  pub total_chars: usize,
  pub truncated: bool,
}

pub fn ingest(file_name: &str, declared_kind: Option<&str>, bytes: &[u8]) -> AnalysisResult<IngestedDocument> {
  let kind: DocumentKind = DocumentKind::detect(file_name, declared_kind)?;
  log::info!("Extracting {} text from {} ({} bytes)", kind, file_name, bytes.len());

  let raw: String = match kind {
    DocumentKind::Pdf => extract_pdf(bytes)?,
    DocumentKind::Xbrl => extract_xbrl(bytes)?,
    DocumentKind::Text => String::from_utf8_lossy(bytes).into_owned(),
  };

  let trimmed: &str = raw.trim();
  if trimmed.is_empty() {
    log::warn!("No text extracted from {}; scanned or image-only documents are not supported", file_name);
    return Err(AnalysisError::EmptyExtractedText);
  }

  let total_chars: usize = trimmed.chars().count();
  let text: String = truncate_chars(trimmed, MAX_DOCUMENT_CHARS).to_string();
  Ok(IngestedDocument { name: file_name.to_string(), kind, text, total_chars, truncated: total_chars > MAX_DOCUMENT_CHARS })
}

fn extract_pdf(bytes: &[u8]) -> AnalysisResult<String> {
  // pdf-extract panics on some malformed files
  match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
    Ok(Ok(text)) => Ok(text),
    Ok(Err(e)) => {
      log::warn!("PDF extraction failed: {}", e);
      Err(AnalysisError::EmptyExtractedText)
    }
    Err(_) => {
      log::warn!("PDF extraction panicked (malformed file)");
      Err(AnalysisError::EmptyExtractedText)
    }
  }
}

/// Flattens XBRL facts into `Element: value` lines.
fn extract_xbrl(bytes: &[u8]) -> AnalysisResult<String> {
  let mut reader = Reader::from_reader(bytes);
  reader.config_mut().trim_text(true);

  let mut buf: Vec<u8> = Vec::new();
  let mut element: String = String::new();
  let mut lines: Vec<String> = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => {
        element = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
      }
      Ok(Event::End(_)) => element.clear(),
      Ok(Event::Text(ref e)) => {
        if let Ok(value) = e.unescape() {
          push_fact(&mut lines, &element, value.trim());
        }
      }
      Ok(Event::CData(ref e)) => {
        let value = String::from_utf8_lossy(e).into_owned();
        push_fact(&mut lines, &element, value.trim());
      }
      Ok(Event::Eof) => break,
      Err(e) => {
        log::warn!("XBRL parse error at byte {}: {}", reader.buffer_position(), e);
        return Err(AnalysisError::EmptyExtractedText);
      }
      _ => {}
    }
    buf.clear();
  }

  Ok(lines.join("\n"))
}

fn push_fact(lines: &mut Vec<String>, element: &str, value: &str) {
  if value.is_empty() {
    return;
  }
  if element.is_empty() {
    lines.push(value.to_string());
  } else {
    lines.push(format!("{}: {}", element, value));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE_XBRL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance" xmlns:in-bse-fin="http://www.bseindia.com/xbrl/fin">
  <in-bse-fin:RevenueFromOperations contextRef="FY24" unitRef="INR">120000</in-bse-fin:RevenueFromOperations>
  <in-bse-fin:ProfitLoss contextRef="FY24" unitRef="INR">15000</in-bse-fin:ProfitLoss>
  <in-bse-fin:NameOfCompany contextRef="FY24">Acme &amp; Sons</in-bse-fin:NameOfCompany>
</xbrli:xbrl>"#;

  /// Single-page PDF showing `text` in Helvetica, with a valid xref table.
  fn minimal_pdf(text: &str) -> Vec<u8> {
    let stream: String = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);
    let objects: Vec<String> = vec![
      "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
      "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
      "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>".to_string(),
      format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
      "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
    ];

    let mut pdf: String = String::from("%PDF-1.4\n");
    let mut offsets: Vec<usize> = Vec::new();
    for (index, body) in objects.iter().enumerate() {
      offsets.push(pdf.len());
      pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
    }

    let xref_start: usize = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
      pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!("trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n", objects.len() + 1, xref_start));
    pdf.into_bytes()
  }

  #[test]
  fn detects_kind_from_extension() {
    assert_eq!(DocumentKind::detect("Q3.PDF", None).unwrap(), DocumentKind::Pdf);
    assert_eq!(DocumentKind::detect("filing.xbrl", None).unwrap(), DocumentKind::Xbrl);
    assert_eq!(DocumentKind::detect("notes.txt", None).unwrap(), DocumentKind::Text);
  }

  #[test]
  fn declared_kind_overrides_extension() {
    assert_eq!(DocumentKind::detect("upload.bin", Some("xbrl")).unwrap(), DocumentKind::Xbrl);
    assert!(matches!(DocumentKind::detect("a.pdf", Some("docx")), Err(AnalysisError::UnsupportedDocumentType(_))));
  }

  #[test]
  fn unsupported_extension_is_rejected() {
    assert!(matches!(ingest("deck.docx", None, b"PK"), Err(AnalysisError::UnsupportedDocumentType(_))));
    assert!(matches!(ingest("README", None, b"hello"), Err(AnalysisError::UnsupportedDocumentType(_))));
  }

  #[test]
  fn xbrl_facts_become_lines() {
    let document = ingest("filing.xml", None, SAMPLE_XBRL.as_bytes()).unwrap();
    assert_eq!(document.kind, DocumentKind::Xbrl);
    assert!(document.text.contains("RevenueFromOperations: 120000"));
    assert!(document.text.contains("ProfitLoss: 15000"));
    assert!(document.text.contains("NameOfCompany: Acme & Sons"));
  }

  #[test]
  fn whitespace_only_text_is_empty() {
    assert!(matches!(ingest("blank.txt", None, b"  \n\t "), Err(AnalysisError::EmptyExtractedText)));
  }

  #[test]
  fn garbage_pdf_does_not_crash() {
    assert!(matches!(ingest("scan.pdf", None, b"not really a pdf"), Err(AnalysisError::EmptyExtractedText)));
  }

  #[test]
  fn pdf_text_is_extracted() {
    let document = ingest("q3.pdf", None, &minimal_pdf("Quarterly revenue 120")).unwrap();
    assert_eq!(document.kind, DocumentKind::Pdf);
    assert!(document.text.contains("Quarterly"), "extracted: {:?}", document.text);
    assert!(!document.truncated);
  }

  #[test]
  fn long_text_is_truncated() {
    let body = "a".repeat(MAX_DOCUMENT_CHARS + 10);
    let document = ingest("notes.md", None, body.as_bytes()).unwrap();
    assert_eq!(document.text.chars().count(), MAX_DOCUMENT_CHARS);
    assert_eq!(document.total_chars, MAX_DOCUMENT_CHARS + 10);
    assert!(document.truncated);
  }
}
