use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{engine}: {message}")]
    Engine {
        engine: &'static str,
        message: String,
    },
    #[error("no extractable text layer ({attempts})")]
    NoText { attempts: String },
}

/// One way of turning PDF bytes into text. Engines are tried in a fixed
/// order; appending a new engine changes nothing else.
pub trait TextEngine {
    fn name(&self) -> &'static str;
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

pub struct LopdfEngine;

impl TextEngine for LopdfEngine {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Engine {
            engine: self.name(),
            message: e.to_string(),
        })?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(ExtractError::Engine {
                engine: self.name(),
                message: "document has no pages".to_string(),
            });
        }
        doc.extract_text(&pages).map_err(|e| ExtractError::Engine {
            engine: self.name(),
            message: e.to_string(),
        })
    }
}

pub struct PdfExtractEngine;

impl TextEngine for PdfExtractEngine {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Engine {
            engine: self.name(),
            message: e.to_string(),
        })
    }
}

pub struct PdfTextExtractor {
    engines: Vec<Box<dyn TextEngine>>,
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::with_engines(vec![Box::new(LopdfEngine), Box::new(PdfExtractEngine)])
    }
}

impl PdfTextExtractor {
    pub fn with_engines(engines: Vec<Box<dyn TextEngine>>) -> Self {
        Self { engines }
    }

    /// Extracts the document text as trimmed, non-empty lines.
    ///
    /// An engine that errors or produces only whitespace counts as a failed
    /// attempt and the next engine is tried. `Err` means every engine failed,
    /// which keeps "could not read document" distinguishable from a readable
    /// document in which no grade lines match.
    pub fn extract_lines(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let mut attempts = Vec::new();
        for engine in &self.engines {
            match engine.extract(bytes) {
                Ok(text) if !text.trim().is_empty() => {
                    log::debug!("{} extracted {} chars", engine.name(), text.len());
                    return Ok(text
                        .lines()
                        .map(|line| line.trim().to_string())
                        .filter(|line| !line.is_empty())
                        .collect());
                }
                Ok(_) => {
                    log::warn!("{} produced empty output", engine.name());
                    attempts.push(format!("{}: empty output", engine.name()));
                }
                Err(e) => {
                    log::warn!("{e}");
                    attempts.push(e.to_string());
                }
            }
        }
        Err(ExtractError::NoText {
            attempts: attempts.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl TextEngine for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl TextEngine for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
            Err(ExtractError::Engine {
                engine: self.name(),
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn fallback_engine_used_when_primary_fails() {
        let extractor =
            PdfTextExtractor::with_engines(vec![Box::new(Failing), Box::new(Fixed("CS101 A+"))]);
        let lines = extractor.extract_lines(b"ignored").unwrap();
        assert_eq!(lines, vec!["CS101 A+".to_string()]);
    }

    #[test]
    fn whitespace_only_output_counts_as_failure() {
        let extractor =
            PdfTextExtractor::with_engines(vec![Box::new(Fixed("  \n\t\n")), Box::new(Fixed("CS101 A"))]);
        let lines = extractor.extract_lines(b"ignored").unwrap();
        assert_eq!(lines, vec!["CS101 A".to_string()]);
    }

    #[test]
    fn error_reports_every_attempt() {
        let extractor =
            PdfTextExtractor::with_engines(vec![Box::new(Failing), Box::new(Fixed(""))]);
        let err = extractor.extract_lines(b"ignored").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("failing: boom"));
        assert!(message.contains("fixed: empty output"));
    }

    #[test]
    fn lines_are_trimmed_and_blank_lines_dropped() {
        let extractor = PdfTextExtractor::with_engines(vec![Box::new(Fixed(
            "  CS101 A  \n\n   MA1014 B+\n",
        ))]);
        let lines = extractor.extract_lines(b"ignored").unwrap();
        assert_eq!(lines, vec!["CS101 A".to_string(), "MA1014 B+".to_string()]);
    }

    #[test]
    fn real_engines_reject_garbage_bytes() {
        let extractor = PdfTextExtractor::default();
        assert!(extractor.extract_lines(b"this is not a pdf").is_err());
    }
}
