use indexmap::IndexMap;

/// One record of the input data set: an insertion-ordered mapping from
/// trimmed column name to trimmed string value.
pub type DataRow = IndexMap<String, String>;

/// Output variants selectable once per request via `?outputFormat=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Docx,
    Pdf,
    Both,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "docx" => Some(OutputFormat::Docx),
            "pdf" => Some(OutputFormat::Pdf),
            "both" => Some(OutputFormat::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Both => "both",
        }
    }

    pub fn wants_docx(&self) -> bool {
        matches!(self, OutputFormat::Docx | OutputFormat::Both)
    }

    pub fn wants_pdf(&self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Both)
    }
}

/// A file uploaded through the multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The two expected form fields, either of which may be absent.
#[derive(Debug, Default)]
pub struct GenerateUpload {
    pub template: Option<UploadedFile>,
    pub data: Option<UploadedFile>,
}

/// A named output buffer destined for the ZIP bundle.
#[derive(Debug)]
pub struct GeneratedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}
