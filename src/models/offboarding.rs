// src/models/offboarding.rs
// Offboarding interview uploads and the exit-reason chart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Audio,
    Sheet,
}

impl UploadKind {
    /// Multipart field name, both inbound and towards the webhook.
    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::Audio => "audio",
            UploadKind::Sheet => "sheet",
        }
    }

    /// Value of the `type` field sent with the file.
    pub fn type_label(self) -> &'static str {
        match self {
            UploadKind::Audio => "audio",
            UploadKind::Sheet => "planilha",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "audio" => Some(UploadKind::Audio),
            "sheet" => Some(UploadKind::Sheet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub kind: UploadKind,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Você não pode selecionar ambos os tipos de arquivo. Por favor, selecione apenas um tipo de arquivo (Áudio ou Planilha).")]
    BothKinds,
    #[error("Selecione um arquivo de áudio ou uma planilha.")]
    Empty,
}

/// At most one file, either audio or sheet.
///
/// Picking a file of the other kind while one is held is rejected and the new
/// file is dropped; picking the same kind again replaces the held file.
#[derive(Debug, Default)]
pub struct UploadSelection {
    selected: Option<UploadFile>,
}

impl UploadSelection {
    pub fn select(&mut self, file: UploadFile) -> Result<(), SelectionError> {
        match &self.selected {
            Some(current) if current.kind != file.kind => Err(SelectionError::BothKinds),
            _ => {
                self.selected = Some(file);
                Ok(())
            }
        }
    }

    pub fn selected(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    pub fn into_file(self) -> Result<UploadFile, SelectionError> {
        self.selected.ok_or(SelectionError::Empty)
    }
}

/// Labels and percentage strings as the dashboard webhook delivers them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub nome: Vec<String>,
    pub porcentagem: Vec<String>,
}

const FALLBACK_REASONS: [&str; 11] = [
    "Clima organizacional",
    "Falta de reconhecimento",
    "Gestão ineficiente",
    "Falta de comunicação",
    "Salário abaixo do mercado",
    "Falta de benefícios",
    "Estagnação profissional",
    "Falta de oportunidades",
    "Melhor oportunidade de emprego",
    "Reestruturação",
    "Outros",
];

impl ChartData {
    pub fn fallback() -> Self {
        ChartData {
            nome: FALLBACK_REASONS.iter().map(|r| r.to_string()).collect(),
            porcentagem: vec!["9.09%".to_string(); FALLBACK_REASONS.len()],
        }
    }

    /// Accepts a JSON array whose first element carries non-empty `nome` and
    /// `porcentagem` string arrays of equal length.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let first = payload.as_array()?.first()?;
        let data: ChartData = serde_json::from_value(first.clone()).ok()?;
        if data.nome.is_empty() || data.nome.len() != data.porcentagem.len() {
            return None;
        }
        Some(data)
    }

    /// Numeric values of `porcentagem`; anything unparsable counts as zero.
    pub fn series(&self) -> Vec<f64> {
        self.porcentagem
            .iter()
            .map(|p| {
                p.replace('%', "")
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSource {
    Webhook,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    #[serde(flatten)]
    pub data: ChartData,
    pub series: Vec<f64>,
    pub source: ChartSource,
}

impl ChartReport {
    pub fn new(data: ChartData, source: ChartSource) -> Self {
        let series = data.series();
        ChartReport { data, series, source }
    }

    pub fn fallback() -> Self {
        Self::new(ChartData::fallback(), ChartSource::Fallback)
    }
}
