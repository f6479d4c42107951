use serde::{Deserialize, Serialize};

use crate::utils::AppError;

const PREVIEW_LEN: usize = 50;

/// `sequences` may be a single string or a list.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum SequenceInput {
    One(String),
    Many(Vec<String>),
}

impl SequenceInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SequenceInput::One(seq) => vec![seq],
            SequenceInput::Many(seqs) => seqs,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct PredictRequest {
    pub sequences: Option<SequenceInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub supported_genes: Vec<String>,
    pub model_type: String,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            name: "Gene Sequence Species Classifier".to_string(),
            version: "1.0.0".to_string(),
            description: "Stacked ensemble model for species identification from gene sequences"
                .to_string(),
            supported_genes: ["COI", "16S", "18S", "ITS", "General"]
                .iter()
                .map(|g| g.to_string())
                .collect(),
            model_type: "Stacked Ensemble (LightGBM + XGBoost + Meta Classifier)".to_string(),
        }
    }
}

/// One prediction as returned by the model service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Prediction {
    pub sequence_id: String,
    pub sequence_length: usize,
    pub predicted_species: String,
    pub confidence: f64,
    #[serde(default)]
    pub probability_distribution: Vec<f64>,
    #[serde(default)]
    pub sequence_preview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PredictionResponse {
    pub success: bool,
    pub predictions: Vec<Prediction>,
    pub model_info: ModelInfo,
    pub total_sequences: usize,
}

#[derive(Debug, Deserialize)]
struct ModelServiceReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    predictions: Vec<Prediction>,
    model_info: Option<ModelInfo>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelHealth {
    #[serde(default)]
    model_available: bool,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelInfoResponse {
    pub model_info: ModelInfo,
    pub model_available: bool,
    pub configured: bool,
}

/// Trims, uppercases and keeps only non-empty A/T/G/C sequences.
pub fn clean_sequences(sequences: &[String]) -> Vec<String> {
    sequences
        .iter()
        .map(|seq| seq.trim().to_uppercase())
        .filter(|seq| !seq.is_empty() && seq.chars().all(|c| matches!(c, 'A' | 'T' | 'G' | 'C')))
        .collect()
}

pub fn sequence_preview(sequence: &str) -> String {
    if sequence.chars().count() > PREVIEW_LEN {
        let head: String = sequence.chars().take(PREVIEW_LEN).collect();
        format!("{}...", head)
    } else {
        sequence.to_string()
    }
}

/// Fills the preview for predictions the model service returned without one.
fn complete_predictions(predictions: Vec<Prediction>, sequences: &[String]) -> Vec<Prediction> {
    predictions
        .into_iter()
        .enumerate()
        .map(|(i, mut prediction)| {
            if let Some(seq) = sequences.get(i) {
                if prediction.sequence_preview.is_empty() {
                    prediction.sequence_preview = sequence_preview(seq);
                }
            }
            prediction
        })
        .collect()
}

/// Turns the raw request body into the sequences worth sending to the model.
pub fn prepare(request: PredictRequest) -> Result<Vec<String>, AppError> {
    let raw = request
        .sequences
        .map(SequenceInput::into_vec)
        .filter(|seqs| !seqs.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("No sequences provided".to_string()))?;

    let valid = clean_sequences(&raw);
    if valid.is_empty() {
        return Err(AppError::InvalidRequest(
            "No valid sequences provided. Sequences must contain only A, T, G, C characters"
                .to_string(),
        ));
    }

    Ok(valid)
}

/// HTTP client for the external species model service.
pub struct ModelClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl ModelClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn base_url(&self) -> Result<&str, AppError> {
        self.base_url.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("Species model service is not configured".to_string())
        })
    }

    pub async fn predict(&self, sequences: &[String]) -> Result<PredictionResponse, AppError> {
        let url = format!("{}/predict", self.base_url()?);

        log::info!("🧬 Sending {} sequences to model service", sequences.len());

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "sequences": sequences }))
            .timeout(std::time::Duration::from_secs(60))
            .send()
            .await?;

        let status = response.status();
        let reply: ModelServiceReply = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Unreadable model response ({}): {}", status, e)))?;

        if !status.is_success() || !reply.success {
            let reason = reply
                .error
                .or(reply.message)
                .unwrap_or_else(|| format!("status {}", status));
            return Err(AppError::UpstreamError(format!("Prediction failed: {}", reason)));
        }

        let predictions = complete_predictions(reply.predictions, sequences);

        Ok(PredictionResponse {
            success: true,
            total_sequences: predictions.len(),
            predictions,
            model_info: reply.model_info.unwrap_or_default(),
        })
    }

    pub async fn model_info(&self) -> ModelInfoResponse {
        let configured = self.base_url.is_some();
        let model_available = match self.base_url.as_deref() {
            Some(base) => self.check_health(base).await,
            None => false,
        };

        ModelInfoResponse {
            model_info: ModelInfo::default(),
            model_available,
            configured,
        }
    }

    async fn check_health(&self, base: &str) -> bool {
        let result = self
            .client
            .get(format!("{}/health", base))
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => response
                .json::<ModelHealth>()
                .await
                .map(|h| h.model_available)
                .unwrap_or(false),
            Ok(response) => {
                log::warn!("⚠️  Model service health returned {}", response.status());
                false
            }
            Err(e) => {
                log::warn!("⚠️  Model service unreachable: {}", e);
                false
            }
        }
    }
}
