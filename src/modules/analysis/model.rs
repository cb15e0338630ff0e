use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treats `null` like a missing field; models occasionally emit it.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intensity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lighting: String,
}

/// Analysis document stored next to a video as `<name>-analysis.json`.
///
/// Keys the model returns beyond the expected shape are kept in `extra`
/// and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub outfit: Outfit,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activity: Activity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub background: Background,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_size_mb: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const SEE_RAW: &str = "See raw response";
const UNKNOWN: &str = "unknown";

impl VideoAnalysis {
    /// Degenerate document used when the model reply is not usable JSON.
    pub fn fallback(raw: &str) -> Self {
        Self {
            outfit: Outfit { description: SEE_RAW.into(), ..Default::default() },
            activity: Activity {
                description: SEE_RAW.into(),
                intensity: UNKNOWN.into(),
                ..Default::default()
            },
            background: Background {
                description: SEE_RAW.into(),
                location_type: UNKNOWN.into(),
                environment: SEE_RAW.into(),
                lighting: UNKNOWN.into(),
            },
            summary: raw.to_string(),
            raw_response: Some(raw.to_string()),
            ..Default::default()
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.raw_response.is_some()
    }

    /// Overwrites the metadata fields, whatever the model put there.
    pub fn stamp(
        &mut self,
        video_file: impl Into<String>,
        video_size_mb: f64,
        analyzed_at: chrono::DateTime<chrono::Utc>,
    ) {
        self.analyzed_at = Some(analyzed_at);
        self.video_file = Some(video_file.into());
        self.video_size_mb = Some(video_size_mb);
    }

    /// Human-readable rendering for terminals and logs.
    pub fn format_summary(&self) -> String {
        if let Some(raw) = &self.raw_response {
            return raw.clone();
        }

        format!(
            "OUTFIT:\n   {}\n   Items: {}\n   Colors: {}\n\n\
             ACTIVITY:\n   {}\n   Actions: {}\n   Intensity: {}\n\n\
             BACKGROUND:\n   {}\n   Location: {}\n   Environment: {}\n   Lighting: {}\n\n\
             SUMMARY:\n   {}\n",
            self.outfit.description,
            self.outfit.items.join(", "),
            self.outfit.colors.join(", "),
            self.activity.description,
            self.activity.actions.join(", "),
            self.activity.intensity,
            self.background.description,
            self.background.location_type,
            self.background.environment,
            self.background.lighting,
            self.summary,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Done,
    Failed,
}

/// In-memory record of one background analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub filename: String,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AnalysisTask {
    pub fn pending(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: AnalysisStatus::Pending,
            error: None,
            queued_at: Some(chrono::Utc::now()),
            finished_at: None,
        }
    }

    /// A task known only from a sidecar already on disk.
    pub fn done_on_disk(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: AnalysisStatus::Done,
            error: None,
            queued_at: None,
            finished_at: None,
        }
    }
}

/// What `GET /analysis/{filename}` found.
#[derive(Debug)]
pub enum AnalysisLookup {
    Ready(Box<VideoAnalysis>),
    Pending(AnalysisTask),
    Failed(AnalysisTask),
    Missing,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: VideoAnalysis,
    pub analysis_file: String,
}
