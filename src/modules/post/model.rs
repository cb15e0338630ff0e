use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::api::error;
use crate::modules::analysis::model::VideoAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStyle {
    Performative,
    Serious,
    Cluely,
    Boardy,
}

impl PostStyle {
    pub const ALL: [PostStyle; 4] =
        [PostStyle::Performative, PostStyle::Serious, PostStyle::Cluely, PostStyle::Boardy];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStyle::Performative => "performative",
            PostStyle::Serious => "serious",
            PostStyle::Cluely => "cluely",
            PostStyle::Boardy => "boardy",
        }
    }
}

impl fmt::Display for PostStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStyle {
    type Err = error::SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        PostStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| error::SystemError::bad_request(format!("Unknown post style: {tag}")))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GeneratePostModel {
    #[serde(alias = "postType")]
    #[validate(length(min = 1, message = "Style cannot be empty"))]
    pub style: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Context must be at most 2000 characters"))]
    pub context: String,
    #[serde(default, alias = "hasFile")]
    pub has_file: bool,
    #[serde(default)]
    pub video_analysis: Option<VideoAnalysis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSource {
    Ai,
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePostResponse {
    pub post: String,
    pub style: PostStyle,
    pub source: PostSource,
}
