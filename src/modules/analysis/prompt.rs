use std::path::Path;

pub const ANALYSIS_PROMPT: &str = r#"Analyze this video and provide a detailed JSON response with the following information:

1. **Outfit**: Describe what the person is wearing (clothing items, colors, style, accessories)
2. **Activity**: Describe what the person is doing or the action taking place
3. **Background**: Describe the setting, environment, and surroundings

Please format your response as valid JSON with this exact structure:
{
  "outfit": {
    "description": "detailed description of clothing and appearance",
    "items": ["list", "of", "clothing items"],
    "colors": ["list", "of", "dominant colors"]
  },
  "activity": {
    "description": "what the person is doing",
    "actions": ["list", "of", "specific actions"],
    "intensity": "low/medium/high"
  },
  "background": {
    "description": "description of the setting",
    "location_type": "indoor/outdoor/unknown",
    "environment": "description of surroundings",
    "lighting": "description of lighting conditions"
  },
  "summary": "brief overall summary of the video scene"
}

Be specific and detailed in your observations."#;

pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Fixed extension table; anything unrecognized is sent as mp4.
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "mov" => "video/quicktime",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        _ => DEFAULT_VIDEO_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_extensions() {
        assert_eq!(mime_type_for(Path::new("a.MOV")), "video/quicktime");
        assert_eq!(mime_type_for(Path::new("a.webm")), "video/webm");
        assert_eq!(mime_type_for(Path::new("dir/a.avi")), "video/x-msvideo");
    }

    #[test]
    fn defaults_to_mp4() {
        assert_eq!(mime_type_for(Path::new("a.mkv")), "video/mp4");
        assert_eq!(mime_type_for(Path::new("no_extension")), "video/mp4");
    }

    #[test]
    fn asks_for_all_four_sections() {
        for key in ["\"outfit\"", "\"activity\"", "\"background\"", "\"summary\""] {
            assert!(ANALYSIS_PROMPT.contains(key));
        }
    }
}
