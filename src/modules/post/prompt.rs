use crate::modules::{analysis::model::VideoAnalysis, post::model::PostStyle};

const PERFORMATIVE: &str = r#"You are a master of performative LinkedIn posts. Create posts that are:
- Full of humble brags disguised as gratitude
- Mention "blessed" or "grateful" multiple times
- Include unnecessary emojis
- Turn simple achievements into epic journeys
- Name-drop companies or people
- End with vague inspirational advice
- Use phrases like "I'm humbled to announce" when clearly not humble
- Include hashtags like #leadership #growth #blessed"#;

const SERIOUS: &str = r#"You are a master of overly serious corporate LinkedIn posts. Create posts that:
- Use maximum business jargon and buzzwords
- Include phrases like "synergy", "paradigm shift", "disrupt", "leverage", "circle back"
- Take simple concepts and make them unnecessarily complex
- Reference "thought leadership" and "best practices"
- Include statistics that sound impressive but are meaningless
- Use corporate speak like "moving the needle" and "low-hanging fruit"
- End with a call to "connect" or "engage in the conversation""#;

const CLUELY: &str = r#"You are a master of clueless LinkedIn posts. Create posts that:
- Show complete misunderstanding of current trends or technology
- Include outdated references thinking they're cutting edge
- Mix up terminology incorrectly
- Make confidently wrong statements
- Show lack of awareness about how things actually work
- Use technology terms incorrectly
- Display tone-deaf takes on serious topics
- Include cringe attempts at being relatable to younger generations"#;

const BOARDY: &str = r#"You are a master of corporate "boardroom culture" LinkedIn posts. Create posts that:
- Obsess over meetings, synergies, and alignment
- Use phrases like "let's take this offline", "circle back", "touch base"
- Mention quarterly reviews, stakeholder buy-in, and deliverables
- Reference pointless meetings that could have been emails
- Include calendar screenshots showing back-to-back meetings as a flex
- Talk about "meeting fatigue" while scheduling more meetings
- Use corporate meeting jargon like "parking lot ideas" and "action items"
- Celebrate meaningless corporate rituals and ceremonies"#;

pub fn system_prompt(style: PostStyle) -> &'static str {
    match style {
        PostStyle::Performative => PERFORMATIVE,
        PostStyle::Serious => SERIOUS,
        PostStyle::Cluely => CLUELY,
        PostStyle::Boardy => BOARDY,
    }
}

pub fn user_prompt(
    style: PostStyle,
    context: &str,
    has_file: bool,
    analysis: Option<&VideoAnalysis>,
) -> String {
    let mut prompt = format!("Generate a sarcastic, satirical LinkedIn post in the {style} style.");

    let context = context.trim();
    if !context.is_empty() {
        prompt.push_str(&format!(" Context: {context}"));
    }

    if has_file {
        prompt.push_str(&format!(
            " The user has uploaded an image/video to accompany this post (describe what might be \
             in it based on the context, or imagine something appropriately cringe for a {style} post)."
        ));
    }

    if let Some(scene) = analysis.and_then(describe_scene) {
        prompt.push_str(&format!(" The accompanying video shows: {scene}"));
    }

    prompt.push_str(
        " Make it authentically cringe-worthy and recognizable as LinkedIn satire. Keep it between \
         100-200 words. Use line breaks and emojis appropriately for the style.",
    );
    prompt
}

fn describe_scene(analysis: &VideoAnalysis) -> Option<String> {
    let parts: Vec<&str> = [
        analysis.summary.as_str(),
        analysis.outfit.description.as_str(),
        analysis.activity.description.as_str(),
        analysis.background.description.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|part| !part.is_empty() && *part != "See raw response")
    .collect();

    (!parts.is_empty()).then(|| parts.join(" / "))
}
