use rand::seq::SliceRandom;

use crate::modules::post::model::PostStyle;

const DEFAULT_TOPIC: &str = "LinkedIn";

/// Offline writer used when no chat model is configured.
pub fn write_post<R: rand::Rng + ?Sized>(style: PostStyle, context: &str, rng: &mut R) -> String {
    let details = context.trim();
    let topic = if details.is_empty() { DEFAULT_TOPIC } else { details };

    match style {
        PostStyle::Performative => performative(topic, details, rng),
        PostStyle::Serious => serious(topic, details, rng),
        PostStyle::Cluely => cluely(topic, details, rng),
        PostStyle::Boardy => boardy(topic, details, rng),
    }
}

fn pick<'a, R: rand::Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn performative<R: rand::Rng + ?Sized>(topic: &str, details: &str, rng: &mut R) -> String {
    let opening = pick(
        &[
            "I'm incredibly humbled to announce...",
            "I'm honored to share...",
            "After years of hard work...",
            "Today marks a significant milestone...",
            "I never thought I'd be saying this, but...",
        ],
        rng,
    );

    if rng.gen_bool(0.5) {
        format!(
            "{opening}\n\n{details}\n\n\
             This journey wouldn't have been possible without the amazing team who believed in {topic} from day one.\n\n\
             Key learnings:\n✅ Always stay curious\n✅ Embrace failure as growth\n✅ Network with purpose\n✅ Give back to the community\n\n\
             Here's to the next chapter! 🚀\n\n\
             What's your biggest career lesson this year? Drop it below! 👇\n\n\
             #Leadership #Growth #Success #Grateful"
        )
    } else {
        format!(
            "Lesson learned about {topic}:\n\n{details}\n\n\
             5 years ago, I would have never imagined this.\n\n\
             But here's what I've learned:\n→ Success is a team sport\n→ Authenticity builds trust\n→ Impact over ego\n→ Always be learning\n\n\
             Grateful for this journey and excited for what's next! 💡\n\n\
             #ThoughtLeadership #Innovation #CareerGrowth #Blessed"
        )
    }
}

fn serious<R: rand::Rng + ?Sized>(topic: &str, details: &str, rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        format!(
            "Leveraging synergies in {topic}: A paradigm shift\n\n{details}\n\n\
             In today's rapidly evolving landscape, organizations must pivot to embrace transformational strategies that drive stakeholder value.\n\n\
             Key takeaways:\n🔹 Optimize vertical integration\n🔹 Maximize operational excellence\n🔹 Foster cross-functional collaboration\n🔹 Deploy agile methodologies\n\n\
             Let's circle back offline to drill down on these action items.\n\n\
             #DigitalTransformation #EnterpriseStrategy #Innovation #Leadership"
        )
    } else {
        format!(
            "Disrupting {topic} through strategic innovation\n\n{details}\n\n\
             As we navigate the new normal, it's imperative to:\n• Cultivate a culture of continuous improvement\n• Harness the power of data-driven insights\n• Scale sustainable growth initiatives\n\n\
             At the end of the day, it's about creating value propositions that move the needle.\n\n\
             #BusinessStrategy #Synergy #ThoughtLeadership"
        )
    }
}

fn cluely<R: rand::Rng + ?Sized>(topic: &str, details: &str, rng: &mut R) -> String {
    let hooks = [
        format!("{topic} isn't the problem. Your mindset is."),
        format!("Hot take: {topic} is actually the future."),
        format!(
            "Everyone's pretending they don't use {topic}. I just said the quiet part out loud."
        ),
        format!("Unpopular opinion: {topic} is efficient, not unethical."),
    ];
    let hook = hooks.choose(rng).map(String::as_str).unwrap_or_default();

    format!(
        "{hook}\n\n{details}\n\n\
         The world is changing faster than your comfort zone. Adapt or get left behind.\n\n\
         Stop pretending authenticity matters more than results.\n\n\
         💭 Debate me below.\n\n#Disruption #Innovation #AI"
    )
}

fn boardy<R: rand::Rng + ?Sized>(topic: &str, details: &str, rng: &mut R) -> String {
    let opening = pick(
        &[
            "💭 A year ago, I felt stuck.",
            "If you're tired of feeling like everyone's life is moving faster than yours, read this:",
            "I've almost given up on my dream more times than I can count.",
        ],
        rng,
    );

    format!(
        "{opening}\n\n{details}\n\n\
         It felt like everyone around me had it figured out. New jobs. Promotions. {topic}.\n\n\
         But that mindset is the trap.\n\n\
         Once I stopped comparing and started scheduling more alignment syncs, everything changed.\n\n\
         Success isn't a race. It's a recurring calendar invite.\n\n\
         Let's take this offline. 👇"
    )
}
