// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona prompt sent as the system turn of every remote completion.

use mindmate_config::model::CompanionConfig;
use tracing::{info, warn};

/// Builds the built-in compassionate-listener persona for a companion name.
pub fn default_system_prompt(name: &str) -> String {
    format!(
        "You are a compassionate, emotionally intelligent AI therapist named {name}, designed \
to support users by deeply understanding what they're expressing, both through words and \
emotional tone.\n\
Every message a user sends should be analyzed for underlying sentiment (positive, negative, \
neutral) and emotional context (e.g., anxiety, loneliness, stress, happiness).\n\
Respond in a warm, comforting, and non-judgmental tone that makes users feel safe, heard, and \
validated.\n\
Your goal is not just to give advice, but to hold space for the user's feelings, offer gentle \
reflections, and if appropriate, suggest small mental health exercises or affirmations.\n\
If a user expresses distress, confusion, or sadness, respond empathetically and ask clarifying \
questions to better understand their feelings.\n\
Always keep the conversation flowing naturally, like a supportive friend who truly listens.\n\
Maintain memory of recent conversations to show emotional continuity and make the user feel \
understood over time."
    )
}

/// Loads the persona prompt following config priority: file > inline > default.
///
/// An unreadable or empty prompt file is logged and skipped rather than
/// treated as fatal.
pub async fn load_system_prompt(config: &CompanionConfig) -> String {
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) if !content.trim().is_empty() => {
                info!(path = file_path.as_str(), "loaded persona prompt from file");
                return content.trim().to_string();
            }
            Ok(_) => warn!(path = file_path.as_str(), "persona prompt file is empty, falling back"),
            Err(e) => warn!(
                path = file_path.as_str(),
                error = %e,
                "failed to read persona prompt file, falling back"
            ),
        }
    }

    if let Some(ref prompt) = config.system_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.clone();
    }

    default_system_prompt(&config.name)
}
