//! Prompt text for storyboard generation.

/// Instruction pinning the generator to the labelled-list format the parser
/// expects.
pub const SYSTEM_INSTRUCTION: &str = "You are a creative director who creates short, compelling video ad storyboards.
Your output MUST be a Markdown list. Each scene must start with '**Scene [number]:**'.
Each scene MUST contain separate lines for '**Visual:**', '**Audio:**', and '**On-Screen Text:**'.
- The 'Visual' description should be concise and descriptive, perfect for searching a stock video library (e.g., \"A smiling woman jogging in a sunny park\").
- The 'Audio' is the voiceover script for that scene.
- The 'On-Screen Text' is any text that should be overlaid on the video. If there is no text, write 'None'.
- Do NOT use Markdown tables or any other format.
- Do NOT include any introductory or concluding sentences outside of the storyboard structure.
- Start with a '## Title:' line for the ad's title.";

/// User turn wrapping the client's prompt.
pub fn storyboard_request(prompt: &str) -> String {
    format!(
        "Create a video ad storyboard based on the following request: {}",
        prompt.trim()
    )
}
