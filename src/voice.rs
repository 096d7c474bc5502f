//! Spoken commands heard on the logic lab page.

/// Words that ask for a screenshot of the current puzzle.
pub const CAPTURE_WORDS: [&str; 3] = ["photo", "capture", "cheese"];

/// Hint shown next to the microphone icon.
pub const VOICE_HINT: &str = "Say \"Photo\" to capture";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    Capture,
}

/// Matches a recognised transcript against the known commands. Anything
/// else the microphone picks up is ignored.
pub fn parse_voice_command(transcript: &str) -> Option<VoiceCommand> {
    let heard = transcript.trim().to_lowercase();
    CAPTURE_WORDS
        .iter()
        .any(|word| heard.contains(word))
        .then_some(VoiceCommand::Capture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_words_anywhere_in_the_phrase() {
        assert_eq!(parse_voice_command("Photo"), Some(VoiceCommand::Capture));
        assert_eq!(
            parse_voice_command("  say CHEESE please "),
            Some(VoiceCommand::Capture)
        );
        assert_eq!(
            parse_voice_command("take a capture"),
            Some(VoiceCommand::Capture)
        );
    }

    #[test]
    fn other_speech_is_ignored() {
        assert_eq!(parse_voice_command("move the robot up"), None);
        assert_eq!(parse_voice_command(""), None);
    }
}
