//! Dual-channel transcript reconstruction.
//!
//! The recording is stereo: channel 0 carries the agent under test, channel 1 the
//! tester persona. Each channel is transcribed independently into timed words; the
//! merger interleaves both streams by start time and folds consecutive words of the
//! same speaker into one utterance line.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Rendered form of [`Transcript::Unavailable`].
pub const NO_TRANSCRIPT: &str = "No transcript available";

/// One recognized word with its timing in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub start: f64,
    #[serde(default)]
    pub end: f64,
}

impl Word {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// Agent under test (channel 0).
    Agent,
    /// Scripted tester persona (channel 1).
    Tester,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Agent => "Agent",
            Speaker::Tester => "Tester",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
    /// Start time of the first word in the line.
    pub start: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transcript {
    Lines(Vec<TranscriptLine>),
    Unavailable,
}

impl Transcript {
    /// Build a transcript from a multichannel speech-to-text payload
    /// (`results.channels[i].alternatives[0].words`).
    pub fn from_stt_payload(payload: &Value) -> Self {
        let Some(channels) = payload
            .pointer("/results/channels")
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty())
        else {
            warn!("no channel data in transcription payload");
            return Transcript::Unavailable;
        };

        let agent = channels.first().and_then(channel_words);
        let tester = channels.get(1).and_then(channel_words);
        merge(agent.as_deref(), tester.as_deref())
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        match self {
            Transcript::Lines(lines) => lines,
            Transcript::Unavailable => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Transcript::Lines(_))
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transcript::Unavailable => f.write_str(NO_TRANSCRIPT),
            Transcript::Lines(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}: {}", line.speaker.label(), line.text)?;
                }
                Ok(())
            }
        }
    }
}

fn channel_words(channel: &Value) -> Option<Vec<Word>> {
    let words = channel.pointer("/alternatives/0/words")?;
    match serde_json::from_value::<Vec<Word>>(words.clone()) {
        Ok(words) => Some(words),
        Err(e) => {
            warn!(error = %e, "malformed word list in transcription channel");
            None
        }
    }
}

/// Merge the agent channel (A) and tester channel (B) into speaker-attributed lines.
///
/// Returns [`Transcript::Unavailable`] when either channel is absent. Words with equal
/// start times keep concatenation order, so channel A wins ties.
pub fn merge(channel_a: Option<&[Word]>, channel_b: Option<&[Word]>) -> Transcript {
    let (Some(a), Some(b)) = (channel_a, channel_b) else {
        warn!("transcription channel missing; transcript unavailable");
        return Transcript::Unavailable;
    };

    let mut tagged: Vec<(Speaker, &Word)> = a
        .iter()
        .map(|w| (Speaker::Agent, w))
        .chain(b.iter().map(|w| (Speaker::Tester, w)))
        .collect();
    // sort_by is stable
    tagged.sort_by(|(_, x), (_, y)| x.start.total_cmp(&y.start));

    let mut lines: Vec<TranscriptLine> = Vec::new();
    let mut current: Option<(Speaker, f64, Vec<&str>)> = None;

    for (speaker, word) in tagged {
        match current.as_mut() {
            Some((s, _, words)) if *s == speaker => words.push(word.word.as_str()),
            _ => {
                if let Some(done) = current.take() {
                    push_line(&mut lines, done);
                }
                current = Some((speaker, word.start, vec![word.word.as_str()]));
            }
        }
    }
    if let Some(done) = current {
        push_line(&mut lines, done);
    }

    Transcript::Lines(lines)
}

fn push_line(lines: &mut Vec<TranscriptLine>, (speaker, start, words): (Speaker, f64, Vec<&str>)) {
    let text = words.join(" ").trim().to_string();
    if text.is_empty() {
        return;
    }
    // A dropped blank run can leave two runs of the same speaker adjacent.
    if let Some(last) = lines.last_mut() {
        if last.speaker == speaker {
            last.text.push(' ');
            last.text.push_str(&text);
            return;
        }
    }
    lines.push(TranscriptLine {
        speaker,
        text,
        start,
    });
}
