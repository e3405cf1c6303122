//! `desc.txt` playback descriptor parsing and serialization
//!
//! The first line holds `<width> <height> <rate>`. Every following line that
//! matches `p <loop_count> <pause> <folder>` (or `c ...` for parts that must
//! complete) declares one part. Anything else is ignored.

use crate::{Error, Result};
use std::fmt;

/// File name of the descriptor at the archive root
pub const DESCRIPTOR_NAME: &str = "desc.txt";

/// How a part behaves when playback is interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PartKind {
    /// `p`: may be cut short when boot completes
    #[default]
    Play,
    /// `c`: always plays to the end
    Complete,
}

impl PartKind {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "p" => Some(PartKind::Play),
            "c" => Some(PartKind::Complete),
            _ => None,
        }
    }

    fn token(self) -> &'static str {
        match self {
            PartKind::Play => "p",
            PartKind::Complete => "c",
        }
    }
}

/// Playback directive for one part folder
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartDirective {
    pub kind: PartKind,
    /// Number of passes, 0 loops forever
    pub loop_count: u32,
    /// Pause after the part, in frames
    pub pause: u32,
    /// Folder holding this part's frames
    pub folder_name: String,
}

impl PartDirective {
    /// Creates a `p` directive
    pub fn new(loop_count: u32, pause: u32, folder_name: impl Into<String>) -> Self {
        Self {
            kind: PartKind::Play,
            loop_count,
            pause,
            folder_name: folder_name.into(),
        }
    }

    /// Parses one directive line; returns `None` for anything else
    fn parse_line(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let kind = PartKind::from_token(tokens.next()?)?;
        let loop_count = tokens.next()?.parse().ok()?;
        let pause = tokens.next()?.parse().ok()?;
        let folder_name = tokens.next()?.to_string();
        Some(Self {
            kind,
            loop_count,
            pause,
            folder_name,
        })
    }
}

impl fmt::Display for PartDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.kind.token(),
            self.loop_count,
            self.pause,
            self.folder_name
        )
    }
}

/// Canvas size, frame rate and ordered part directives of a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackDescriptor {
    pub width: u32,
    pub height: u32,
    /// Frames per second, `None` when the header carries no usable rate
    pub rate: Option<u32>,
    parts: Vec<PartDirective>,
}

impl PlaybackDescriptor {
    /// Creates a descriptor with no parts
    pub fn new(width: u32, height: u32, rate: u32) -> Self {
        Self {
            width,
            height,
            rate: (rate > 0).then_some(rate),
            parts: Vec::new(),
        }
    }

    /// Appends a part, rejecting folder names already in use
    pub fn push_part(&mut self, part: PartDirective) -> Result<()> {
        if self.part(&part.folder_name).is_some() {
            return Err(Error::Format(format!(
                "duplicate part folder '{}'",
                part.folder_name
            )));
        }
        self.parts.push(part);
        Ok(())
    }

    /// Part directives in declaration order
    pub fn parts(&self) -> &[PartDirective] {
        &self.parts
    }

    /// Looks up the directive for a folder
    pub fn part(&self, folder_name: &str) -> Option<&PartDirective> {
        self.parts.iter().find(|p| p.folder_name == folder_name)
    }

    /// Parses descriptor text
    ///
    /// Width and height are mandatory integers. A header without exactly
    /// three tokens, or with a rate of 0, yields `rate: None`. Lines that do
    /// not look like part directives are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines();

        let header = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| Error::Format("missing header line".to_string()))?;
        let tokens: Vec<&str> = header.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(Error::Format(format!(
                "header '{}' must start with width and height",
                header.trim()
            )));
        }

        let width = parse_header_int(tokens[0], "width")?;
        let height = parse_header_int(tokens[1], "height")?;
        let rate = if tokens.len() == 3 {
            Some(parse_header_int(tokens[2], "rate")?).filter(|rate| *rate > 0)
        } else {
            tracing::warn!(tokens = tokens.len(), "descriptor header has no usable rate");
            None
        };

        let mut descriptor = Self {
            width,
            height,
            rate,
            parts: Vec::new(),
        };

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let Some(part) = PartDirective::parse_line(line) else {
                tracing::debug!(line = line.trim(), "ignoring descriptor line");
                continue;
            };
            if let Err(err) = descriptor.push_part(part) {
                tracing::warn!(%err, "ignoring descriptor line");
            }
        }

        Ok(descriptor)
    }

    /// Serializes to descriptor text, header first then one line per part
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{} {} {}\n",
            self.width,
            self.height,
            self.rate.unwrap_or(0)
        );
        for part in &self.parts {
            text.push_str(&part.to_string());
            text.push('\n');
        }
        text
    }
}

fn parse_header_int(token: &str, field: &str) -> Result<u32> {
    token
        .parse()
        .map_err(|_| Error::Format(format!("{} '{}' is not an integer", field, token)))
}
