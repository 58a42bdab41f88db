//! Line-oriented detector feed.
//!
//! An external capture+detection process writes one line per frame to our
//! stdin:
//!
//! ```text
//! face | 1 | true      face visible in this frame
//! none | 0 | false     frame captured, no face
//! -    | (blank)       camera produced no frame this tick
//! pause                discard the session
//! end                  end and save the session (EOF does the same)
//! ```
//!
//! Unrecognized lines are logged and treated as "no frame".

use std::io::BufRead;

use focus_core::{FaceDetector, FrameSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Frame(bool),
    NoFrame,
    Control(Control),
}

fn parse_line(line: &str) -> Option<Line> {
    match line.trim().to_ascii_lowercase().as_str() {
        "face" | "1" | "true" => Some(Line::Frame(true)),
        "none" | "0" | "false" => Some(Line::Frame(false)),
        "" | "-" => Some(Line::NoFrame),
        "pause" => Some(Line::Control(Control::Pause)),
        "end" => Some(Line::Control(Control::End)),
        _ => None,
    }
}

/// Frame source backed by a line reader (stdin in production).
pub struct LineSignalSource<R> {
    reader: R,
    open: bool,
    control: Option<Control>,
}

impl<R: BufRead> LineSignalSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            open: true,
            control: None,
        }
    }

    /// Returns and clears a pending pause/end request.
    pub fn take_control(&mut self) -> Option<Control> {
        self.control.take()
    }
}

impl<R: BufRead> FrameSource for LineSignalSource<R> {
    type Frame = bool;

    fn capture_frame(&mut self) -> Option<bool> {
        if !self.open {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                tracing::debug!("Detector feed closed");
                self.open = false;
                None
            }
            Ok(_) => match parse_line(&line) {
                Some(Line::Frame(face)) => Some(face),
                Some(Line::NoFrame) => None,
                Some(Line::Control(control)) => {
                    self.control = Some(control);
                    None
                }
                None => {
                    tracing::debug!(line = %line.trim(), "Unrecognized detector line");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read detector feed");
                self.open = false;
                None
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// The upstream process already ran the face model; its verdict is the frame.
pub struct ReportedFaceDetector;

impl FaceDetector<bool> for ReportedFaceDetector {
    fn detect_face(&mut self, frame: &bool) -> bool {
        *frame
    }
}
