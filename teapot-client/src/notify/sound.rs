use std::sync::Arc;
use tracing::debug;

/// The two encodings the node ships the mail sound in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    OggVorbis,
    M4a,
}

impl AudioFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            AudioFormat::OggVorbis => "audio/ogg; codecs=\"vorbis\"",
            AudioFormat::M4a => "audio/mp4",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            AudioFormat::OggVorbis => "/static/message.ogg",
            AudioFormat::M4a => "/static/message.m4a",
        }
    }

    /// Vorbis when the player supports it, M4A otherwise
    pub fn negotiate(capability: &dyn PlaybackCapability) -> Self {
        if capability.can_play_type(AudioFormat::OggVorbis.mime()) {
            AudioFormat::OggVorbis
        } else {
            AudioFormat::M4a
        }
    }
}

pub trait PlaybackCapability {
    fn can_play_type(&self, mime: &str) -> bool;
}

/// Audio output that can preload and play one source
pub trait AudioSink: Send + Sync {
    fn load(&self, source: &str);
    fn play(&self);
}

/// Sink for clients without audio output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn load(&self, _source: &str) {}
    fn play(&self) {}
}

impl PlaybackCapability for NullSink {
    fn can_play_type(&self, _mime: &str) -> bool {
        false
    }
}

/// Preloaded notification sound
#[derive(Clone)]
pub struct MailSound {
    sink: Arc<dyn AudioSink>,
    format: AudioFormat,
}

impl MailSound {
    pub fn new(capability: &dyn PlaybackCapability, sink: Arc<dyn AudioSink>) -> Self {
        let format = AudioFormat::negotiate(capability);
        debug!(source = format.source(), "Loading mail sound");
        sink.load(format.source());
        Self { sink, format }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn play(&self) {
        self.sink.play();
    }
}

impl std::fmt::Debug for MailSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSound").field("format", &self.format).finish()
    }
}
