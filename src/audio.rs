use std::f32::consts::TAU;

use rand::Rng;
use rodio::buffer::SamplesBuffer;
use rodio::source::Source;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::round::Cue;

const SAMPLE_RATE: u32 = 44_100;

/// All cues are synthesized once at startup, so there are no sound assets to
/// load or go missing.
pub struct Audio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    crunch: Vec<f32>,
    horn: Vec<f32>,
    kiss: Vec<f32>,
    hiss: Vec<f32>,
    drone: Vec<f32>,
}

impl Audio {
    pub fn new() -> Self {
        let (stream, handle) = OutputStream::try_default().expect("Error opening audio output.");

        Audio {
            _stream: stream,
            handle,
            music: None,
            crunch: crunch_samples(),
            horn: horn_samples(),
            kiss: kiss_samples(),
            hiss: hiss_samples(),
            drone: drone_samples(),
        }
    }

    /// Fire-and-forget; a cue that fails to play is dropped silently.
    pub fn play(&self, cue: Cue) {
        let samples = match cue {
            Cue::Crunch => &self.crunch,
            Cue::Horn => &self.horn,
            Cue::Kiss => &self.kiss,
            Cue::Hiss => &self.hiss,
        };

        if let Ok(sink) = Sink::try_new(&self.handle) {
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
            sink.detach();
        }
    }

    pub fn start_music(&mut self) {
        self.stop_music();

        if let Ok(sink) = Sink::try_new(&self.handle) {
            let source = SamplesBuffer::new(1, SAMPLE_RATE, self.drone.clone());
            sink.append(source.repeat_infinite());
            self.music = Some(sink);
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }
}

///////////////////////////////////////////////////////////////////////////

fn render(duration: f32, mut wave: impl FnMut(f32) -> f32) -> Vec<f32> {
    let count = (SAMPLE_RATE as f32 * duration) as usize;
    (0..count).map(|i| wave(i as f32 / SAMPLE_RATE as f32)).collect()
}

fn saw(freq: f32, t: f32) -> f32 {
    2.0 * (t * freq).fract() - 1.0
}

// Short noise burst with a fast decay
fn crunch_samples() -> Vec<f32> {
    let mut rng = rand::thread_rng();
    render(0.15, move |t| rng.gen_range(-1.0f32..1.0) * 0.3 * (-t * 35.0).exp())
}

// Two slightly detuned low saws
fn horn_samples() -> Vec<f32> {
    render(0.9, |t| {
        let attack = (t / 0.05).min(1.0);
        let fade = 1.0 - t / 0.9;
        (saw(98.0, t) + saw(99.0, t)) * 0.14 * attack * fade
    })
}

// Quick upward chirp
fn kiss_samples() -> Vec<f32> {
    render(0.25, |t| {
        let phase = 300.0 * t + (900.0 - 300.0) * t * t / (2.0 * 0.25);
        (TAU * phase).sin() * 0.2 * (1.0 - t / 0.25)
    })
}

// White noise tapering off
fn hiss_samples() -> Vec<f32> {
    let mut rng = rand::thread_rng();
    render(0.7, move |t| rng.gen_range(-1.0f32..1.0) * 0.18 * (1.0 - t / 0.7))
}

// A slow minor dyad; both frequencies complete whole cycles over the loop
// length, so it repeats without a seam
fn drone_samples() -> Vec<f32> {
    render(4.0, |t| {
        let tremolo = 0.75 + 0.25 * (TAU * 0.5 * t).sin();
        ((TAU * 55.0 * t).sin() + (TAU * 82.5 * t).sin()) * 0.08 * tremolo
    })
}
