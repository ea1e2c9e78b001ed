//! Procedurally generated audio cues via the Web Audio API.
//!
//! No external media files; each cue is an oscillator with a gain envelope.
//! Volume and mute live on the game aggregate; this type only renders them.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::model::SoundCue;
use crate::util::clog;

pub struct GameAudio {
    ctx: Option<AudioContext>,
}

impl Default for GameAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAudio {
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            clog("AudioContext unavailable - sound disabled");
        }
        Self { ctx }
    }

    /// Play a cue at the given volume. Muted or zero volume is silence.
    pub fn play(&self, cue: SoundCue, volume: f64, muted: bool) {
        let vol = (if muted { 0.0 } else { volume.clamp(0.0, 1.0) }) as f32;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        // Browsers suspend the context until a user gesture; clicks are one.
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        match cue {
            SoundCue::Success => self.play_success(ctx, vol),
            SoundCue::Error => self.play_error(ctx, vol),
            SoundCue::GameOver => self.play_game_over(ctx, vol),
        }
    }

    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some((osc, gain))
    }

    /// Rising two-note chime.
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [523.0_f32, 784.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let start = t + i as f64 * 0.09;
            gain.gain().set_value_at_time(vol * 0.4, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.3).ok();
        }
    }

    /// Falling buzz.
    fn play_error(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 0.3)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Slow descending triad.
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [392.0_f32, 330.0, 262.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                return;
            };
            let start = t + i as f64 * 0.22;
            gain.gain().set_value_at_time(vol * 0.45, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.4)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.45).ok();
        }
    }
}
