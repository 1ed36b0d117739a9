//! Audio system using Web Audio API
//!
//! Sound effects are procedurally generated oscillators; the only asset is
//! the looping soundtrack element.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ring collected
    RingChime,
    /// Obstacle impact
    Explosion,
    /// Tutorial-to-live transition
    LiveSwitch,
    /// Round over (time expired)
    TimeUp,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let music = HtmlAudioElement::new_with_src("soundtrack.mp3").ok();
        if let Some(ref music) = music {
            music.set_loop(true);
        }
        Self {
            ctx,
            music,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.apply_music_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.apply_music_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_music_volume();
    }

    /// Get effective SFX volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn apply_music_volume(&self) {
        if let Some(music) = &self.music {
            let vol = if self.muted {
                0.0
            } else {
                self.master_volume * self.music_volume
            };
            music.set_volume(vol as f64);
        }
    }

    /// Start the soundtrack from the top
    pub fn start_music(&self) {
        self.apply_music_volume();
        if let Some(music) = &self.music {
            music.set_current_time(0.0);
            // play() returns a promise; autoplay rejection is not fatal
            let _ = music.play();
        }
    }

    pub fn stop_music(&self) {
        if let Some(music) = &self.music {
            let _ = music.pause();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::RingChime => self.play_ring_chime(ctx, vol),
            SoundEffect::Explosion => self.play_explosion(ctx, vol),
            SoundEffect::LiveSwitch => self.play_live_switch(ctx, vol),
            SoundEffect::TimeUp => self.play_time_up(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Ring pickup - rising two-step chime
    fn play_ring_chime(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.1)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Crash - layered rumble, impact, sizzle, and a noise burst
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Low rumble
        if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.5)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(20.0, t + 1.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.5).ok();
        }

        // Impact crack
        if let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        // High sizzle
        if let Some((osc, gain)) = self.create_osc(ctx, 2000.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(500.0, t + 0.8)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.8).ok();
        }

        // White noise burst
        self.play_noise_burst(ctx, vol * 0.3, 0.3);
    }

    /// Short white-noise buffer through a gain envelope
    fn play_noise_burst(&self, ctx: &AudioContext, gain_start: f32, secs: f64) {
        let sample_rate = ctx.sample_rate();
        let length = (sample_rate as f64 * secs) as u32;
        let Ok(buffer) = ctx.create_buffer(1, length, sample_rate) else {
            return;
        };
        let mut samples = vec![0.0f32; length as usize];
        for s in samples.iter_mut() {
            *s = (js_sys::Math::random() as f32) * 2.0 - 1.0;
        }
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }

        let Ok(source) = ctx.create_buffer_source() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };
        source.set_buffer(Some(&buffer));
        if source.connect_with_audio_node(&gain).is_err() {
            return;
        }
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let t = ctx.current_time();
        gain.gain().set_value_at_time(gain_start, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs)
            .ok();
        source.start().ok();
        source.stop_with_when(t + secs).ok();
    }

    /// Live transition - quick ascending sweep
    fn play_live_switch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }

    /// Clock ran out - descending tone
    fn play_time_up(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.8)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(150.0, t + 0.8)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.8).ok();
    }
}
