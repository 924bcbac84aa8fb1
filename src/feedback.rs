//! Audio and haptic feedback
//!
//! Sinks are fire-and-forget: a missing device or a failed trigger is
//! ignored and never affects the tick.

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    /// Player shot
    Laser,
    /// Enemy destroyed or player rammed
    Explosion,
}

/// Something that can play a sound. Must not block.
pub trait SoundSink: Send {
    fn play(&mut self, kind: SoundKind, volume: f32);
}

/// Something that can vibrate. Must not block.
pub trait Haptics: Send {
    /// Whether a vibrator is present right now
    fn available(&self) -> bool {
        true
    }
    fn vibrate(&mut self, duration_ms: u32);
}

/// Sink that records feedback to the log (headless builds)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, kind: SoundKind, volume: f32) {
        log::debug!("sound {:?} @ {:.2}", kind, volume);
    }
}

impl Haptics for LogSink {
    fn vibrate(&mut self, duration_ms: u32) {
        log::debug!("vibrate {}ms", duration_ms);
    }
}

/// Feedback manager for the game
pub struct Feedback {
    sound: Option<Box<dyn SoundSink>>,
    haptics: Option<Box<dyn Haptics>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    vibration: bool,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Feedback {
    /// Silent feedback configured from settings; attach sinks with the
    /// `with_*` builders.
    pub fn new(settings: &Settings) -> Self {
        Self {
            sound: None,
            haptics: None,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            vibration: settings.vibration,
        }
    }

    pub fn with_sound(mut self, sink: impl SoundSink + 'static) -> Self {
        self.sound = Some(Box::new(sink));
        self
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Some(Box::new(haptics));
        self
    }

    /// Apply the mixer and vibration preferences from `settings`, keeping
    /// the attached sinks
    pub fn configure(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.set_muted(settings.muted);
        self.vibration = settings.vibration;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound at `volume` scaled by the mixer settings
    pub fn play_sound(&mut self, kind: SoundKind, volume: f32) {
        let vol = volume * self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = &mut self.sound else { return };
        sink.play(kind, vol);
    }

    pub fn vibrate(&mut self, duration_ms: u32) {
        if !self.vibration {
            return;
        }
        let Some(haptics) = &mut self.haptics else { return };
        if haptics.available() {
            haptics.vibrate(duration_ms);
        }
    }

    /// React to one simulation event
    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShotFired => self.play_sound(SoundKind::Laser, LASER_VOLUME),
            GameEvent::EnemyDestroyed { .. } => {
                self.play_sound(SoundKind::Explosion, EXPLOSION_VOLUME);
                self.vibrate(KILL_VIBRATE_MS);
            }
            GameEvent::PlayerHit { .. } => {
                self.play_sound(SoundKind::Explosion, EXPLOSION_VOLUME);
                self.vibrate(HIT_VIBRATE_MS);
            }
            // The final breach is announced by the game over instead
            GameEvent::Breach { lives_left } if *lives_left > 0 => {
                self.vibrate(HIT_VIBRATE_MS)
            }
            _ => {}
        }
    }
}
