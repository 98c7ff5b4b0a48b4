//! Sound cues
//!
//! The simulation names the sound; synthesis is the frontend's business.
//! Playback is fire-and-forget and can never fail the simulation.

use std::cell::RefCell;
use std::rc::Rc;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player left the ground
    Jump,
    /// Bullet fired
    Shoot,
    /// Obstacle destroyed or player damaged
    Hit,
    /// Last life lost
    Death,
    /// Waiting for a buff choice
    LevelComplete,
    /// Boss entered the arena
    BossSpawn,
    /// Ammo box picked up
    Collect,
    /// Buff chosen or bonus life earned
    PowerUp,
}

/// Receiver of sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Discards every cue (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Records cues into a shared buffer; clones share the buffer
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    cues: Rc<RefCell<Vec<SoundCue>>>,
}

impl CueRecorder {
    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<SoundCue> {
        std::mem::take(&mut *self.cues.borrow_mut())
    }

    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("cue {:?}", cue);
        self.cues.borrow_mut().push(cue);
    }
}
