//! Test doubles shared by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::env::{AnimationPlayer, ClipId};
use crate::state::AgentId;

/// Animation oracle whose clips are set by the test.
#[derive(Debug, Default)]
pub struct ScriptedAnimation {
    clips: Mutex<BTreeMap<AgentId, (ClipId, f32)>>,
}

impl ScriptedAnimation {
    pub fn play(&self, agent: AgentId, clip: ClipId, progress: f32) {
        self.clips.lock().unwrap().insert(agent, (clip, progress));
    }

    pub fn stop(&self, agent: AgentId) {
        self.clips.lock().unwrap().remove(&agent);
    }
}

impl AnimationPlayer for ScriptedAnimation {
    fn is_at_rest(&self, agent: AgentId) -> bool {
        !self.clips.lock().unwrap().contains_key(&agent)
    }

    fn is_playing_clip(&self, agent: AgentId, clip: ClipId) -> bool {
        self.clips
            .lock()
            .unwrap()
            .get(&agent)
            .is_some_and(|(playing, _)| *playing == clip)
    }

    fn normalized_time(&self, agent: AgentId, clip: ClipId) -> Option<f32> {
        self.clips
            .lock()
            .unwrap()
            .get(&agent)
            .filter(|(playing, _)| *playing == clip)
            .map(|(_, progress)| *progress)
    }
}
