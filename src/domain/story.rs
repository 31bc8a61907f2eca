//! Story timeline: one document per user holding an ordered list of scenes.
//!
//! Scene identity is positional. Every mutation addressed by index validates
//! the index first and leaves the document untouched on failure.

use serde::{Deserialize, Serialize};

use crate::domain::entry::Entry;
use crate::domain::errors::DomainError;
use crate::domain::types::{DurationSeconds, ImageData, TagSet, ThemeColor};

/// A single shot on the story timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub image: ImageData,
    pub prompt_text: String,
    pub video_title: String,
    pub duration_seconds: Option<DurationSeconds>,
    pub animation_prompt: String,
    pub tags: TagSet,
    pub done: bool,
}

impl Scene {
    /// A scene with only the image set.
    pub fn new(image: ImageData) -> Self {
        Self {
            image,
            prompt_text: String::new(),
            video_title: String::new(),
            duration_seconds: None,
            animation_prompt: String::new(),
            tags: TagSet::default(),
            done: false,
        }
    }

    /// Copies image, prompt and tags; the video title defaults to the prompt.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            image: entry.image.clone(),
            prompt_text: entry.prompt_text.as_str().to_string(),
            video_title: entry.prompt_text.as_str().to_string(),
            duration_seconds: None,
            animation_prompt: String::new(),
            tags: entry.tags.clone(),
            done: false,
        }
    }

    /// Relative width on the timeline scale.
    pub fn weight(&self) -> u32 {
        self.duration_seconds.map_or(1, DurationSeconds::get)
    }
}

/// Partial scene update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePatch {
    pub image: Option<ImageData>,
    pub prompt_text: Option<String>,
    pub video_title: Option<String>,
    /// `Some(None)` clears the duration.
    pub duration_seconds: Option<Option<DurationSeconds>>,
    pub animation_prompt: Option<String>,
    pub tags: Option<TagSet>,
    pub done: Option<bool>,
}

/// Per-user story: scenario text, theme and ordered scenes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
    pub scenario: String,
    pub theme_color: ThemeColor,
    pub scenes: Vec<Scene>,
}

/// One scene's slot on the proportional timeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub index: usize,
    pub weight: u32,
    /// Sum of the weights of all preceding scenes.
    pub offset: u64,
    /// Share of the full timeline in `[0, 1]`.
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub total_weight: u64,
    /// Sum of the durations that are actually set.
    pub known_duration_seconds: u64,
    pub segments: Vec<TimelineSegment>,
}

impl StoryDocument {
    fn check_index(&self, index: usize) -> Result<(), DomainError> {
        if index < self.scenes.len() {
            Ok(())
        } else {
            Err(DomainError::SceneIndexOutOfRange {
                index,
                len: self.scenes.len(),
            })
        }
    }

    pub fn set_meta(&mut self, scenario: Option<String>, theme_color: Option<ThemeColor>) {
        if let Some(scenario) = scenario {
            self.scenario = scenario;
        }
        if let Some(theme_color) = theme_color {
            self.theme_color = theme_color;
        }
    }

    pub fn push_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    pub fn update_scene(&mut self, index: usize, patch: ScenePatch) -> Result<(), DomainError> {
        self.check_index(index)?;
        let scene = &mut self.scenes[index];

        if let Some(image) = patch.image {
            scene.image = image;
        }
        if let Some(prompt_text) = patch.prompt_text {
            scene.prompt_text = prompt_text;
        }
        if let Some(video_title) = patch.video_title {
            scene.video_title = video_title;
        }
        if let Some(duration) = patch.duration_seconds {
            scene.duration_seconds = duration;
        }
        if let Some(animation_prompt) = patch.animation_prompt {
            scene.animation_prompt = animation_prompt;
        }
        if let Some(tags) = patch.tags {
            scene.tags = tags;
        }
        if let Some(done) = patch.done {
            scene.done = done;
        }
        Ok(())
    }

    /// Removes the scene at `index`; later scenes shift down by one.
    pub fn delete_scene(&mut self, index: usize) -> Result<Scene, DomainError> {
        self.check_index(index)?;
        Ok(self.scenes.remove(index))
    }

    pub fn set_scene_done(&mut self, index: usize, done: bool) -> Result<(), DomainError> {
        self.check_index(index)?;
        self.scenes[index].done = done;
        Ok(())
    }

    /// Moves the scene at `from` so that it ends up at position `to`.
    pub fn move_scene(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let scene = self.scenes.remove(from);
        self.scenes.insert(to, scene);
        Ok(())
    }

    pub fn timeline(&self) -> Timeline {
        let total_weight: u64 = self.scenes.iter().map(|s| u64::from(s.weight())).sum();
        let known_duration_seconds = self
            .scenes
            .iter()
            .filter_map(|s| s.duration_seconds)
            .map(|d| u64::from(d.get()))
            .sum();

        let mut offset = 0u64;
        let segments = self
            .scenes
            .iter()
            .enumerate()
            .map(|(index, scene)| {
                let weight = scene.weight();
                let segment = TimelineSegment {
                    index,
                    weight,
                    offset,
                    width: weight as f64 / total_weight as f64,
                };
                offset += u64::from(weight);
                segment
            })
            .collect();

        Timeline {
            total_weight,
            known_duration_seconds,
            segments,
        }
    }
}
