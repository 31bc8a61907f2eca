use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::story::{Scene, ScenePatch};
use crate::domain::types::{DurationSeconds, ImageData, TagSet, ThemeColor, TypeConstraintError};
use crate::forms::supplied;

/// Accepts `12`, `7.5` or `"12"`. Anything else, zero included, means "no duration".
fn parse_duration(value: &Value) -> Option<DurationSeconds> {
    match value {
        Value::Number(n) => n.as_f64().and_then(DurationSeconds::from_number),
        Value::String(s) => DurationSeconds::parse_lenient(s),
        _ => None,
    }
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryMetaForm {
    #[validate(length(max = 20000))]
    pub scenario: Option<String>,
    #[validate(length(max = 32))]
    pub theme_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoryMetaFormPayload {
    /// An empty scenario is a legitimate value and is kept.
    pub scenario: Option<String>,
    pub theme_color: Option<ThemeColor>,
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct SceneForm {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub prompt_text: String,
    #[serde(default)]
    pub video_title: String,
    #[serde(default)]
    pub duration_seconds: Option<Value>,
    #[serde(default)]
    pub animation_prompt: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub tags: Vec<String>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSceneForm {
    pub image: Option<String>,
    pub prompt_text: Option<String>,
    pub video_title: Option<String>,
    /// Present but unparsable or non-positive clears the duration.
    pub duration_seconds: Option<Value>,
    pub animation_prompt: Option<String>,
    #[validate(length(max = 64))]
    pub tags: Option<Vec<String>>,
    pub done: Option<bool>,
}

#[derive(Deserialize)]
pub struct SceneDoneForm {
    pub done: bool,
}

#[derive(Deserialize)]
pub struct MoveSceneForm {
    pub to: usize,
}

#[derive(Debug, Error)]
pub enum StoryFormError {
    #[error("Story form validation failed: {0}")]
    Validation(String),
    #[error("Story form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for StoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<StoryMetaForm> for StoryMetaFormPayload {
    type Error = StoryFormError;

    fn try_from(value: StoryMetaForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            scenario: value.scenario,
            theme_color: supplied(value.theme_color)
                .map(ThemeColor::new)
                .transpose()?,
        })
    }
}

impl TryFrom<SceneForm> for Scene {
    type Error = StoryFormError;

    fn try_from(value: SceneForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Scene {
            image: ImageData::new(value.image)?,
            prompt_text: value.prompt_text,
            video_title: value.video_title,
            duration_seconds: value.duration_seconds.as_ref().and_then(parse_duration),
            animation_prompt: value.animation_prompt,
            tags: TagSet::from_raw(value.tags),
            done: value.done,
        })
    }
}

impl TryFrom<UpdateSceneForm> for ScenePatch {
    type Error = StoryFormError;

    fn try_from(value: UpdateSceneForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(ScenePatch {
            image: supplied(value.image).map(ImageData::new).transpose()?,
            prompt_text: value.prompt_text,
            video_title: value.video_title,
            duration_seconds: value.duration_seconds.as_ref().map(parse_duration),
            animation_prompt: value.animation_prompt,
            tags: value.tags.map(TagSet::from_raw),
            done: value.done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn durations_are_parsed_leniently() {
        assert_eq!(parse_duration(&json!(12)).map(DurationSeconds::get), Some(12));
        assert_eq!(parse_duration(&json!(7.9)).map(DurationSeconds::get), Some(7));
        assert_eq!(parse_duration(&json!(" 5 ")).map(DurationSeconds::get), Some(5));
        assert_eq!(parse_duration(&json!(0)), None);
        assert_eq!(parse_duration(&json!(-3)), None);
        assert_eq!(parse_duration(&json!("soon")), None);
        assert_eq!(parse_duration(&json!(true)), None);
    }

    #[test]
    fn scene_requires_image() {
        let form = SceneForm {
            prompt_text: "wide shot".into(),
            ..SceneForm::default()
        };
        assert!(matches!(
            Scene::try_from(form),
            Err(StoryFormError::TypeConstraint(
                TypeConstraintError::EmptyString("image")
            ))
        ));
    }

    #[test]
    fn update_form_distinguishes_absent_and_cleared_duration() {
        let absent: UpdateSceneForm = serde_json::from_value(json!({ "done": true })).unwrap();
        let patch = ScenePatch::try_from(absent).unwrap();
        assert_eq!(patch.duration_seconds, None);
        assert_eq!(patch.done, Some(true));

        let cleared: UpdateSceneForm =
            serde_json::from_value(json!({ "durationSeconds": "" })).unwrap();
        let patch = ScenePatch::try_from(cleared).unwrap();
        assert_eq!(patch.duration_seconds, Some(None));
    }

    #[test]
    fn blank_theme_color_keeps_current() {
        let form = StoryMetaForm {
            scenario: Some(String::new()),
            theme_color: Some("  ".into()),
        };
        let payload = StoryMetaFormPayload::try_from(form).unwrap();
        assert_eq!(payload.scenario.as_deref(), Some(""));
        assert_eq!(payload.theme_color, None);
    }
}
