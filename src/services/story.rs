//! Per-user story timeline.
//!
//! Every mutation returns the full document so callers can re-render it.
//! Reads of a never-touched story return the default document without
//! persisting it; it is written on the first mutation.

use crate::domain::entry::Entry;
use crate::domain::snapshot::UserDocument;
use crate::domain::story::{Scene, ScenePatch, StoryDocument, Timeline};
use crate::domain::types::{EntryId, Username};
use crate::forms::story::StoryMetaFormPayload;
use crate::repository::{SnapshotReader, SnapshotWriter};

use super::{LogStorageError, ServiceError, ServiceResult};

/// Loads `owner`'s document, applies `f` to the story and saves it if `f` succeeds.
fn mutate_story<R, F>(owner: &Username, repo: &R, f: F) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
    F: FnOnce(&mut StoryDocument, &[Entry]) -> ServiceResult<()>,
{
    repo.locks().with_owner(owner, || {
        let mut document = repo.load_user(owner).logged("load story")?;
        let UserDocument { entries, story, .. } = &mut document;
        f(story.get_or_insert_with(StoryDocument::default), entries)?;

        let story = document.story();
        repo.save_user(owner.clone(), document)
            .logged("save story")?;
        Ok(story)
    })
}

pub fn get_story<R>(owner: &Username, repo: &R) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + ?Sized,
{
    let document = repo.load_user(owner).logged("load story")?;
    Ok(document.story())
}

/// Updates scenario text and theme color; `None` keeps the current value.
pub fn set_story_meta<R>(
    owner: &Username,
    payload: StoryMetaFormPayload,
    repo: &R,
) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, _| {
        story.set_meta(payload.scenario, payload.theme_color);
        Ok(())
    })
}

pub fn add_scene<R>(owner: &Username, scene: Scene, repo: &R) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, _| {
        story.push_scene(scene);
        Ok(())
    })
}

/// Appends a scene copied from one of `owner`'s library entries.
pub fn add_scene_from_entry<R>(
    owner: &Username,
    entry_id: EntryId,
    repo: &R,
) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, entries| {
        let entry = entries
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or(ServiceError::NotFound)?;
        story.push_scene(Scene::from_entry(entry));
        Ok(())
    })
}

pub fn update_scene<R>(
    owner: &Username,
    index: usize,
    patch: ScenePatch,
    repo: &R,
) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, _| Ok(story.update_scene(index, patch)?))
}

pub fn delete_scene<R>(owner: &Username, index: usize, repo: &R) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, _| {
        story.delete_scene(index)?;
        Ok(())
    })
}

pub fn set_scene_done<R>(
    owner: &Username,
    index: usize,
    done: bool,
    repo: &R,
) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, _| {
        Ok(story.set_scene_done(index, done)?)
    })
}

pub fn move_scene<R>(
    owner: &Username,
    from: usize,
    to: usize,
    repo: &R,
) -> ServiceResult<StoryDocument>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    mutate_story(owner, repo, |story, _| Ok(story.move_scene(from, to)?))
}

pub fn story_timeline<R>(owner: &Username, repo: &R) -> ServiceResult<Timeline>
where
    R: SnapshotReader + ?Sized,
{
    Ok(get_story(owner, repo)?.timeline())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::NewEntry;
    use crate::domain::types::{
        CategoryName, DEFAULT_THEME_COLOR, DurationSeconds, ImageData, PromptText, TagSet,
        ThemeColor,
    };
    use crate::repository::test::TestRepository;
    use chrono::Utc;

    fn ann() -> Username {
        Username::new("ann").unwrap()
    }

    fn scene(title: &str) -> Scene {
        Scene {
            video_title: title.to_string(),
            ..Scene::new(ImageData::new("data:image/png;base64,AAAA").unwrap())
        }
    }

    fn titles(story: &StoryDocument) -> Vec<&str> {
        story.scenes.iter().map(|s| s.video_title.as_str()).collect()
    }

    fn library_entry() -> Entry {
        NewEntry {
            owner: ann(),
            category: CategoryName::new("Sora").unwrap(),
            prompt_text: PromptText::new("rainy alley").unwrap(),
            image: ImageData::new("data:image/png;base64,BBBB").unwrap(),
            tags: TagSet::from_raw(["noir"]),
            done: true,
        }
        .into_entry(Utc::now().naive_utc())
    }

    #[test]
    fn fresh_story_has_defaults_and_is_not_written() {
        let repo = TestRepository::new();
        let story = get_story(&ann(), &repo).unwrap();

        assert_eq!(story.scenario, "");
        assert_eq!(story.theme_color, DEFAULT_THEME_COLOR);
        assert!(story.scenes.is_empty());
        assert_eq!(repo.commits(), 0);
    }

    #[test]
    fn meta_updates_only_supplied_fields() {
        let repo = TestRepository::new();
        let payload = StoryMetaFormPayload {
            scenario: Some("a heist".into()),
            theme_color: None,
        };
        let story = set_story_meta(&ann(), payload, &repo).unwrap();
        assert_eq!(story.scenario, "a heist");
        assert_eq!(story.theme_color, DEFAULT_THEME_COLOR);

        let payload = StoryMetaFormPayload {
            scenario: None,
            theme_color: Some(ThemeColor::new("#000000").unwrap()),
        };
        let story = set_story_meta(&ann(), payload, &repo).unwrap();
        assert_eq!(story.scenario, "a heist");
        assert_eq!(story.theme_color, "#000000");
    }

    #[test]
    fn delete_shifts_later_scenes() {
        let repo = TestRepository::new();
        for title in ["A", "B", "C"] {
            add_scene(&ann(), scene(title), &repo).unwrap();
        }

        let story = delete_scene(&ann(), 1, &repo).unwrap();
        assert_eq!(titles(&story), ["A", "C"]);
    }

    #[test]
    fn out_of_range_index_leaves_story_untouched() {
        let repo = TestRepository::new();
        add_scene(&ann(), scene("A"), &repo).unwrap();
        let commits = repo.commits();

        assert!(matches!(
            delete_scene(&ann(), 5, &repo),
            Err(ServiceError::IndexOutOfRange(5))
        ));
        assert!(matches!(
            set_scene_done(&ann(), 1, true, &repo),
            Err(ServiceError::IndexOutOfRange(1))
        ));
        assert_eq!(repo.commits(), commits);
        assert_eq!(titles(&get_story(&ann(), &repo).unwrap()), ["A"]);
    }

    #[test]
    fn update_and_done_flag() {
        let repo = TestRepository::new();
        add_scene(&ann(), scene("A"), &repo).unwrap();

        let patch = ScenePatch {
            duration_seconds: Some(DurationSeconds::new(8).ok()),
            animation_prompt: Some("slow pan".into()),
            ..ScenePatch::default()
        };
        let story = update_scene(&ann(), 0, patch, &repo).unwrap();
        assert_eq!(story.scenes[0].duration_seconds.map(DurationSeconds::get), Some(8));
        assert_eq!(story.scenes[0].video_title, "A");

        let story = set_scene_done(&ann(), 0, true, &repo).unwrap();
        assert!(story.scenes[0].done);
    }

    #[test]
    fn move_reorders_scenes() {
        let repo = TestRepository::new();
        for title in ["A", "B", "C"] {
            add_scene(&ann(), scene(title), &repo).unwrap();
        }

        let story = move_scene(&ann(), 0, 2, &repo).unwrap();
        assert_eq!(titles(&story), ["B", "C", "A"]);
    }

    #[test]
    fn scene_from_entry_copies_library_fields() {
        let entry = library_entry();
        let repo = TestRepository::new().with_user(
            "ann",
            UserDocument {
                entries: vec![entry.clone()],
                ..UserDocument::default()
            },
        );

        let story = add_scene_from_entry(&ann(), entry.id, &repo).unwrap();
        let added = &story.scenes[0];
        assert_eq!(added.image, entry.image);
        assert_eq!(added.prompt_text, "rainy alley");
        assert_eq!(added.video_title, "rainy alley");
        assert_eq!(added.tags, ["noir"][..]);
        assert!(!added.done);

        assert!(matches!(
            add_scene_from_entry(&ann(), EntryId::generate(), &repo),
            Err(ServiceError::NotFound)
        ));
        // entries survive the story round trip
        let document = repo.load_user(&ann()).unwrap();
        assert_eq!(document.entries, vec![entry]);
    }

    #[test]
    fn timeline_weights_missing_durations_as_one() {
        let repo = TestRepository::new();
        let mut long = scene("A");
        long.duration_seconds = DurationSeconds::new(3).ok();
        add_scene(&ann(), long, &repo).unwrap();
        add_scene(&ann(), scene("B"), &repo).unwrap();

        let timeline = story_timeline(&ann(), &repo).unwrap();
        assert_eq!(timeline.total_weight, 4);
        assert_eq!(timeline.known_duration_seconds, 3);
        assert_eq!(timeline.segments[1].offset, 3);
        assert!((timeline.segments[0].width - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_save_discards_mutation() {
        let repo = TestRepository::new();
        add_scene(&ann(), scene("A"), &repo).unwrap();
        repo.fail_commits(true);

        assert!(matches!(
            add_scene(&ann(), scene("B"), &repo),
            Err(ServiceError::Io(_))
        ));
        assert_eq!(titles(&get_story(&ann(), &repo).unwrap()), ["A"]);
    }
}
