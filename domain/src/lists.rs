//! Parsing and validation of the audio and tag lists uploaded with a project.
//!
//! An audio list holds one audio path per line. A tag list holds one `tagset,tag` pair per
//! line. Blank lines are skipped in both; validation stops at the first offending line and
//! reports its 1-based number and content.

use crate::error::Error;
use entity_api::project::ProjectLists;

/// Audio file extensions accepted in an audio list, compared case-insensitively.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3"];

pub fn parse_audio_list(content: &str) -> Result<Vec<String>, Error> {
    let mut paths = Vec::new();

    for (number, line) in numbered_lines(content) {
        let has_audio_extension = line
            .rsplit_once('.')
            .map(|(stem, extension)| {
                !stem.is_empty()
                    && AUDIO_EXTENSIONS
                        .iter()
                        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false);

        if !has_audio_extension {
            return Err(Error::validation(vec![format!(
                "Audio list line {number}: \"{line}\" is not a {} file.",
                AUDIO_EXTENSIONS.join(" or ")
            )]));
        }
        paths.push(line.to_owned());
    }

    if paths.is_empty() {
        return Err(Error::validation(vec![
            "Audio list file is empty.".to_string()
        ]));
    }

    Ok(paths)
}

pub fn parse_tag_list(content: &str) -> Result<Vec<(String, String)>, Error> {
    let mut pairs = Vec::new();

    for (number, line) in numbered_lines(content) {
        let pair = line.split_once(',').and_then(|(tagset, tag)| {
            let (tagset, tag) = (tagset.trim(), tag.trim());
            (!tagset.is_empty() && !tag.is_empty() && !tag.contains(','))
                .then(|| (tagset.to_owned(), tag.to_owned()))
        });

        match pair {
            Some(pair) => pairs.push(pair),
            None => {
                return Err(Error::validation(vec![format!(
                    "Tag list line {number}: \"{line}\" must be \"tagset_name,tag_name\"."
                )]))
            }
        }
    }

    if pairs.is_empty() {
        return Err(Error::validation(vec!["Tag list file is empty.".to_string()]));
    }

    Ok(pairs)
}

/// Validates both lists, collecting the error of each one that fails.
pub fn parse_project_lists(audio_list: &str, tag_list: &str) -> Result<ProjectLists, Error> {
    match (parse_audio_list(audio_list), parse_tag_list(tag_list)) {
        (Ok(audio_paths), Ok(tags)) => Ok(ProjectLists { audio_paths, tags }),
        (audio_result, tag_result) => {
            let messages = [audio_result.err(), tag_result.err()]
                .into_iter()
                .flatten()
                .flat_map(validation_messages)
                .collect();
            Err(Error::validation(messages))
        }
    }
}

fn validation_messages(err: Error) -> Vec<String> {
    use crate::error::{DomainErrorKind, InternalErrorKind};
    match err.error_kind {
        DomainErrorKind::Internal(InternalErrorKind::Validation(messages)) => messages,
        other => vec![format!("{other:?}")],
    }
}

/// Trimmed, non-blank lines with their 1-based line numbers in the original file.
fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};

    fn messages(err: Error) -> Vec<String> {
        match err.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation(messages)) => messages,
            other => panic!("unexpected error kind {other:?}"),
        }
    }

    #[test]
    fn audio_list_accepts_wav_and_mp3_in_any_case_and_skips_blank_lines() {
        let paths = parse_audio_list("a/one.wav\n\n  b/two.MP3  \r\nc/three.Wav\n").unwrap();

        assert_eq!(paths, vec!["a/one.wav", "b/two.MP3", "c/three.Wav"]);
    }

    #[test]
    fn audio_list_cites_the_first_line_with_a_wrong_extension() {
        let err = parse_audio_list("a.wav\nb.mp3\n\nnotes.txt\nc.flac\n").unwrap_err();

        let messages = messages(err);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("line 4"));
        assert!(messages[0].contains("notes.txt"));
    }

    #[test]
    fn audio_list_rejects_paths_without_extension() {
        assert!(parse_audio_list("recording\n").is_err());
        assert!(parse_audio_list(".wav\n").is_err());
    }

    #[test]
    fn audio_list_without_paths_is_empty() {
        let err = parse_audio_list("\n   \n").unwrap_err();

        assert_eq!(messages(err), vec!["Audio list file is empty."]);
    }

    #[test]
    fn tag_list_trims_both_names() {
        let pairs = parse_tag_list("birds , crow\n\nbirds,owl\n").unwrap();

        assert_eq!(
            pairs,
            vec![
                ("birds".to_owned(), "crow".to_owned()),
                ("birds".to_owned(), "owl".to_owned())
            ]
        );
    }

    #[test]
    fn tag_list_rejects_missing_names_and_extra_fields() {
        for content in ["birds\n", ",crow\n", "birds,\n", "birds,crow,owl\n"] {
            let err = parse_tag_list(content).unwrap_err();
            assert!(messages(err)[0].contains("line 1"), "{content:?}");
        }
    }

    #[test]
    fn tag_list_without_pairs_is_empty() {
        let err = parse_tag_list("").unwrap_err();

        assert_eq!(messages(err), vec!["Tag list file is empty."]);
    }

    #[test]
    fn project_lists_report_both_failures() {
        let err = parse_project_lists("x.txt\n", "").unwrap_err();

        assert_eq!(messages(err).len(), 2);
    }
}
