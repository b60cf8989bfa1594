//! Suggestion candidates for autocompleted command options.

use crate::store::{ALL_SCHOOLS, DEFAULT_STYLE, Store};

/// Platform limit on autocomplete choices per response
pub const MAX_SUGGESTIONS: usize = 25;

/// Which option is being typed, with the already-chosen values it depends
/// on. Options the user has not filled in yet arrive as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionScope {
    /// 查教練.名稱
    CoachName,
    /// 角色.學校
    School,
    /// 角色.名稱, scoped to the chosen school
    CharacterName { school: Option<String> },
    /// 角色.造型, scoped to the chosen character
    StyleName { character: Option<String> },
    /// 一覽.學校, schools plus the 全部 sentinel
    RosterSchool,
}

/// Candidates for `scope` matching `input`, in store order, capped at 25.
/// Matching is case-insensitive substring; an empty input matches all.
pub fn suggest(store: &Store, scope: &SuggestionScope, input: &str) -> Vec<String> {
    let candidates: Vec<String> = match scope {
        SuggestionScope::CoachName => store.coach_names().map(str::to_string).collect(),
        SuggestionScope::School => store.school_names().map(str::to_string).collect(),
        SuggestionScope::CharacterName { school } => match school {
            Some(school) => store
                .character_names_by_school(school)
                .map(|names| names.to_vec())
                .unwrap_or_default(),
            None => Vec::new(),
        },
        SuggestionScope::StyleName { character } => match character {
            Some(character) => match store.character(character) {
                Some(c) if !c.styles.is_empty() => {
                    c.styles.keys().map(String::clone).collect()
                }
                _ => vec![DEFAULT_STYLE.to_string()],
            },
            None => Vec::new(),
        },
        SuggestionScope::RosterSchool => std::iter::once(ALL_SCHOOLS.to_string())
            .chain(store.school_names().map(str::to_string))
            .collect(),
    };

    let needle = input.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}
