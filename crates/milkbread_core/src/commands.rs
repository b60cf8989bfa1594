//! The six slash commands, expressed over a platform-neutral [`Reply`] so
//! handler behavior is testable without a gateway connection.

use crate::roster;
use crate::store::{ALL_SCHOOLS, Attribute, Store, parse_hex_color};

/// A fully parsed invocation. Option decoding happens at the platform
/// boundary; by the time a value reaches [`dispatch`] it is typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    MilkBread,
    ThreeHairs,
    AttributeLookup {
        attribute: Attribute,
    },
    CoachLookup {
        name: String,
    },
    CharacterLookup {
        school: String,
        name: String,
        style: String,
    },
    Roster {
        school: String,
    },
}

/// What a handler wants sent back, before any platform types get involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// A text message with one bundled attachment from the assets directory
    Image { content: String, file_name: String },
    Embed(EmbedReply),
    /// Ordered message chunks: the first answers the interaction, the rest
    /// go out as follow-ups
    Paged(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReply {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// Route one invocation to its handler.
pub fn dispatch(store: &Store, invocation: &Invocation) -> Reply {
    match invocation {
        Invocation::MilkBread => milk_bread(),
        Invocation::ThreeHairs => three_hairs(),
        Invocation::AttributeLookup { attribute } => attribute_lookup(store, *attribute),
        Invocation::CoachLookup { name } => coach_lookup(store, name),
        Invocation::CharacterLookup {
            school,
            name,
            style,
        } => character_lookup(store, school, name, style),
        Invocation::Roster { school } => roster_lookup(store, school),
    }
}

fn milk_bread() -> Reply {
    Reply::Image {
        content: "🥛🍞 小岩你要不要！".to_string(),
        file_name: "milkbread.png".to_string(),
    }
}

fn three_hairs() -> Reply {
    Reply::Image {
        content: "😤 傳說中的三根毛！".to_string(),
        file_name: "sangenmao.png".to_string(),
    }
}

fn attribute_lookup(store: &Store, attribute: Attribute) -> Reply {
    let label = attribute.label();
    match store.coaches_by_attribute(attribute) {
        Some(coaches) if !coaches.is_empty() => Reply::Text(format!(
            "🔍 **{label}** 屬性的教練：\n\n{}",
            coaches.join("\n")
        )),
        _ => Reply::Text(attribute_not_found(label)),
    }
}

fn coach_lookup(store: &Store, name: &str) -> Reply {
    let Some(coach) = store.coach(name) else {
        return Reply::Text(format!("❌ 找不到教練「{name}」的資料。"));
    };

    Reply::Embed(EmbedReply {
        title: format!("{name} - {}", coach.school),
        description: format!(
            "{}，{}教練。主屬性 {}，副屬性 {}。",
            coach.full_name, coach.school, coach.primary, coach.secondary
        ),
        color: parse_hex_color(coach.color.as_deref()),
    })
}

fn character_lookup(store: &Store, school: &str, name: &str, style: &str) -> Reply {
    // School first, then membership, so the error names the layer that failed
    let Some(members) = store.character_names_by_school(school) else {
        return Reply::Text(school_not_found(school));
    };
    if !members.iter().any(|member| member == name) {
        return Reply::Text(format!("❌ 「{school}」裡沒有「{name}」這個角色。"));
    }

    let (style_name, record) = store.resolve_style(name, style);

    let mut blocks = vec![
        format!("稱號：{}\n發售日期：{}", record.title, record.released),
        record.description.clone(),
    ];
    if let Some(note) = record.note.as_deref().filter(|note| !note.is_empty()) {
        blocks.push(note.to_string());
    }
    if let Some(skills) = store.skills(name, &style_name) {
        let lines = skills.render_lines();
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    Reply::Embed(EmbedReply {
        title: format!("{name} - {style_name}"),
        description: blocks.join("\n\n"),
        color: parse_hex_color(record.color.as_deref()),
    })
}

fn roster_lookup(store: &Store, school: &str) -> Reply {
    let scope = (school != ALL_SCHOOLS).then_some(school);
    if scope.is_some() && store.character_names_by_school(school).is_none() {
        return Reply::Text(school_not_found(school));
    }

    let mut rows = roster::collect_rows(store, scope);
    if rows.is_empty() {
        return Reply::Text(format!("❌ 「{school}」目前沒有造型資料。"));
    }
    roster::sort_rows(&mut rows);
    Reply::Paged(roster::render(school, &rows))
}

/// Also the answer when option decoding sees an attribute outside the choice
/// set, so the wording lives in one place.
pub fn attribute_not_found(label: &str) -> String {
    format!("❌ 沒有找到屬性「{label}」對應的教練。")
}

fn school_not_found(school: &str) -> String {
    format!("❌ 沒有「{school}」這間學校的資料。")
}
