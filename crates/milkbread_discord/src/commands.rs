//! Slash-command definitions and option decoding.
//!
//! Option values arrive as loosely typed strings; everything here turns
//! them into a typed [`Invocation`] or a [`SuggestionScope`] before any
//! handler runs.

use milkbread_core::{Attribute, Invocation, SuggestionScope};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use thiserror::Error;

const MILK_BREAD: &str = "牛奶麵包";
const THREE_HAIRS: &str = "三根毛";
const ATTRIBUTE_LOOKUP: &str = "查詢";
const COACH_LOOKUP: &str = "查教練";
const CHARACTER_LOOKUP: &str = "角色";
const ROSTER: &str = "一覽";

const OPT_ATTRIBUTE: &str = "屬性";
const OPT_SCHOOL: &str = "學校";
const OPT_NAME: &str = "名稱";
const OPT_STYLE: &str = "造型";

/// Create all slash commands for registration
pub fn create_commands() -> Vec<CreateCommand> {
    let mut attribute_option =
        CreateCommandOption::new(CommandOptionType::String, OPT_ATTRIBUTE, "選擇屬性")
            .required(true);
    for attribute in Attribute::ALL {
        attribute_option = attribute_option.add_string_choice(attribute.label(), attribute.label());
    }

    vec![
        CreateCommand::new(MILK_BREAD).description("超好吃的岩泉牛奶麵包圖片"),
        CreateCommand::new(THREE_HAIRS).description("傳說中的三根毛"),
        CreateCommand::new(ATTRIBUTE_LOOKUP)
            .description("依屬性查詢教練")
            .add_option(attribute_option),
        CreateCommand::new(COACH_LOOKUP)
            .description("查詢教練的詳細資料")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_NAME, "教練名字")
                    .required(true)
                    .set_autocomplete(true),
            ),
        CreateCommand::new(CHARACTER_LOOKUP)
            .description("查詢角色造型資料")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_SCHOOL, "學校名稱")
                    .required(true)
                    .set_autocomplete(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_NAME, "角色名字")
                    .required(true)
                    .set_autocomplete(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_STYLE, "造型名稱")
                    .required(true)
                    .set_autocomplete(true),
            ),
        CreateCommand::new(ROSTER)
            .description("列出角色造型一覽")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, OPT_SCHOOL, "選擇學校或全部")
                    .required(true)
                    .set_autocomplete(true),
            ),
    ]
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },
    #[error("command '{command}' is missing option '{option}'")]
    MissingOption {
        command: &'static str,
        option: &'static str,
    },
    #[error("'{input}' is not one of the attribute choices")]
    UnknownAttribute { input: String },
}

/// Decode a command interaction into a typed invocation.
pub fn parse_invocation(command: &CommandInteraction) -> Result<Invocation, ParseError> {
    let data = &command.data;
    let option = |name: &str| {
        data.options
            .iter()
            .find(|opt| opt.name == name)
            .and_then(|opt| opt.value.as_str())
    };
    let required = |command_name: &'static str, option_name: &'static str| {
        option(option_name)
            .map(str::to_string)
            .ok_or(ParseError::MissingOption {
                command: command_name,
                option: option_name,
            })
    };

    match data.name.as_str() {
        MILK_BREAD => Ok(Invocation::MilkBread),
        THREE_HAIRS => Ok(Invocation::ThreeHairs),
        ATTRIBUTE_LOOKUP => {
            let label = required(ATTRIBUTE_LOOKUP, OPT_ATTRIBUTE)?;
            let attribute =
                Attribute::from_label(&label).ok_or(ParseError::UnknownAttribute { input: label })?;
            Ok(Invocation::AttributeLookup { attribute })
        }
        COACH_LOOKUP => Ok(Invocation::CoachLookup {
            name: required(COACH_LOOKUP, OPT_NAME)?,
        }),
        CHARACTER_LOOKUP => Ok(Invocation::CharacterLookup {
            school: required(CHARACTER_LOOKUP, OPT_SCHOOL)?,
            name: required(CHARACTER_LOOKUP, OPT_NAME)?,
            style: required(CHARACTER_LOOKUP, OPT_STYLE)?,
        }),
        ROSTER => Ok(Invocation::Roster {
            school: required(ROSTER, OPT_SCHOOL)?,
        }),
        name => Err(ParseError::UnknownCommand {
            name: name.to_string(),
        }),
    }
}

/// Map the focused option of an autocomplete round to a suggestion scope.
/// Options the scope depends on are read from the same round when the user
/// has already picked them.
pub fn suggestion_scope(command: &CommandInteraction) -> Option<SuggestionScope> {
    let focused = command.data.autocomplete()?;
    let picked = |name: &str| {
        command
            .data
            .options
            .iter()
            .find(|opt| opt.name == name)
            .and_then(|opt| opt.value.as_str())
            .map(str::to_string)
    };

    match (command.data.name.as_str(), focused.name) {
        (COACH_LOOKUP, OPT_NAME) => Some(SuggestionScope::CoachName),
        (CHARACTER_LOOKUP, OPT_SCHOOL) => Some(SuggestionScope::School),
        (CHARACTER_LOOKUP, OPT_NAME) => Some(SuggestionScope::CharacterName {
            school: picked(OPT_SCHOOL),
        }),
        (CHARACTER_LOOKUP, OPT_STYLE) => Some(SuggestionScope::StyleName {
            character: picked(OPT_NAME),
        }),
        (ROSTER, OPT_SCHOOL) => Some(SuggestionScope::RosterSchool),
        _ => None,
    }
}
