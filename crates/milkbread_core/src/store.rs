//! Reference data loaded once at startup.
//!
//! All tables are read-only after `Store::load`; the only runtime mutation
//! is the synthesized-style overlay, which is append-only.

use crate::error::{CoreError, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Fallback embed color, shared by coaches and styles
pub const DEFAULT_COLOR_HEX: &str = "#3498db";
pub const DEFAULT_COLOR: u32 = 0x3498db;

/// Placeholder for unreleased/unknown style metadata
pub const PLACEHOLDER: &str = "未知";

/// Style name used when a character has no authored styles
pub const DEFAULT_STYLE: &str = "普通";

/// Sentinel school name meaning "every school"
pub const ALL_SCHOOLS: &str = "全部";

/// The eight coach attributes; option choices and the attribute index key
/// are both drawn from this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "智力")]
    Intelligence,
    #[serde(rename = "扣球")]
    Spike,
    #[serde(rename = "彈跳")]
    Jump,
    #[serde(rename = "心理")]
    Mental,
    #[serde(rename = "速度")]
    Speed,
    #[serde(rename = "拋球")]
    Toss,
    #[serde(rename = "接球")]
    Receive,
    #[serde(rename = "攔網")]
    Block,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Intelligence,
        Attribute::Spike,
        Attribute::Jump,
        Attribute::Mental,
        Attribute::Speed,
        Attribute::Toss,
        Attribute::Receive,
        Attribute::Block,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Intelligence => "智力",
            Attribute::Spike => "扣球",
            Attribute::Jump => "彈跳",
            Attribute::Mental => "心理",
            Attribute::Speed => "速度",
            Attribute::Toss => "拋球",
            Attribute::Receive => "接球",
            Attribute::Block => "攔網",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.label() == label)
    }
}

/// One coach card
#[derive(Debug, Clone, Deserialize)]
pub struct Coach {
    pub school: String,
    pub full_name: String,
    pub primary: String,
    pub secondary: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Authored metadata for one character style
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleRecord {
    /// Either a `YYYY.MM` token or a placeholder such as 未知/FREE
    pub released: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// One playable character; `styles` keeps authored data order
#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub school: String,
    pub styles: IndexMap<String, StyleRecord>,
}

/// Sparse per-style skill sheet. Absent fields are never rendered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SkillRecord {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "trait")]
    pub talent: Option<String>,
    #[serde(default)]
    pub other: Option<String>,
    #[serde(default)]
    pub special1: Option<String>,
    #[serde(default)]
    pub special2: Option<String>,
    #[serde(default)]
    pub special3: Option<String>,
    #[serde(default)]
    pub special4: Option<String>,
    /// The source tables spell this key three ways
    #[serde(default, alias = "Buff", alias = "BUFF")]
    pub buff: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl SkillRecord {
    /// Labelled lines for the embed body, fixed field order, empty and
    /// absent fields skipped.
    pub fn render_lines(&self) -> Vec<String> {
        let fields: [(&str, &Option<String>); 11] = [
            ("發動時間", &self.time),
            ("技能稱號", &self.title),
            ("特質", &self.talent),
            ("其他技能", &self.other),
            ("必殺技1", &self.special1),
            ("必殺技2", &self.special2),
            ("必殺技3", &self.special3),
            ("必殺技4", &self.special4),
            ("BUFF加成", &self.buff),
            ("替換技能", &self.alias),
            ("備註", &self.note),
        ];

        fields
            .iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{label}：{v}"))
            })
            .collect()
    }
}

/// In-memory reference data plus the synthesized-style overlay
#[derive(Debug)]
pub struct Store {
    coaches: IndexMap<String, Coach>,
    attributes: IndexMap<Attribute, Vec<String>>,
    schools: IndexMap<String, Vec<String>>,
    characters: IndexMap<String, Character>,
    skills: HashMap<String, HashMap<String, SkillRecord>>,
    synthesized: RwLock<HashMap<(String, String), StyleRecord>>,
}

impl Store {
    /// Load all reference tables from `dir`. Required files are fatal when
    /// missing or malformed; a missing skill table degrades to empty.
    pub fn load(dir: &Path) -> Result<Self> {
        let coaches: IndexMap<String, Coach> = read_required(&dir.join("coaches.json"))?;
        let attributes = read_required(&dir.join("attributes.json"))?;
        let schools: IndexMap<String, Vec<String>> = read_required(&dir.join("schools.json"))?;
        let characters: IndexMap<String, Character> =
            read_required(&dir.join("characters.json"))?;
        let skills = read_skills(&dir.join("skills.json"))?;

        info!(
            "Loaded reference data: {} coaches, {} schools, {} characters",
            coaches.len(),
            schools.len(),
            characters.len()
        );

        Ok(Self {
            coaches,
            attributes,
            schools,
            characters,
            skills,
            synthesized: RwLock::new(HashMap::new()),
        })
    }

    pub fn coach(&self, name: &str) -> Option<&Coach> {
        self.coaches.get(name)
    }

    pub fn coach_names(&self) -> impl Iterator<Item = &str> {
        self.coaches.keys().map(String::as_str)
    }

    pub fn coaches_by_attribute(&self, attribute: Attribute) -> Option<&[String]> {
        self.attributes.get(&attribute).map(Vec::as_slice)
    }

    pub fn school_names(&self) -> impl Iterator<Item = &str> {
        self.schools.keys().map(String::as_str)
    }

    pub fn character_names_by_school(&self, school: &str) -> Option<&[String]> {
        self.schools.get(school).map(Vec::as_slice)
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn skills(&self, name: &str, style: &str) -> Option<&SkillRecord> {
        self.skills.get(name)?.get(style)
    }

    /// Resolve the authored record for `(name, style)`, or degrade to the
    /// generic 普通 record. Synthesized records land in the overlay; the
    /// original tables are never touched.
    pub fn resolve_style(&self, name: &str, style: &str) -> (String, StyleRecord) {
        if let Some(character) = self.characters.get(name) {
            if let Some(record) = character.styles.get(style) {
                return (style.to_string(), record.clone());
            }
        }

        let key = (name.to_string(), DEFAULT_STYLE.to_string());
        if let Some(cached) = self.synthesized.read().get(&key) {
            return (DEFAULT_STYLE.to_string(), cached.clone());
        }

        let record = StyleRecord {
            released: PLACEHOLDER.to_string(),
            title: PLACEHOLDER.to_string(),
            description: format!("尚未收錄{name}的造型資料。"),
            note: None,
            color: None,
        };
        self.synthesized.write().insert(key, record.clone());
        (DEFAULT_STYLE.to_string(), record)
    }
}

/// Parse a `#RRGGBB` string, falling back to the default accent color
pub fn parse_hex_color(color: Option<&str>) -> u32 {
    color
        .and_then(|c| {
            let hex = c.strip_prefix('#').unwrap_or(c);
            if hex.len() == 6 {
                u32::from_str_radix(hex, 16).ok()
            } else {
                None
            }
        })
        .unwrap_or(DEFAULT_COLOR)
}

fn read_required<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| CoreError::DataFileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| CoreError::DataFileParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_skills(path: &Path) -> Result<HashMap<String, HashMap<String, SkillRecord>>> {
    if !path.exists() {
        warn!(
            "Skill table {} not found, continuing with an empty one",
            path.display()
        );
        return Ok(HashMap::new());
    }
    read_required(path)
}
