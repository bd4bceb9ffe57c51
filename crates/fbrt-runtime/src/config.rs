//! Runtime configuration loading.

#![allow(missing_docs)]

use std::path::Path;
use std::str::FromStr;

use fbrt_types::{is_valid_identifier, is_valid_type_name, StructField};
use serde::Deserialize;
use smol_str::SmolStr;
use tracing::Level;

use crate::error::RuntimeError;
use crate::typelib::TypeLibrary;
use crate::value::{array_len, MAX_ARRAY_ELEMENTS};

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub resource_name: SmolStr,
    pub log_level: Level,
    pub structs: Vec<StructTypeConfig>,
    pub arrays: Vec<ArrayTypeConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructTypeConfig {
    pub name: SmolStr,
    pub members: Vec<MemberConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberConfig {
    pub name: SmolStr,
    pub type_name: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayTypeConfig {
    pub name: SmolStr,
    pub element: SmolStr,
    pub lower: i64,
    pub upper: i64,
}

impl RuntimeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            RuntimeError::InvalidConfig(format!("{}: {err}", path.display()).into())
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RuntimeError> {
        let raw: RuntimeToml = toml::from_str(text)
            .map_err(|err| RuntimeError::InvalidConfig(format!("runtime config: {err}").into()))?;
        raw.into_config()
    }

    /// Registers the configured data types. Definitions may refer to each
    /// other in any order.
    pub fn register_types(&self, library: &TypeLibrary) -> Result<(), RuntimeError> {
        let mut pending_structs: Vec<&StructTypeConfig> = self.structs.iter().collect();
        let mut pending_arrays: Vec<&ArrayTypeConfig> = self.arrays.iter().collect();
        loop {
            let before = pending_structs.len() + pending_arrays.len();
            pending_arrays.retain(|array| match library.resolve_type(&array.element) {
                Some(element) => {
                    library.register_array(&array.name, element, array.lower, array.upper);
                    false
                }
                None => true,
            });
            pending_structs.retain(|def| {
                let fields: Option<Vec<StructField>> = def
                    .members
                    .iter()
                    .map(|member| {
                        library
                            .resolve_type(&member.type_name)
                            .map(|ty| StructField::new(member.name.clone(), ty))
                    })
                    .collect();
                match fields {
                    Some(fields) => {
                        library.register_struct(&def.name, fields);
                        false
                    }
                    None => true,
                }
            });
            let after = pending_structs.len() + pending_arrays.len();
            if after == 0 {
                return Ok(());
            }
            if after == before {
                break;
            }
        }
        let missing = pending_arrays
            .iter()
            .map(|array| array.element.clone())
            .chain(pending_structs.iter().flat_map(|def| {
                def.members
                    .iter()
                    .filter(|member| library.resolve_type(&member.type_name).is_none())
                    .map(|member| member.type_name.clone())
            }))
            .next()
            .unwrap_or_default();
        Err(RuntimeError::UnknownType(missing))
    }
}

#[derive(Debug, Deserialize)]
struct RuntimeToml {
    resource: ResourceSection,
    log: Option<LogSection>,
    #[serde(default)]
    types: TypesSection,
}

#[derive(Debug, Deserialize)]
struct ResourceSection {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LogSection {
    level: String,
}

#[derive(Debug, Default, Deserialize)]
struct TypesSection {
    #[serde(default, rename = "struct")]
    structs: Vec<StructSection>,
    #[serde(default, rename = "array")]
    arrays: Vec<ArraySection>,
}

#[derive(Debug, Deserialize)]
struct StructSection {
    name: String,
    members: Vec<MemberSection>,
}

#[derive(Debug, Deserialize)]
struct MemberSection {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct ArraySection {
    name: String,
    element: String,
    lower: i64,
    upper: i64,
}

impl RuntimeToml {
    fn into_config(self) -> Result<RuntimeConfig, RuntimeError> {
        if !is_valid_identifier(&self.resource.name) {
            return Err(RuntimeError::InvalidConfig(
                format!("invalid resource.name '{}'", self.resource.name).into(),
            ));
        }
        let log_level = parse_log_level(self.log.as_ref().map_or("info", |log| log.level.as_str()))?;

        let mut structs = Vec::with_capacity(self.types.structs.len());
        for def in self.types.structs {
            check_type_name(&def.name)?;
            if def.members.is_empty() {
                return Err(RuntimeError::InvalidConfig(
                    format!("struct '{}' has no members", def.name).into(),
                ));
            }
            let mut members: Vec<MemberConfig> = Vec::with_capacity(def.members.len());
            for member in def.members {
                if !is_valid_identifier(&member.name) {
                    return Err(RuntimeError::InvalidConfig(
                        format!("invalid member name '{}' in '{}'", member.name, def.name).into(),
                    ));
                }
                if members.iter().any(|existing| existing.name == member.name) {
                    return Err(RuntimeError::InvalidConfig(
                        format!("duplicate member '{}' in '{}'", member.name, def.name).into(),
                    ));
                }
                members.push(MemberConfig {
                    name: SmolStr::new(member.name),
                    type_name: SmolStr::new(member.type_name),
                });
            }
            structs.push(StructTypeConfig {
                name: SmolStr::new(def.name),
                members,
            });
        }

        let mut arrays = Vec::with_capacity(self.types.arrays.len());
        for def in self.types.arrays {
            check_type_name(&def.name)?;
            if array_len(def.lower, def.upper).is_none() {
                return Err(RuntimeError::InvalidConfig(
                    format!(
                        "array '{}' has bounds {}..{} (at most {MAX_ARRAY_ELEMENTS} elements)",
                        def.name, def.lower, def.upper
                    )
                    .into(),
                ));
            }
            arrays.push(ArrayTypeConfig {
                name: SmolStr::new(def.name),
                element: SmolStr::new(def.element),
                lower: def.lower,
                upper: def.upper,
            });
        }

        Ok(RuntimeConfig {
            resource_name: SmolStr::new(self.resource.name),
            log_level,
            structs,
            arrays,
        })
    }
}

fn check_type_name(name: &str) -> Result<(), RuntimeError> {
    if is_valid_type_name(name) {
        Ok(())
    } else {
        Err(RuntimeError::InvalidConfig(
            format!("invalid type name '{name}'").into(),
        ))
    }
}

fn parse_log_level(text: &str) -> Result<Level, RuntimeError> {
    Level::from_str(text.trim())
        .map_err(|_| RuntimeError::InvalidConfig(format!("invalid log.level '{text}'").into()))
}
