#![allow(dead_code)]

//! Generation settings — closed enums instead of free strings so invalid
//! values fail at deserialization, not at render time. The serde identifiers
//! are the product's stable wire strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Direto,
    Tecnico,
    Executivo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Length {
    #[default]
    #[serde(rename = "1page")]
    OnePage,
    #[serde(rename = "2pages")]
    TwoPages,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputLanguage {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    #[default]
    Relevancia,
    Ats,
    Impacto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub tone: Tone,
    pub length: Length,
    pub language: OutputLanguage,
    pub focus: Focus,
    pub include_photo: bool,
    pub include_address: bool,
    pub emphasize_leadership: bool,
}
