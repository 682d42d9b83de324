//! Section registry
//!
//! The landing page is an ordered sequence of full-viewport panels. The
//! registry is leaf data: it maps stable section identifiers to their index
//! in the vertical sequence and carries no behaviour of its own.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content panels of the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Hero,
    About,
    Features,
    Interactive,
    Solution,
    Monitoring,
    Services,
    Reasons,
    Contact,
}

impl SectionId {
    /// All sections in landing-page order
    pub fn all_variants() -> &'static [SectionId] {
        &[
            SectionId::Hero,
            SectionId::About,
            SectionId::Features,
            SectionId::Interactive,
            SectionId::Solution,
            SectionId::Monitoring,
            SectionId::Services,
            SectionId::Reasons,
            SectionId::Contact,
        ]
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::About => "about",
            SectionId::Features => "features",
            SectionId::Interactive => "interactive",
            SectionId::Solution => "solution",
            SectionId::Monitoring => "monitoring",
            SectionId::Services => "services",
            SectionId::Reasons => "reasons",
            SectionId::Contact => "contact",
        }
    }

    /// Panels rendered on a white background (About through Services)
    ///
    /// Navigation and indicator styling switch to dark-on-light while one
    /// of these is current.
    pub fn has_light_background(&self) -> bool {
        matches!(
            self,
            SectionId::About
                | SectionId::Features
                | SectionId::Interactive
                | SectionId::Solution
                | SectionId::Monitoring
                | SectionId::Services
        )
    }
}

impl FromStr for SectionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_lowercase();
        SectionId::all_variants()
            .iter()
            .copied()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown section '{}'", s)))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of sections making up the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: Vec<SectionId>,
}

impl SectionRegistry {
    /// The full nine-panel landing page
    pub fn landing() -> Self {
        Self {
            sections: SectionId::all_variants().to_vec(),
        }
    }

    /// Build a registry from an explicit order
    ///
    /// Fails on an empty list or on a section listed twice.
    pub fn new(sections: Vec<SectionId>) -> Result<Self> {
        if sections.is_empty() {
            return Err(Error::InvalidInput(
                "section registry must not be empty".to_string(),
            ));
        }
        for (i, id) in sections.iter().enumerate() {
            if sections[..i].contains(id) {
                return Err(Error::InvalidInput(format!(
                    "section '{}' registered twice",
                    id
                )));
            }
        }
        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.sections.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<SectionId> {
        self.sections.get(index).copied()
    }

    pub fn index_of(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| *s == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.iter().copied()
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::landing()
    }
}
