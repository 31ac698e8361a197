use std::fmt;

use serde::{Deserialize, Serialize};

/// Life stage the generated character should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    Baby,
    Child,
    Teen,
    #[default]
    Adult,
    Elderly,
}

impl AgeCategory {
    /// Picker order, youngest first.
    pub const ALL: [AgeCategory; 5] = [
        AgeCategory::Baby,
        AgeCategory::Child,
        AgeCategory::Teen,
        AgeCategory::Adult,
        AgeCategory::Elderly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeCategory::Baby => "Baby",
            AgeCategory::Child => "Child",
            AgeCategory::Teen => "Teen",
            AgeCategory::Adult => "Adult",
            AgeCategory::Elderly => "Elderly",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
