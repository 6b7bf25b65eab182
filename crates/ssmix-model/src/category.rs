use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JsonizeError;

/// SS-MIX2 data category of a message.
///
/// The category selects both the grouping grammar used to assemble the output
/// document and the usage table consulted when filtering unused fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// Patient demographics update.
    Adt00,
    /// Patient demographics registration.
    Adt01,
    /// Outpatient visit.
    Adt12,
    /// Admission planned.
    Adt21,
    /// Admission.
    Adt22,
    /// Transfer planned.
    Adt31,
    /// Transfer.
    Adt32,
    /// Discharge planned.
    Adt41,
    /// Discharge.
    Adt42,
    /// Attending physician change.
    Adt51,
    /// Attending nurse change.
    Adt52,
    /// Allergy information.
    Adt61,
    /// Problem (diagnosis) list.
    Ppr01,
    /// Diet order.
    Omd,
    /// Prescription order.
    Omp01,
    /// Prescription administration.
    Omp11,
    /// Injection order.
    Omp02,
    /// Injection administration.
    Omp12,
    /// Specimen test order.
    Oml01,
    /// Specimen test result.
    Oml11,
    /// Radiology order.
    Omg01,
    /// Radiology result.
    Omg11,
    /// Endoscopy order.
    Omg02,
    /// Endoscopy result.
    Omg12,
    /// Physiological test order.
    Omg03,
    /// Physiological test result.
    Omg13,
}

impl Category {
    pub const ALL: [Category; 26] = [
        Category::Adt00,
        Category::Adt01,
        Category::Adt12,
        Category::Adt21,
        Category::Adt22,
        Category::Adt31,
        Category::Adt32,
        Category::Adt41,
        Category::Adt42,
        Category::Adt51,
        Category::Adt52,
        Category::Adt61,
        Category::Ppr01,
        Category::Omd,
        Category::Omp01,
        Category::Omp11,
        Category::Omp02,
        Category::Omp12,
        Category::Oml01,
        Category::Oml11,
        Category::Omg01,
        Category::Omg11,
        Category::Omg02,
        Category::Omg12,
        Category::Omg03,
        Category::Omg13,
    ];

    /// Returns the identifier as it appears in SS-MIX2 storage file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Adt00 => "ADT-00",
            Category::Adt01 => "ADT-01",
            Category::Adt12 => "ADT-12",
            Category::Adt21 => "ADT-21",
            Category::Adt22 => "ADT-22",
            Category::Adt31 => "ADT-31",
            Category::Adt32 => "ADT-32",
            Category::Adt41 => "ADT-41",
            Category::Adt42 => "ADT-42",
            Category::Adt51 => "ADT-51",
            Category::Adt52 => "ADT-52",
            Category::Adt61 => "ADT-61",
            Category::Ppr01 => "PPR-01",
            Category::Omd => "OMD",
            Category::Omp01 => "OMP-01",
            Category::Omp11 => "OMP-11",
            Category::Omp02 => "OMP-02",
            Category::Omp12 => "OMP-12",
            Category::Oml01 => "OML-01",
            Category::Oml11 => "OML-11",
            Category::Omg01 => "OMG-01",
            Category::Omg11 => "OMG-11",
            Category::Omg02 => "OMG-02",
            Category::Omg12 => "OMG-12",
            Category::Omg03 => "OMG-03",
            Category::Omg13 => "OMG-13",
        }
    }

    /// Returns true for the visit-event categories that share one grammar.
    pub fn is_visit_event(&self) -> bool {
        matches!(
            self,
            Category::Adt00
                | Category::Adt01
                | Category::Adt12
                | Category::Adt21
                | Category::Adt22
                | Category::Adt31
                | Category::Adt32
                | Category::Adt41
                | Category::Adt42
                | Category::Adt51
                | Category::Adt52
        )
    }

    /// Key of this category in the per-category usage table.
    ///
    /// All visit-event categories share the `ADT` usage table.
    pub fn usage_key(&self) -> &'static str {
        if self.is_visit_event() {
            "ADT"
        } else {
            self.as_str()
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = JsonizeError;

    /// Parse a category identifier. Accepts upper or lower case and `_` in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', "-");
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| JsonizeError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = JsonizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}
