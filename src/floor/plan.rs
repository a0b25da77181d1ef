//! Floor plans
//!
//! The house floor has 41 numbered tables. How they are split into sections
//! depends on how many servers are working: each section count from 2 to 9
//! has a fixed layout. Any other count puts every table in one section.

use serde::{Deserialize, Serialize};

use super::error::FloorResult;
use super::table::{Table, TableRegistry};

/// Smallest section count with a dedicated layout
pub const MIN_SECTIONS: usize = 2;

/// Largest section count with a dedicated layout
pub const MAX_SECTIONS: usize = 9;

const TWO: &[&[u32]] = &[
    &[31, 32, 33, 34, 35, 36, 37, 41, 42, 43],
    &[
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 51, 52, 53, 54,
        55, 61, 62, 63, 64, 65,
    ],
];

const THREE: &[&[u32]] = &[
    &[31, 32, 33, 34, 35, 36, 37, 41, 42, 43],
    &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30],
    &[51, 52, 53, 54, 55, 61, 62, 63, 64, 65],
];

const FOUR: &[&[u32]] = &[
    &[31, 32, 33, 34, 35, 36, 37, 41, 42, 43],
    &[1, 2, 3, 4, 5, 6, 21, 22, 23, 24, 25],
    &[51, 52, 53, 54, 55, 61, 62, 63, 64, 65],
    &[7, 8, 9, 10, 11, 26, 27, 28, 29, 30],
];

const FIVE: &[&[u32]] = &[
    &[31, 32, 33, 34, 35, 36, 37, 41, 42, 43],
    &[4, 5, 6, 7, 8, 25, 26],
    &[51, 52, 53, 54, 55, 61, 62, 63, 64, 65],
    &[9, 10, 11, 27, 28, 29, 30],
    &[1, 2, 3, 21, 22, 23, 24],
];

const SIX: &[&[u32]] = &[
    &[31, 32, 33, 34, 35],
    &[4, 5, 6, 7, 8, 25, 26],
    &[51, 52, 53, 54, 55, 61, 62, 63, 64, 65],
    &[9, 10, 11, 27, 28, 29, 30],
    &[1, 2, 3, 21, 22, 23, 24],
    &[36, 37, 41, 42, 43],
];

const SEVEN: &[&[u32]] = &[
    &[31, 32, 33, 34, 35],
    &[4, 5, 6, 7, 8, 25, 26],
    &[54, 55, 63, 64, 65],
    &[9, 10, 11, 27, 28, 29, 30],
    &[1, 2, 3, 21, 22, 23, 24],
    &[36, 37, 41, 42, 43],
    &[51, 52, 53, 61, 62],
];

const EIGHT: &[&[u32]] = &[
    &[31, 32, 33, 34, 35],
    &[4, 5, 6, 7, 24, 25],
    &[54, 55, 63, 64, 65],
    &[10, 11, 28, 29, 30],
    &[1, 2, 3, 21, 22, 23],
    &[36, 37, 41, 42, 43],
    &[51, 52, 53, 61, 62],
    &[8, 9, 26, 27],
];

const NINE: &[&[u32]] = &[
    &[31, 32, 33, 34, 35],
    &[4, 5, 6, 7, 26],
    &[54, 55, 64, 65],
    &[10, 11, 29, 30],
    &[1, 2, 21, 22],
    &[36, 37, 41, 42, 43],
    &[51, 52, 53, 61, 62, 63],
    &[8, 9, 27, 28],
    &[3, 23, 24, 25],
];

/// Table numbers per section for a section count
pub fn layout(sections: usize) -> Vec<Vec<u32>> {
    let plan: &[&[u32]] = match sections {
        2 => TWO,
        3 => THREE,
        4 => FOUR,
        5 => FIVE,
        6 => SIX,
        7 => SEVEN,
        8 => EIGHT,
        9 => NINE,
        _ => return vec![THREE.iter().flat_map(|s| s.iter().copied()).collect()],
    };

    plan.iter().map(|s| s.to_vec()).collect()
}

/// One table in an explicit floor description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub section: u32,
    #[serde(default)]
    pub seats: Option<u32>,
}

/// How the floor's tables are produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorPlan {
    /// House layout split into the given number of sections
    Sections { count: usize, seats: u32 },

    /// Tables listed one by one
    Explicit { tables: Vec<TableSpec>, default_seats: u32 },
}

impl FloorPlan {
    /// Produce the tables, numbering sections from 1
    pub fn tables(&self) -> Vec<Table> {
        match self {
            Self::Sections { count, seats } => layout(*count)
                .into_iter()
                .enumerate()
                .flat_map(|(idx, ids)| {
                    let section = idx as u32 + 1;
                    ids.into_iter().map(move |id| Table::new(id, section, *seats))
                })
                .collect(),
            Self::Explicit {
                tables,
                default_seats,
            } => tables
                .iter()
                .map(|spec| {
                    let table = Table::new(spec.id, spec.section, spec.seats.unwrap_or(*default_seats));
                    match &spec.name {
                        Some(name) => table.with_name(name.clone()),
                        None => table,
                    }
                })
                .collect(),
        }
    }

    /// Build the table registry for this plan
    pub fn build(&self) -> FloorResult<TableRegistry> {
        TableRegistry::new(self.tables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_layout_covers_the_house() {
        let house: HashSet<u32> = layout(3).into_iter().flatten().collect();
        assert_eq!(house.len(), 41);

        for sections in MIN_SECTIONS..=MAX_SECTIONS {
            let plan = layout(sections);
            assert_eq!(plan.len(), sections);

            let ids: Vec<u32> = plan.into_iter().flatten().collect();
            let unique: HashSet<u32> = ids.iter().copied().collect();
            assert_eq!(ids.len(), unique.len(), "duplicate table in {sections}-section plan");
            assert_eq!(unique, house, "{sections}-section plan misses tables");
        }
    }

    #[test]
    fn test_fallback_is_single_section() {
        for sections in [0, 1, 10] {
            let plan = layout(sections);
            assert_eq!(plan.len(), 1);
            assert_eq!(plan[0].len(), 41);
        }
    }

    #[test]
    fn test_section_plan_numbers_sections() {
        let tables = FloorPlan::Sections { count: 3, seats: 4 }.tables();
        assert_eq!(tables[0].id, 31);
        assert_eq!(tables[0].section, 1);
        assert_eq!(tables.last().unwrap().section, 3);
        assert!(tables.iter().all(|t| t.seats == 4));
    }

    #[test]
    fn test_explicit_plan() {
        let plan = FloorPlan::Explicit {
            tables: vec![
                TableSpec {
                    id: 1,
                    name: Some("Patio 1".into()),
                    section: 1,
                    seats: Some(2),
                },
                TableSpec {
                    id: 2,
                    name: None,
                    section: 1,
                    seats: None,
                },
            ],
            default_seats: 6,
        };

        let registry = plan.build().unwrap();
        assert_eq!(registry.get(1).unwrap().name, "Patio 1");
        assert_eq!(registry.get(2).unwrap().name, "Table 2");
        assert_eq!(registry.get(2).unwrap().seats, 6);
    }
}
