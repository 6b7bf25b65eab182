//! Grouping grammars of the SS-MIX2 message categories.
//!
//! Each category maps segment tags to a [`Placement`] that says where the
//! decoded segment goes in the document. Placements are evaluated in arrival
//! order against the document built so far; there is no lookahead.

use ssmix_model::Category;

use crate::document::GroupKind;

/// One step from a group into a child group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The last entry of the group array; the path fails if there is none.
    Last(GroupKind),
    /// The last entry of the group array, creating the array with a single
    /// empty entry on first use.
    LastOrNew(GroupKind),
}

/// Route from the document root to a group. The empty path is the root.
pub type Path = &'static [Step];

pub const ROOT: Path = &[];
const ORDER: Path = &[Step::Last(GroupKind::Order)];
const PROBLEM: Path = &[Step::Last(GroupKind::Problem)];
const SPECIMEN: Path = &[Step::Last(GroupKind::Specimen)];
const SPECIMEN_ORDER: Path = &[Step::Last(GroupKind::Specimen), Step::Last(GroupKind::Order)];
const SPECIMEN_ORDER_OR_NEW: Path = &[
    Step::Last(GroupKind::Specimen),
    Step::LastOrNew(GroupKind::Order),
];
const ADMINISTRATION: Path = &[
    Step::Last(GroupKind::Order),
    Step::Last(GroupKind::Administration),
];
const ADMINISTRATION_OR_NEW: Path = &[
    Step::Last(GroupKind::Order),
    Step::LastOrNew(GroupKind::Administration),
];

/// Test evaluated against the document before a conditional placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The path resolves to an existing group.
    Exists(Path),
    /// The path does not resolve.
    Missing(Path),
    /// The group at the path holds a single segment slot `tag`.
    Contains { path: Path, tag: &'static str },
    Any(&'static [Condition]),
}

/// Where a decoded segment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Set the single-segment slot named by the tag in the group at `path`.
    Attach(Path),
    /// Append to the segment array named by the tag in the group at `path`.
    Append(Path),
    /// Start a new entry of group array `kind` in the group at `path`; the
    /// entry holds the segment under its tag.
    Open { path: Path, kind: GroupKind },
    /// Append to the child array of the last `parent` segment of the group at `path`.
    AppendUnder { path: Path, parent: &'static str },
    Branch {
        when: Condition,
        then: &'static Placement,
        otherwise: &'static Placement,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub tags: &'static [&'static str],
    pub placement: Placement,
}

#[derive(Debug)]
pub struct Grammar {
    /// Name used in logs; the visit-event categories share `ADT`.
    pub name: &'static str,
    pub rules: &'static [Rule],
}

impl Grammar {
    pub fn placement(&self, tag: &str) -> Option<&'static Placement> {
        self.rules
            .iter()
            .find(|rule| rule.tags.contains(&tag))
            .map(|rule| &rule.placement)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().flat_map(|rule| rule.tags.iter().copied())
    }

    /// Group arrays this grammar can open, in first-mention order.
    pub fn group_kinds(&self) -> Vec<GroupKind> {
        let mut kinds = Vec::new();
        for rule in self.rules {
            collect_kinds(&rule.placement, &mut kinds);
        }
        kinds
    }
}

fn collect_kinds(placement: &Placement, kinds: &mut Vec<GroupKind>) {
    let path = match placement {
        Placement::Attach(path)
        | Placement::Append(path)
        | Placement::Open { path, .. }
        | Placement::AppendUnder { path, .. } => *path,
        Placement::Branch {
            then, otherwise, ..
        } => {
            collect_kinds(then, kinds);
            collect_kinds(otherwise, kinds);
            return;
        }
    };
    let opened = match placement {
        Placement::Open { kind, .. } => Some(*kind),
        _ => None,
    };
    let stepped = path.iter().map(|step| match step {
        Step::Last(kind) | Step::LastOrNew(kind) => *kind,
    });
    for kind in stepped.chain(opened) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
}

const fn attach(tags: &'static [&'static str], path: Path) -> Rule {
    Rule {
        tags,
        placement: Placement::Attach(path),
    }
}

const fn append(tags: &'static [&'static str], path: Path) -> Rule {
    Rule {
        tags,
        placement: Placement::Append(path),
    }
}

const fn open(tags: &'static [&'static str], path: Path, kind: GroupKind) -> Rule {
    Rule {
        tags,
        placement: Placement::Open { path, kind },
    }
}

const fn rule(tags: &'static [&'static str], placement: Placement) -> Rule {
    Rule { tags, placement }
}

const HEADER: &[&str] = &["MSH", "PID", "PV1"];

pub static VISIT_EVENT: Grammar = Grammar {
    name: "ADT",
    rules: &[
        attach(&["MSH", "EVN", "PID", "PV1", "PV2"], ROOT),
        append(&["NK1", "DB1", "OBX", "AL1", "IN1"], ROOT),
    ],
};

pub static ALLERGY: Grammar = Grammar {
    name: "ADT-61",
    rules: &[
        attach(&["MSH", "EVN", "PID", "PV1"], ROOT),
        append(&["IAM"], ROOT),
    ],
};

pub static PROBLEM_LIST: Grammar = Grammar {
    name: "PPR-01",
    rules: &[
        attach(&["MSH", "PID"], ROOT),
        open(&["PRB"], ROOT, GroupKind::Problem),
        attach(&["ZPR"], PROBLEM),
        append(&["ZPD", "ZI1", "ORC"], PROBLEM),
    ],
};

pub static DIET_ORDER: Grammar = Grammar {
    name: "OMD",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        append(&["TQ1", "ODS"], ORDER),
    ],
};

pub static PRESCRIPTION_ORDER: Grammar = Grammar {
    name: "OMP-01",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        attach(&["TQ1", "RXE"], ORDER),
        append(&["RXR"], ORDER),
    ],
};

/// RXR describes the route of the last administration once one exists,
/// otherwise the route of the order itself.
const ADMINISTRATION_ROUTE: Placement = Placement::Branch {
    when: Condition::Exists(ADMINISTRATION),
    then: &Placement::Attach(ADMINISTRATION),
    otherwise: &Placement::Append(ORDER),
};

pub static PRESCRIPTION_ADMINISTRATION: Grammar = Grammar {
    name: "OMP-11",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        attach(&["TQ1", "RXE"], ORDER),
        rule(&["RXR"], ADMINISTRATION_ROUTE),
        append(&["RXA"], ADMINISTRATION_OR_NEW),
    ],
};

pub static INJECTION_ORDER: Grammar = Grammar {
    name: "OMP-02",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        attach(&["TQ1", "RXE"], ORDER),
        append(&["RXR", "RXC", "OBX", "CTI"], ORDER),
    ],
};

pub static INJECTION_ADMINISTRATION: Grammar = Grammar {
    name: "OMP-12",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        attach(&["TQ1", "RXE"], ORDER),
        append(&["RXC", "CTI"], ORDER),
        rule(&["RXR"], ADMINISTRATION_ROUTE),
        append(&["RXA"], ADMINISTRATION_OR_NEW),
        append(&["OBX"], ADMINISTRATION),
    ],
};

pub static SPECIMEN_TEST_ORDER: Grammar = Grammar {
    name: "OML-01",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["SPM"], ROOT, GroupKind::Specimen),
        // A second ORC opens a new ORDER. Legacy jsonizers overwrote the ORC
        // of the last ORDER instead; confirm before relying on either.
        rule(
            &["ORC"],
            Placement::Branch {
                when: Condition::Contains {
                    path: SPECIMEN_ORDER,
                    tag: "ORC",
                },
                then: &Placement::Open {
                    path: SPECIMEN,
                    kind: GroupKind::Order,
                },
                otherwise: &Placement::Attach(SPECIMEN_ORDER_OR_NEW),
            },
        ),
        attach(&["TQ1", "OBR"], SPECIMEN_ORDER),
        append(&["OBX"], SPECIMEN_ORDER),
    ],
};

pub static SPECIMEN_TEST_RESULT: Grammar = Grammar {
    name: "OML-11",
    rules: &[
        attach(HEADER, ROOT),
        open(&["SPM"], ROOT, GroupKind::Specimen),
        // A second OBR opens a new ORDER, keyed `OBR` as in every other
        // category. Legacy jsonizers overwrote the OBR of the last ORDER and
        // keyed it `OBR_Nested`; confirm before relying on either.
        rule(
            &["OBR"],
            Placement::Branch {
                when: Condition::Contains {
                    path: SPECIMEN_ORDER,
                    tag: "OBR",
                },
                then: &Placement::Open {
                    path: SPECIMEN,
                    kind: GroupKind::Order,
                },
                otherwise: &Placement::Attach(SPECIMEN_ORDER_OR_NEW),
            },
        ),
        attach(&["ORC"], SPECIMEN_ORDER),
        append(&["OBX"], SPECIMEN_ORDER),
    ],
};

const GENERAL_ORDER_RULES: &[Rule] = &[
    attach(HEADER, ROOT),
    open(&["ORC"], ROOT, GroupKind::Order),
    append(&["TQ1", "OBX"], ORDER),
    attach(&["OBR"], ORDER),
];

pub static RADIOLOGY_ORDER: Grammar = Grammar {
    name: "OMG-01",
    rules: GENERAL_ORDER_RULES,
};

pub static ENDOSCOPY_ORDER: Grammar = Grammar {
    name: "OMG-02",
    rules: GENERAL_ORDER_RULES,
};

pub static PHYSIOLOGY_ORDER: Grammar = Grammar {
    name: "OMG-03",
    rules: &[
        attach(HEADER, ROOT),
        append(&["AL1"], ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        append(&["TQ1", "OBX"], ORDER),
        attach(&["OBR"], ORDER),
    ],
};

pub static RADIOLOGY_RESULT: Grammar = Grammar {
    name: "OMG-11",
    rules: &[
        attach(HEADER, ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        append(&["OBX", "ZE1", "IPC"], ORDER),
        attach(&["TQ1", "OBR"], ORDER),
        rule(
            &["ZE2"],
            Placement::AppendUnder {
                path: ORDER,
                parent: "ZE1",
            },
        ),
    ],
};

pub static ENDOSCOPY_RESULT: Grammar = Grammar {
    name: "OMG-12",
    rules: &[
        attach(HEADER, ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        append(&["TQ1", "OBX", "ZE1", "IPC"], ORDER),
        // a second OBR in the same order reports on the last extended segment
        rule(
            &["OBR"],
            Placement::Branch {
                when: Condition::Contains {
                    path: ORDER,
                    tag: "OBR",
                },
                then: &Placement::AppendUnder {
                    path: ORDER,
                    parent: "ZE1",
                },
                otherwise: &Placement::Attach(ORDER),
            },
        ),
    ],
};

pub static PHYSIOLOGY_RESULT: Grammar = Grammar {
    name: "OMG-13",
    rules: &[
        attach(HEADER, ROOT),
        open(&["ORC"], ROOT, GroupKind::Order),
        append(&["TQ1", "OBX"], ORDER),
        // ORC may be omitted, in which case OBR starts the order
        rule(
            &["OBR"],
            Placement::Branch {
                when: Condition::Any(&[
                    Condition::Missing(ORDER),
                    Condition::Contains {
                        path: ORDER,
                        tag: "OBR",
                    },
                ]),
                then: &Placement::Open {
                    path: ROOT,
                    kind: GroupKind::Order,
                },
                otherwise: &Placement::Attach(ORDER),
            },
        ),
    ],
};

/// The grammar of `category`.
pub fn grammar_for(category: Category) -> &'static Grammar {
    match category {
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
        | Category::Adt52 => &VISIT_EVENT,
        Category::Adt61 => &ALLERGY,
        Category::Ppr01 => &PROBLEM_LIST,
        Category::Omd => &DIET_ORDER,
        Category::Omp01 => &PRESCRIPTION_ORDER,
        Category::Omp11 => &PRESCRIPTION_ADMINISTRATION,
        Category::Omp02 => &INJECTION_ORDER,
        Category::Omp12 => &INJECTION_ADMINISTRATION,
        Category::Oml01 => &SPECIMEN_TEST_ORDER,
        Category::Oml11 => &SPECIMEN_TEST_RESULT,
        Category::Omg01 => &RADIOLOGY_ORDER,
        Category::Omg11 => &RADIOLOGY_RESULT,
        Category::Omg02 => &ENDOSCOPY_ORDER,
        Category::Omg12 => &ENDOSCOPY_RESULT,
        Category::Omg03 => &PHYSIOLOGY_ORDER,
        Category::Omg13 => &PHYSIOLOGY_RESULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_header_and_patient() {
        for category in Category::ALL {
            let grammar = grammar_for(category);
            assert!(grammar.placement("MSH").is_some(), "{category}");
            assert!(grammar.placement("PID").is_some(), "{category}");
        }
    }

    #[test]
    fn tags_are_unique_within_a_grammar() {
        for category in Category::ALL {
            let tags: Vec<&str> = grammar_for(category).tags().collect();
            let mut unique = tags.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(tags.len(), unique.len(), "{category}");
        }
    }

    #[test]
    fn group_kinds_follow_the_rules() {
        assert!(grammar_for(Category::Adt22).group_kinds().is_empty());
        assert_eq!(
            grammar_for(Category::Omp12).group_kinds(),
            vec![GroupKind::Order, GroupKind::Administration]
        );
        assert_eq!(
            grammar_for(Category::Oml11).group_kinds(),
            vec![GroupKind::Specimen, GroupKind::Order]
        );
        assert_eq!(
            grammar_for(Category::Ppr01).group_kinds(),
            vec![GroupKind::Problem]
        );
    }

    #[test]
    fn visit_events_share_one_grammar() {
        assert!(std::ptr::eq(
            grammar_for(Category::Adt00),
            grammar_for(Category::Adt52)
        ));
        assert!(!std::ptr::eq(
            grammar_for(Category::Adt00),
            grammar_for(Category::Adt61)
        ));
    }
}
