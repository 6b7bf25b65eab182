//! The assembled document tree.
//!
//! A document is a root [`Group`] whose entries are single segments, segment
//! arrays and group arrays, kept in arrival order. Array keys are rendered
//! through [`NestNaming`] only at serialization time, so the tree itself is
//! independent of naming options.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use ssmix_model::{NestNaming, OrderedMap, ValueMap};

/// Kinds of repeating groups that category grammars open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Order,
    Specimen,
    Administration,
    Problem,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Order => "ORDER",
            GroupKind::Specimen => "SPECIMEN",
            GroupKind::Administration => "ADMINISTRATION",
            GroupKind::Problem => "PROBLEM",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of an entry inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// A single segment, rendered under its tag.
    Segment(String),
    /// An array of segments, rendered under the nested tag name.
    SegmentList(String),
    /// An array of groups, rendered under the nested group name.
    Group(GroupKind),
}

impl NodeKey {
    pub fn render(&self, naming: &NestNaming) -> String {
        match self {
            NodeKey::Segment(tag) => tag.clone(),
            NodeKey::SegmentList(tag) => naming.nested(tag),
            NodeKey::Group(kind) => naming.nested(kind.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Segment(SegmentNode),
    Segments(Vec<SegmentNode>),
    Groups(Vec<Group>),
}

/// A decoded segment placed in the document.
///
/// Extended segments may carry arrays of subordinate segments (e.g. `ZE2`
/// under `ZE1`), rendered after the segment's own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentNode {
    pub fields: ValueMap,
    pub children: OrderedMap<String, Vec<SegmentNode>>,
}

impl SegmentNode {
    pub fn new(fields: ValueMap) -> Self {
        Self {
            fields,
            children: OrderedMap::new(),
        }
    }

    pub fn children(&self, tag: &str) -> &[SegmentNode] {
        self.children.get(tag).map_or(&[], Vec::as_slice)
    }

    /// This segment and all of its subordinate segments.
    pub fn segment_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|(_, children)| children)
            .map(SegmentNode::segment_count)
            .sum::<usize>()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    entries: OrderedMap<NodeKey, Node>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// A group entry opened by `tag`.
    pub fn opened_by(tag: &str, segment: SegmentNode) -> Self {
        let mut group = Self::new();
        group.attach(tag, segment);
        group
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.entries.keys()
    }

    pub fn segment(&self, tag: &str) -> Option<&SegmentNode> {
        match self.entries.get(&NodeKey::Segment(tag.to_string())) {
            Some(Node::Segment(segment)) => Some(segment),
            _ => None,
        }
    }

    pub fn segments(&self, tag: &str) -> &[SegmentNode] {
        match self.entries.get(&NodeKey::SegmentList(tag.to_string())) {
            Some(Node::Segments(segments)) => segments,
            _ => &[],
        }
    }

    pub fn groups(&self, kind: GroupKind) -> &[Group] {
        match self.entries.get(&NodeKey::Group(kind)) {
            Some(Node::Groups(groups)) => groups,
            _ => &[],
        }
    }

    pub fn has_segment(&self, tag: &str) -> bool {
        self.segment(tag).is_some()
    }

    /// Set the single-segment slot `tag`, replacing any earlier occupant in place.
    pub fn attach(&mut self, tag: &str, segment: SegmentNode) {
        self.entries
            .insert(NodeKey::Segment(tag.to_string()), Node::Segment(segment));
    }

    /// Append to the segment array `tag`, creating it on first use.
    pub fn append(&mut self, tag: &str, segment: SegmentNode) {
        if let Node::Segments(segments) = self
            .entries
            .get_or_insert_with(NodeKey::SegmentList(tag.to_string()), || {
                Node::Segments(Vec::new())
            })
        {
            segments.push(segment);
        }
    }

    /// Start a new entry of the group array `kind`.
    pub fn open(&mut self, kind: GroupKind, entry: Group) {
        if let Node::Groups(groups) = self
            .entries
            .get_or_insert_with(NodeKey::Group(kind), || Node::Groups(Vec::new()))
        {
            groups.push(entry);
        }
    }

    pub fn last_group(&self, kind: GroupKind) -> Option<&Group> {
        self.groups(kind).last()
    }

    pub fn last_group_mut(&mut self, kind: GroupKind) -> Option<&mut Group> {
        match self.entries.get_mut(&NodeKey::Group(kind)) {
            Some(Node::Groups(groups)) => groups.last_mut(),
            _ => None,
        }
    }

    /// The last entry of `kind`, creating the array with one empty entry
    /// when it does not exist yet.
    pub fn last_group_or_new(&mut self, kind: GroupKind) -> Option<&mut Group> {
        match self
            .entries
            .get_or_insert_with(NodeKey::Group(kind), || Node::Groups(vec![Group::new()]))
        {
            Node::Groups(groups) => {
                if groups.is_empty() {
                    groups.push(Group::new());
                }
                groups.last_mut()
            }
            _ => None,
        }
    }

    /// Number of segments placed anywhere below this group.
    pub fn segment_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, node)| match node {
                Node::Segment(segment) => segment.segment_count(),
                Node::Segments(segments) => segments.iter().map(SegmentNode::segment_count).sum(),
                Node::Groups(groups) => groups.iter().map(Group::segment_count).sum(),
            })
            .sum()
    }

    /// The last segment of the array `tag`.
    pub fn last_segment_mut(&mut self, tag: &str) -> Option<&mut SegmentNode> {
        match self.entries.get_mut(&NodeKey::SegmentList(tag.to_string())) {
            Some(Node::Segments(segments)) => segments.last_mut(),
            _ => None,
        }
    }
}

/// An assembled message, serializable as the output JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Group,
    naming: NestNaming,
}

impl Document {
    pub fn new(root: Group, naming: NestNaming) -> Self {
        Self { root, naming }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn naming(&self) -> &NestNaming {
        &self.naming
    }

    pub fn into_root(self) -> Group {
        self.root
    }

    pub fn segment_count(&self) -> usize {
        self.root.segment_count()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GroupView {
            group: &self.root,
            naming: &self.naming,
        }
        .serialize(serializer)
    }
}

struct GroupView<'a> {
    group: &'a Group,
    naming: &'a NestNaming,
}

impl Serialize for GroupView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.group.entries.len()))?;
        for (key, node) in self.group.entries.iter() {
            let key = key.render(self.naming);
            match node {
                Node::Segment(segment) => map.serialize_entry(
                    &key,
                    &SegmentView {
                        segment,
                        naming: self.naming,
                    },
                )?,
                Node::Segments(segments) => map.serialize_entry(
                    &key,
                    &SegmentsView {
                        segments,
                        naming: self.naming,
                    },
                )?,
                Node::Groups(groups) => map.serialize_entry(
                    &key,
                    &GroupsView {
                        groups,
                        naming: self.naming,
                    },
                )?,
            }
        }
        map.end()
    }
}

struct GroupsView<'a> {
    groups: &'a [Group],
    naming: &'a NestNaming,
}

impl Serialize for GroupsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.groups.len()))?;
        for group in self.groups {
            seq.serialize_element(&GroupView {
                group,
                naming: self.naming,
            })?;
        }
        seq.end()
    }
}

struct SegmentView<'a> {
    segment: &'a SegmentNode,
    naming: &'a NestNaming,
}

impl Serialize for SegmentView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.segment.fields.len() + self.segment.children.len();
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in self.segment.fields.iter() {
            map.serialize_entry(name, value)?;
        }
        for (tag, children) in self.segment.children.iter() {
            map.serialize_entry(
                &self.naming.nested(tag),
                &SegmentsView {
                    segments: children,
                    naming: self.naming,
                },
            )?;
        }
        map.end()
    }
}

struct SegmentsView<'a> {
    segments: &'a [SegmentNode],
    naming: &'a NestNaming,
}

impl Serialize for SegmentsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.segments.len()))?;
        for segment in self.segments {
            seq.serialize_element(&SegmentView {
                segment,
                naming: self.naming,
            })?;
        }
        seq.end()
    }
}
