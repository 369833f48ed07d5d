//! The clustering loop.
//!
//! Signatures arrive one at a time and are compared against the
//! representative of each existing group, oldest group first. The first
//! group whose representative and the new signature include one another in
//! either direction takes it:
//!
//! - the representative includes the new signature (including mutual
//!   inclusion): it joins and the representative stays;
//! - the new signature includes the representative: it joins and becomes
//!   the representative.
//!
//! Otherwise the signature opens a new group. Group formation depends on
//! arrival order.

use implfold_syntax::{ImplParser, ParseError};
use implfold_types::{normalize, NormalizedImpl};
use log::{debug, trace};

use crate::error::{GroupError, GroupResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Parsed(NormalizedImpl),
    /// Kept with the reason it failed; never merged with anything.
    Unparsed(ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Arrival position across all pushed signatures.
    pub index: usize,
    pub text: String,
    pub kind: MemberKind,
}

impl Member {
    pub fn normalized(&self) -> Option<&NormalizedImpl> {
        match &self.kind {
            MemberKind::Parsed(item) => Some(item),
            MemberKind::Unparsed(_) => None,
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.kind {
            MemberKind::Parsed(_) => None,
            MemberKind::Unparsed(error) => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Position in `members` of the representative; `None` for unparsed groups.
    representative: Option<usize>,
    members: Vec<Member>,
}

impl Group {
    fn parsed(member: Member) -> Self {
        Self {
            representative: Some(0),
            members: vec![member],
        }
    }

    fn unparsed(member: Member) -> Self {
        Self {
            representative: None,
            members: vec![member],
        }
    }

    /// Members in arrival order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn representative(&self) -> Option<&Member> {
        self.representative.map(|at| &self.members[at])
    }

    fn representative_impl(&self) -> Option<&NormalizedImpl> {
        self.representative().and_then(Member::normalized)
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Every member except the representative, in arrival order.
    pub fn hidden(&self) -> impl Iterator<Item = &Member> + '_ {
        let representative = self.representative;
        self.members
            .iter()
            .enumerate()
            .filter(move |(at, _)| Some(*at) != representative)
            .map(|(_, member)| member)
    }
}

/// Incremental grouping of signature texts.
#[derive(Default)]
pub struct Clusterer {
    parser: ImplParser,
    groups: Vec<Group>,
    pushed: usize,
}

impl Clusterer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, normalize and place one signature. Returns the index of the group it joined.
    pub fn push(&mut self, text: impl Into<String>) -> GroupResult<usize> {
        let text = text.into();
        let index = self.pushed;
        self.pushed += 1;

        let item = match self.parser.parse(&text) {
            Ok(decl) => normalize(decl).map_err(|source| GroupError::Normalize {
                text: text.clone(),
                source,
            })?,
            Err(error) => {
                debug!("keeping unparsed signature {:?} on its own", text);
                self.groups.push(Group::unparsed(Member {
                    index,
                    text,
                    kind: MemberKind::Unparsed(error),
                }));
                return Ok(self.groups.len() - 1);
            }
        };

        let matched = self.groups.iter().position(|group| {
            group
                .representative_impl()
                .is_some_and(|rep| rep.includes(&item) || item.includes(rep))
        });

        let Some(at) = matched else {
            trace!("signature {:?} opens group {}", text, self.groups.len());
            self.groups.push(Group::parsed(Member {
                index,
                text,
                kind: MemberKind::Parsed(item),
            }));
            return Ok(self.groups.len() - 1);
        };

        let group = &mut self.groups[at];
        let keep = group
            .representative_impl()
            .is_some_and(|rep| rep.includes(&item));
        if !keep {
            debug!("signature {:?} becomes the representative of group {}", text, at);
            group.representative = Some(group.members.len());
        }
        group.members.push(Member {
            index,
            text,
            kind: MemberKind::Parsed(item),
        });
        Ok(at)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Group a whole sequence of signatures in order.
pub fn cluster<I>(texts: I) -> GroupResult<Vec<Group>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut clusterer = Clusterer::new();
    for text in texts {
        clusterer.push(text)?;
    }
    Ok(clusterer.into_groups())
}

#[cfg(test)]
mod tests {
    use super::*;
    use implfold_types::InvariantViolation;

    fn representative_text(group: &Group) -> Option<&str> {
        group.representative().map(|member| member.text.as_str())
    }

    #[test]
    fn test_tuple_family_collapses_to_widest() {
        let groups = cluster([
            "impl<A> Trait for (A,)",
            "impl<A, B> Trait for (A, B)",
            "impl<A, B, C> Trait for (A, B, C)",
        ])
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            representative_text(&groups[0]),
            Some("impl<A, B, C> Trait for (A, B, C)")
        );
        let hidden: Vec<usize> = groups[0].hidden().map(|member| member.index).collect();
        assert_eq!(hidden, [0, 1]);
    }

    #[test]
    fn test_wider_first_keeps_its_place() {
        let groups = cluster([
            "impl<A, B, C> Trait for (A, B, C)",
            "impl<A> Trait for (A,)",
        ])
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(representative_text(&groups[0]), Some("impl<A, B, C> Trait for (A, B, C)"));
    }

    #[test]
    fn test_mutual_inclusion_keeps_first_representative() {
        let groups = cluster([
            "impl<T> Trait for Box<T>",
            "impl<U, V: Clone> Trait for Box<U>",
        ])
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members().len(), 2);
        assert_eq!(representative_text(&groups[0]), Some("impl<T> Trait for Box<T>"));
    }

    #[test]
    fn test_unparsable_signature_stays_alone() {
        let groups = cluster([
            "impl<T: Debug> Debug for [T; 2]",
            "impl<const N: usize> Debug for [u8; N]",
            "impl<T: Debug> Debug for [T; 3]",
        ])
        .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members().len(), 2);
        assert_eq!(representative_text(&groups[0]), Some("impl<T: Debug> Debug for [T; 3]"));

        let unparsed = &groups[1];
        assert!(unparsed.is_singleton());
        assert!(unparsed.representative().is_none());
        assert!(unparsed.members()[0].parse_error().is_some());
        assert_eq!(unparsed.members()[0].index, 1);
    }

    #[test]
    fn test_first_matching_group_wins() {
        let mut clusterer = Clusterer::new();
        assert_eq!(clusterer.push("impl<T> Foo for Wrap<T>").unwrap(), 0);
        assert_eq!(clusterer.push("impl<T> Bar for Wrap<T>").unwrap(), 1);
        // Traits are only compared when both sides have one, so this
        // relates to both representatives; the older group takes it.
        assert_eq!(clusterer.push("impl<T> Wrap<T>").unwrap(), 0);
        assert_eq!(clusterer.push("impl<A, B> Foo for Wrap<A, B>").unwrap(), 0);
        assert_eq!(clusterer.groups().len(), 2);
        assert_eq!(
            representative_text(&clusterer.groups()[0]),
            Some("impl<A, B> Foo for Wrap<A, B>")
        );
    }

    #[test]
    fn test_unrelated_traits_do_not_merge() {
        let groups = cluster(["impl<T> Clone for Box<T>", "impl<T> Debug for Box<T>"]).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_normalization_failure_is_fatal() {
        let result = cluster(["impl<T> Foo for Bar<T>", "impl<T> Foo for Bar<T> where U: Clone"]);
        assert_eq!(
            result,
            Err(GroupError::Normalize {
                text: "impl<T> Foo for Bar<T> where U: Clone".to_string(),
                source: InvariantViolation::UndeclaredParameter {
                    name: "U".to_string()
                },
            })
        );
    }
}
