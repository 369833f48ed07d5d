use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use implfold_group::{collapse, Group, MemberKind, Renderer};
use log::info;

use crate::config::{Config, OutputConfig, OutputFormat};
use crate::error::CliError;
use crate::io::{read_input, signature_lines};

/// A plain listing of signatures, one per line.
pub struct TextRenderer {
    lines: Vec<String>,
    hidden: Vec<bool>,
    toggles: BTreeMap<usize, Vec<usize>>,
}

impl TextRenderer {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let hidden = vec![false; lines.len()];
        Self {
            lines,
            hidden,
            toggles: BTreeMap::new(),
        }
    }

    /// Visible lines, each toggle followed by the lines it hides when `expanded`.
    pub fn listing<'a>(&'a self, labels: &'a OutputConfig, expanded: bool) -> Listing<'a> {
        Listing {
            renderer: self,
            labels,
            expanded,
        }
    }
}

pub struct Listing<'a> {
    renderer: &'a TextRenderer,
    labels: &'a OutputConfig,
    expanded: bool,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TextRenderer {
            lines,
            hidden,
            toggles,
        } = self.renderer;
        for (at, line) in lines.iter().enumerate() {
            if hidden[at] {
                continue;
            }
            writeln!(f, "{}", line)?;
            let Some(members) = toggles.get(&at) else {
                continue;
            };
            if self.expanded {
                writeln!(f, "    [-] {}", self.labels.hide_label)?;
                for &member in members {
                    writeln!(f, "        {}", lines[member])?;
                }
            } else {
                writeln!(f, "    [+] {} ({})", self.labels.show_label, members.len())?;
            }
        }
        Ok(())
    }
}

impl Renderer for TextRenderer {
    type Node = usize;

    fn candidates(&mut self) -> Vec<(usize, String)> {
        self.lines.iter().cloned().enumerate().collect()
    }

    fn hide(&mut self, node: &usize) {
        self.hidden[*node] = true;
    }

    fn insert_toggle(&mut self, after: &usize, hidden: &[usize]) {
        self.toggles.insert(*after, hidden.to_vec());
    }
}

/// One block per group: the representative with its canonical trait and
/// self type, then the other members.
pub struct GroupTree<'a>(pub &'a [Group]);

impl fmt::Display for GroupTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (at, group) in self.0.iter().enumerate() {
            writeln!(f, "group {} ({} members)", at, group.members().len())?;
            if let Some(representative) = group.representative() {
                writeln!(f, "  * {}", representative.text)?;
                if let Some(item) = representative.normalized() {
                    let negation = if item.negated { "!" } else { "" };
                    match &item.trait_ref {
                        Some(trait_ref) => {
                            writeln!(f, "    = {}{} for {}", negation, trait_ref, item.self_ty)?
                        }
                        None => writeln!(f, "    = {}", item.self_ty)?,
                    }
                }
            }
            for member in group.hidden() {
                match &member.kind {
                    MemberKind::Parsed(_) => writeln!(f, "    {}", member.text)?,
                    MemberKind::Unparsed(error) => {
                        writeln!(f, "  ? {}", member.text)?;
                        writeln!(f, "    {}", error)?;
                    }
                }
            }
        }
        Ok(())
    }
}

pub fn handle_group(
    file: &Path,
    config: &Config,
    format: OutputFormat,
    expanded: bool,
) -> Result<(), CliError> {
    let contents = read_input(file)?;
    let mut renderer = TextRenderer::new(signature_lines(&contents, &config.input.comment_prefix));
    let groups = collapse(&mut renderer)?;
    info!(
        "{} signatures in {} groups",
        renderer.lines.len(),
        groups.len()
    );

    match format {
        OutputFormat::Text => print!("{}", renderer.listing(&config.output, expanded)),
        OutputFormat::Tree => print!("{}", GroupTree(&groups)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    const LISTING: &[&str] = &[
        "impl<A> Debug for (A,)",
        "impl Debug for String",
        "impl<A, B> Debug for (A, B)",
        "impl<const N: usize> Debug for [u8; N]",
        "impl<A, B, C> Debug for (A, B, C)",
    ];

    fn collapsed() -> (TextRenderer, Vec<Group>) {
        let mut renderer = TextRenderer::new(LISTING.iter().copied());
        let groups = collapse(&mut renderer).unwrap();
        (renderer, groups)
    }

    #[test]
    fn test_collapsed_text() {
        let (renderer, _) = collapsed();
        expect![[r#"
            impl Debug for String
            impl<const N: usize> Debug for [u8; N]
            impl<A, B, C> Debug for (A, B, C)
                [+] Show Generated variadic implementations (2)
        "#]]
        .assert_eq(&renderer.listing(&OutputConfig::default(), false).to_string());
    }

    #[test]
    fn test_expanded_text() {
        let (renderer, _) = collapsed();
        expect![[r#"
            impl Debug for String
            impl<const N: usize> Debug for [u8; N]
            impl<A, B, C> Debug for (A, B, C)
                [-] Hide Generated variadic implementations
                    impl<A> Debug for (A,)
                    impl<A, B> Debug for (A, B)
        "#]]
        .assert_eq(&renderer.listing(&OutputConfig::default(), true).to_string());
    }

    #[test]
    fn test_tree_output() {
        let (_, groups) = collapsed();
        expect![[r#"
            group 0 (3 members)
              * impl<A, B, C> Debug for (A, B, C)
                = Debug for (T0, T1, T2)
                impl<A> Debug for (A,)
                impl<A, B> Debug for (A, B)
            group 1 (1 members)
              * impl Debug for String
                = Debug for String
        "#]]
        .assert_eq(&GroupTree(&groups[..2]).to_string());
    }

    #[test]
    fn test_tree_lists_unparsed_with_error() {
        let (_, groups) = collapsed();
        let tree = GroupTree(&groups[2..]).to_string();
        assert!(tree.starts_with("group 0 (1 members)\n  ? impl<const N: usize> Debug for [u8; N]\n    Syntax error at 1:"));
    }
}
