use std::path::Path;

use implfold_syntax::ImplParser;
use log::info;
use miette::{NamedSource, Report};

use crate::config::Config;
use crate::error::CliError;
use crate::io::{read_input, signature_lines};

/// Outcome of parsing one signature.
pub enum ParseOutcome<'a> {
    Parsed { canonical: String },
    Failed { text: &'a str, report: Report },
}

pub fn parse_signatures<'a>(
    lines: impl Iterator<Item = &'a str>,
    source_name: &str,
) -> Vec<ParseOutcome<'a>> {
    let parser = ImplParser::new();
    lines
        .enumerate()
        .map(|(at, text)| match parser.parse(text) {
            Ok(decl) => ParseOutcome::Parsed {
                canonical: decl.to_string(),
            },
            Err(error) => ParseOutcome::Failed {
                text,
                report: Report::new(error).with_source_code(NamedSource::new(
                    format!("{} (signature {})", source_name, at + 1),
                    text.to_string(),
                )),
            },
        })
        .collect()
}

pub fn handle_parse(file: &Path, config: &Config) -> Result<(), CliError> {
    let contents = read_input(file)?;
    let outcomes = parse_signatures(
        signature_lines(&contents, &config.input.comment_prefix),
        &file.display().to_string(),
    );

    let mut parsed = 0;
    for outcome in &outcomes {
        match outcome {
            ParseOutcome::Parsed { canonical } => {
                parsed += 1;
                println!("{}", canonical);
            }
            ParseOutcome::Failed { text, report } => {
                if config.diagnostics.report_parse_errors {
                    eprintln!("{:?}", report);
                } else {
                    info!("failed to parse {:?}", text);
                }
            }
        }
    }
    println!("parsed {} of {}", parsed, outcomes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_follow_input_order() {
        let lines = [
            "impl<A,B>Trait for(A,B)",
            "impl<const N: usize> Foo for [u8; N]",
            "impl Thing",
        ];
        let outcomes = parse_signatures(lines.into_iter(), "input.txt");
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            &outcomes[0],
            ParseOutcome::Parsed { canonical } if canonical == "impl<A, B> Trait for (A, B)"
        ));
        assert!(matches!(
            &outcomes[1],
            ParseOutcome::Failed { text, .. } if text.starts_with("impl<const")
        ));
        assert!(matches!(&outcomes[2], ParseOutcome::Parsed { .. }));
    }
}
