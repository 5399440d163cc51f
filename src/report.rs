use crate::algorithm::{
    context::{ContextRecord, ContextSide},
    Comparison, Summary,
};
use crate::config::OutputMode;
use crate::DynResult;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use serde::Serialize;
use std::io::Write;

const RULE: &str = "-------------------";

struct Painter<'a, W: Write> {
    output: &'a mut W,
    styled: bool,
}

impl<'a, W: Write> Painter<'a, W> {
    fn line(&mut self, text: &str) -> DynResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn styled_line(&mut self, prefix: &str, text: &str, color: Color, bold: bool) -> DynResult<()> {
        if !self.styled {
            return self.line(&format!("{prefix}{text}"));
        }
        queue!(self.output, SetForegroundColor(color))?;
        if bold {
            queue!(self.output, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.output,
            Print(prefix),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\n"),
        )?;
        Ok(())
    }
}

fn print_side(painter: &mut Painter<impl Write>, name: &str, side: &ContextSide) -> DynResult<()> {
    painter.styled_line("", &format!("Context from '{name}':"), Color::Blue, false)?;
    painter.line(RULE)?;
    for neighbor in &side.before {
        painter.line(&format!("    {}", neighbor.text))?;
    }
    painter.styled_line(">>> ", &side.matched.text, Color::Yellow, true)?;
    for neighbor in &side.after {
        painter.line(&format!("    {}", neighbor.text))?;
    }
    Ok(())
}

fn print_record(painter: &mut Painter<impl Write>, names: [&str; 2], record: &ContextRecord) -> DynResult<()> {
    painter.styled_line("", &format!("=== Match {} ===", record.sequence), Color::Cyan, true)?;
    painter.line("Matching text:")?;
    painter.styled_line(">>> ", &record.chunk_text, Color::Yellow, true)?;
    painter.line("")?;
    print_side(painter, names[0], &record.sides[0])?;
    painter.line("")?;
    print_side(painter, names[1], &record.sides[1])?;
    painter.line("")?;
    painter.line("")?;
    Ok(())
}

pub fn summary_line(summary: &Summary) -> String {
    if summary.is_empty() {
        "No matches found.".to_owned()
    } else if summary.matches == 1 {
        "1 unique match found.".to_owned()
    } else {
        format!("{} unique matches found.", summary.matches)
    }
}

/// Writes the human-readable report: one block per match with the context from both
/// documents, then the number of matches.
pub fn print_report(comparison: &Comparison, names: [&str; 2], styled: bool, output: &mut impl Write) -> DynResult<()> {
    let mut painter = Painter { output, styled };
    for record in &comparison.records {
        print_record(&mut painter, names, record)?;
    }
    painter.line(&summary_line(&comparison.summary))?;
    painter.output.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    documents: [&'a str; 2],
    #[serde(flatten)]
    comparison: &'a Comparison,
}

pub fn print_json(comparison: &Comparison, names: [&str; 2], output: &mut impl Write) -> DynResult<()> {
    let report = JsonReport {
        documents: names,
        comparison,
    };
    serde_json::to_writer_pretty(&mut *output, &report)?;
    writeln!(output)?;
    Ok(())
}

pub fn print(
    comparison: &Comparison,
    names: [&str; 2],
    mode: OutputMode,
    styled: bool,
    output: &mut impl Write,
) -> DynResult<()> {
    match mode {
        OutputMode::Text => print_report(comparison, names, styled, output),
        OutputMode::Json => print_json(comparison, names, output),
        OutputMode::Debug => {
            writeln!(output, "{comparison:#?}")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::{print_json, print_report, summary_line};
    use crate::algorithm::{compare, Comparison, ComparisonParams, Summary};

    fn render(comparison: &Comparison, styled: bool) -> String {
        let mut output = vec![];
        print_report(comparison, ["a.pdf", "b.pdf"], styled, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn sample() -> Comparison {
        let old = ["Einleitung ohne Bezug.", "Die Sitzung beginnt um neun Uhr morgens.", "Danach folgt die Aussprache."];
        let new = ["Heute – beginnt um neun „Uhr“ morgens."];
        compare([&old[..], &new[..]], &ComparisonParams::default())
    }

    #[test]
    fn plain_report() {
        let expected = "\
=== Match 1 ===
Matching text:
>>> beginnt um neun Uhr morgens.

Context from 'a.pdf':
-------------------
    Einleitung ohne Bezug.
>>> Die Sitzung beginnt um neun Uhr morgens.
    Danach folgt die Aussprache.

Context from 'b.pdf':
-------------------
>>> Heute – beginnt um neun „Uhr“ morgens.


1 unique match found.
";
        assert_eq!(render(&sample(), false), expected);
    }

    #[test]
    fn no_matches() {
        assert_eq!(render(&Comparison::default(), false), "No matches found.\n");
    }

    #[test]
    fn summary_counts() {
        let summary = |matches| Summary {
            matches,
            ..Summary::default()
        };
        assert_eq!(summary_line(&summary(0)), "No matches found.");
        assert_eq!(summary_line(&summary(1)), "1 unique match found.");
        assert_eq!(summary_line(&summary(3)), "3 unique matches found.");
    }

    #[test]
    fn styled_report_keeps_the_text() {
        let styled = render(&sample(), true);
        assert!(styled.contains('\u{1b}'));
        assert!(styled.contains("Die Sitzung beginnt um neun Uhr morgens."));
        assert!(!render(&sample(), false).contains('\u{1b}'));
    }

    #[test]
    fn json_report() {
        let mut output = vec![];
        print_json(&sample(), ["a.pdf", "b.pdf"], &mut output).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["documents"][1], "b.pdf");
        assert_eq!(value["summary"]["matches"], 1);
        assert_eq!(value["records"][0]["chunk_text"], "beginnt um neun Uhr morgens.");
        assert_eq!(value["records"][0]["sides"][0]["matched"]["position"], 1);
        assert_eq!(value["records"][0]["sides"][0]["before"][0]["offset"], -1);
        assert_eq!(value["records"][0]["sides"][0]["matched"]["line"], 1);
        assert_eq!(value["records"][0]["sides"][1]["matched"]["line"], 0);
        assert!(value["records"][0]["sides"][0]["matched"].get("annotation").is_none());
    }
}
