//! Annotation extractor for `.sql` query files.
//!
//! A query file is plain SQL with a few comment directives and typed
//! parameter tokens:
//!
//! ```text
//! -- name: SelectProducts
//! -- result: crate::models::Product
//! select * from products
//! where id = @Id:uuid;
//! ```
//!
//! Extraction is total: any text yields metadata, nothing is validated.

use std::sync::LazyLock;

use nom::{
    bytes::complete::tag,
    character::complete::{char, space0},
    combinator::{opt, rest},
    IResult,
};
use regex::Regex;

use crate::ast::{Parameter, QueryMetadata, SourceUnit};

/// `@name:type`
static PARAM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+):(\w+)").expect("parameter pattern is valid"));

/// Extract metadata from a source unit.
pub fn extract(unit: &SourceUnit) -> QueryMetadata {
    let mut metadata = extract_text(&unit.name, &unit.text);
    metadata.source_file = unit.file_name.clone();
    metadata
}

/// Extract metadata from raw text, using `base_name` when no `name:` directive is present.
pub fn extract_text(base_name: &str, text: &str) -> QueryMetadata {
    let query_name = metadata_value(text, "name").unwrap_or_else(|| base_name.to_string());

    QueryMetadata {
        query_name,
        result_type: metadata_value(text, "result"),
        parameters: parameters(text),
        cleaned_sql: clean_sql(text),
        source_file: format!("{base_name}.sql"),
    }
}

/// Find the first `-- key: value` directive and return the trimmed value.
///
/// A directive starts a line (where the `--` is optional) or follows any
/// `--` later in the line, as in `select 1 -- name: One`. Directives with an
/// empty value do not count.
pub fn metadata_value(text: &str, key: &str) -> Option<String> {
    text.lines().find_map(|line| line_value(line, key))
}

fn line_value(line: &str, key: &str) -> Option<String> {
    std::iter::once(line)
        .chain(line.match_indices("--").map(|(at, _)| &line[at..]))
        .find_map(|candidate| match directive(key, candidate) {
            Ok((_, value)) if !value.trim().is_empty() => Some(value.trim().to_string()),
            _ => None,
        })
}

/// Parse one directive line.
fn directive<'a>(key: &str, line: &'a str) -> IResult<&'a str, &'a str> {
    let (input, _) = space0(line)?;
    let (input, _) = opt(tag("--"))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag(key)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, _) = space0(input)?;
    rest(input)
}

/// All `@name:type` references, one per name, in first-seen order.
///
/// A later reference with a different type is ignored.
pub fn parameters(text: &str) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = Vec::new();

    for caps in PARAM_TOKEN.captures_iter(text) {
        let name = &caps[1];
        if params.iter().all(|p| p.name != name) {
            params.push(Parameter::new(name, &caps[2]));
        }
    }

    params
}

/// Rewrite every `@name:type` to `@name`, leaving everything else untouched.
pub fn clean_sql(text: &str) -> String {
    PARAM_TOKEN.replace_all(text, "@${1}").into_owned()
}
