//! Rust code generation for extracted query metadata.
//!
//! Each query file becomes one self-contained unit: a marker type holding
//! the SQL, an input struct, and four `sqlx` helpers. Units use
//! fully-qualified paths only so they can be `include!`d anywhere.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::ast::{GeneratedUnit, Parameter, QueryMetadata};
use crate::config::{CodegenConfig, Dialect};
use crate::types::{self, BindKind};

/// `@name` after cleanup.
static PARAM_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("parameter reference pattern is valid"));

/// Trait for converting query metadata to Rust source.
pub trait ToRust {
    /// Generate the unit for this query.
    fn to_rust(&self, config: &CodegenConfig) -> GeneratedUnit;
}

impl ToRust for QueryMetadata {
    fn to_rust(&self, config: &CodegenConfig) -> GeneratedUnit {
        assemble(self, config)
    }
}

/// Build the generated unit for one query.
///
/// Pure: the same metadata and config always give byte-identical output.
pub fn assemble(metadata: &QueryMetadata, config: &CodegenConfig) -> GeneratedUnit {
    let type_name = format!("{}Query", types::type_ident(&metadata.query_name));
    let input_name = format!("{type_name}Input");
    let (bound_sql, bind_order) =
        bind_placeholders(&metadata.cleaned_sql, &metadata.parameters, config.dialect);

    let mut out = Source::default();
    out.line(format!(
        "// @generated by dipper from `{}`. Do not edit.",
        metadata.source_file
    ));
    out.blank();

    out.line(format!(
        "/// Query `{}` from `{}`.",
        metadata.query_name, metadata.source_file
    ));
    out.line("#[allow(dead_code, non_camel_case_types)]");
    out.line("#[derive(Debug, Clone, Copy, Default)]");
    out.line(format!("pub struct {type_name};"));
    out.blank();

    write_input(&mut out, &type_name, &input_name, &metadata.parameters);
    out.blank();

    out.line("#[allow(dead_code)]");
    out.line(format!("impl {type_name} {{"));
    out.line("    /// The SQL query text.");
    out.line(format!(
        "    pub const SQL: &'static str = {};",
        str_literal(&metadata.cleaned_sql)
    ));
    out.blank();
    out.line(format!(
        "    /// [`Self::SQL`] with parameters rewritten to {} placeholders.",
        config.dialect
    ));
    out.line(format!(
        "    pub const BOUND_SQL: &'static str = {};",
        str_literal(&bound_sql)
    ));

    let helpers = Helpers::new(metadata, config, &input_name, &bind_order);
    helpers.write(&mut out);
    out.line("}");

    GeneratedUnit {
        file_name: format!("{type_name}.g.rs"),
        type_name,
        source_file: metadata.source_file.clone(),
        source: out.finish(),
    }
}

/// Rewrite each declared `@name` to the dialect placeholder.
///
/// Returns the rewritten SQL and the parameter indexes to bind, in order.
/// References inside comments and quoted text are left alone, as are
/// undeclared `@word` references. Numbered placeholders count only the
/// parameters the statement actually uses.
pub fn bind_placeholders(sql: &str, params: &[Parameter], dialect: Dialect) -> (String, Vec<usize>) {
    let segments = segments(sql);
    let declared = |name: &str| params.iter().position(|p| p.name == name);

    let occurrences: Vec<usize> = segments
        .iter()
        .filter(|segment| segment.code)
        .flat_map(|segment| PARAM_REF.captures_iter(segment.text))
        .filter_map(|caps| declared(&caps[1]))
        .collect();
    let used: Vec<usize> = (0..params.len())
        .filter(|index| occurrences.contains(index))
        .collect();

    let mut bound = String::with_capacity(sql.len());
    for segment in &segments {
        if !segment.code {
            bound.push_str(segment.text);
            continue;
        }
        let rewritten = PARAM_REF.replace_all(segment.text, |caps: &Captures| {
            declared(&caps[1])
                .and_then(|index| used.iter().position(|&u| u == index))
                .map_or_else(|| caps[0].to_string(), |slot| dialect.placeholder(slot))
        });
        bound.push_str(&rewritten);
    }

    let order = if dialect.binds_per_occurrence() {
        occurrences
    } else {
        used
    };

    (bound, order)
}

/// A run of SQL text, either code or a comment / quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    text: &'a str,
    code: bool,
}

/// Split SQL into code and non-code runs.
///
/// Non-code runs are `--` line comments (up to the newline), `/* */` block
/// comments, and `'...'`, `"..."` or `` `...` `` quoted text. An unterminated
/// run extends to the end of the input.
fn segments(sql: &str) -> Vec<Segment<'_>> {
    let bytes = sql.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut at = 0;

    while at < bytes.len() {
        let end = match (bytes[at], bytes.get(at + 1)) {
            (b'-', Some(b'-')) => Some(sql[at..].find('\n').map_or(sql.len(), |n| at + n)),
            (b'/', Some(b'*')) => Some(sql[at + 2..].find("*/").map_or(sql.len(), |n| at + 2 + n + 2)),
            (quote @ (b'\'' | b'"' | b'`'), _) => Some(
                sql[at + 1..]
                    .find(char::from(quote))
                    .map_or(sql.len(), |n| at + 1 + n + 1),
            ),
            _ => None,
        };

        let Some(end) = end else {
            at += 1;
            continue;
        };
        if start < at {
            segments.push(Segment { text: &sql[start..at], code: true });
        }
        segments.push(Segment { text: &sql[at..end], code: false });
        start = end;
        at = end;
    }

    if start < sql.len() {
        segments.push(Segment { text: &sql[start..], code: true });
    }
    segments
}

/// Quote `s` as a string literal that reproduces it byte for byte.
///
/// A raw string with enough `#`s to hold it, or an escaped literal when the
/// text holds a carriage return (raw strings cannot keep one verbatim).
pub fn str_literal(s: &str) -> String {
    if s.contains('\r') {
        return format!("{s:?}");
    }

    let mut longest = 0;
    let mut run: Option<usize> = None;
    for c in s.chars() {
        run = match (c, run) {
            ('"', _) => Some(0),
            ('#', Some(n)) => Some(n + 1),
            _ => None,
        };
        if let Some(n) = run {
            longest = longest.max(n);
        }
    }

    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{s}\"{hashes}")
}

fn write_input(out: &mut Source, type_name: &str, input_name: &str, params: &[Parameter]) {
    out.line(format!("/// Input parameters for [`{type_name}`]."));
    out.line("#[allow(dead_code, non_camel_case_types, non_snake_case)]");
    out.line("#[derive(Debug, Clone, Default, PartialEq)]");

    if params.is_empty() {
        out.line(format!("pub struct {input_name} {{}}"));
        return;
    }

    out.line(format!("pub struct {input_name} {{"));
    for param in params {
        out.line(format!(
            "    /// The `{}` parameter (`{}`).",
            param.name, param.sql_type
        ));
        out.line(format!(
            "    pub {}: {},",
            types::field_ident(&param.name),
            types::resolve_type(&param.sql_type).rust
        ));
    }
    out.line("}");
}

/// The four call-site helpers.
struct Helpers<'a> {
    input_name: &'a str,
    runtime: &'a str,
    dialect: Dialect,
    result: Option<String>,
    binds: Vec<String>,
}

/// One helper variant.
struct Helper {
    name: &'static str,
    doc: &'static str,
    many: bool,
}

const SYNC_HELPERS: [(Helper, &str); 2] = [
    (
        Helper {
            name: "query",
            doc: "Executes the query and returns all rows.",
            many: true,
        },
        "query_async",
    ),
    (
        Helper {
            name: "query_single",
            doc: "Executes the query and returns exactly one row.",
            many: false,
        },
        "query_single_async",
    ),
];

const ASYNC_HELPERS: [Helper; 2] = [
    Helper {
        name: "query_async",
        doc: "Executes the query asynchronously and returns all rows.",
        many: true,
    },
    Helper {
        name: "query_single_async",
        doc: "Executes the query asynchronously and returns exactly one row.",
        many: false,
    },
];

impl<'a> Helpers<'a> {
    fn new(
        metadata: &QueryMetadata,
        config: &'a CodegenConfig,
        input_name: &'a str,
        bind_order: &[usize],
    ) -> Self {
        let binds = bind_order
            .iter()
            .filter_map(|&i| metadata.parameters.get(i))
            .map(|param| {
                let field = types::field_ident(&param.name);
                match types::resolve_type(&param.sql_type).bind {
                    BindKind::Ref => format!(".bind(&input.{field})"),
                    BindKind::Display => format!(".bind(input.{field}.to_string())"),
                }
            })
            .collect();

        Self {
            input_name,
            runtime: &config.runtime_crate,
            dialect: config.dialect,
            result: metadata.result_type.as_deref().map(types::result_path),
            binds,
        }
    }

    fn row_type(&self) -> &str {
        self.result.as_deref().unwrap_or(self.dialect.row())
    }

    fn return_type(&self, many: bool) -> String {
        if many {
            format!("Result<Vec<{}>, sqlx::Error>", self.row_type())
        } else {
            format!("Result<{}, sqlx::Error>", self.row_type())
        }
    }

    fn builder(&self) -> String {
        match &self.result {
            Some(result) => format!(
                "sqlx::query_as::<{}, {result}>(Self::BOUND_SQL)",
                self.dialect.database()
            ),
            None => format!("sqlx::query::<{}>(Self::BOUND_SQL)", self.dialect.database()),
        }
    }

    fn signature(&self, out: &mut Source, helper: &Helper, is_async: bool) {
        let keyword = if is_async { "async fn" } else { "fn" };
        out.line(format!("    pub {keyword} {}(", helper.name));
        out.line(format!("        conn: &mut {},", self.dialect.connection()));
        out.line(format!("        input: &{},", self.input_name));
        out.line(format!(
            "        transaction: Option<&mut sqlx::Transaction<'_, {}>>,",
            self.dialect.database()
        ));
        out.line("        timeout: Option<std::time::Duration>,");
        out.line(format!("    ) -> {} {{", self.return_type(helper.many)));
    }

    fn write(&self, out: &mut Source) {
        for (helper, target) in &SYNC_HELPERS {
            out.blank();
            out.line(format!("    /// {}", helper.doc));
            out.line("    ///");
            out.line("    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.");
            self.signature(out, helper, false);
            out.line(format!(
                "        {}::runtime::block_on(Self::{target}(conn, input, transaction, timeout))",
                self.runtime
            ));
            out.line("    }");
        }

        for helper in &ASYNC_HELPERS {
            out.blank();
            out.line(format!("    /// {}", helper.doc));
            if !helper.many {
                out.line("    ///");
                out.line("    /// Fails with `RowNotFound` for no rows and a `TooManyRows` decode error for more than one.");
            }
            self.signature(out, helper, true);
            self.write_query(out);
            out.line(format!(
                "        {}::runtime::with_timeout(timeout, async move {{",
                self.runtime
            ));
            if helper.many {
                out.line("            match transaction {");
                out.line("                Some(tx) => query.fetch_all(&mut **tx).await,");
                out.line("                None => query.fetch_all(conn).await,");
                out.line("            }");
            } else {
                out.line("            let rows = match transaction {");
                out.line("                Some(tx) => query.fetch_all(&mut **tx).await?,");
                out.line("                None => query.fetch_all(conn).await?,");
                out.line("            };");
                out.line(format!("            {}::runtime::exactly_one(rows)", self.runtime));
            }
            out.line("        })");
            out.line("        .await");
            out.line("    }");
        }
    }

    fn write_query(&self, out: &mut Source) {
        if self.binds.is_empty() {
            out.line("        let _ = input;");
            out.line(format!("        let query = {};", self.builder()));
            return;
        }

        out.line(format!("        let query = {}", self.builder()));
        let last = self.binds.len() - 1;
        for (i, bind) in self.binds.iter().enumerate() {
            let end = if i == last { ";" } else { "" };
            out.line(format!("            {bind}{end}"));
        }
    }
}

/// Line-oriented source buffer.
#[derive(Default)]
struct Source {
    text: String,
}

impl Source {
    fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }
}
