//! Markdown API document with sample requests and responses.

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

use ddlgen_schema::{Column, ResolvedKeys, Table};

use super::{Operation, banner_text, one_line};
use crate::error::CodegenResult;
use crate::options::GenerationOptions;

const SAMPLE_TIMESTAMP: i64 = 1_681_466_601_123;

/// Sample values by declared type.
#[allow(clippy::approx_constant)]
static SAMPLES: LazyLock<HashMap<&'static str, Value>> = LazyLock::new(|| {
    HashMap::from([
        ("TINYINT", json!(true)),
        ("BOOL", json!(true)),
        ("BOOLEAN", json!(true)),
        ("SMALLINT", json!(1)),
        ("MEDIUMINT", json!(1)),
        ("INT", json!(1)),
        ("INTEGER", json!(1)),
        ("YEAR", json!(1)),
        ("BIGINT", json!(10000)),
        ("FLOAT", json!(3.14)),
        ("DOUBLE", json!(3.14)),
        ("REAL", json!(3.14)),
        ("DECIMAL", json!(3.14)),
        ("DEC", json!(3.14)),
        ("NUMERIC", json!(3.14)),
        ("CHAR", json!("c")),
        ("VARCHAR", json!("s")),
        ("TINYTEXT", json!("abc")),
        ("TEXT", json!("abc")),
        ("MEDIUMTEXT", json!("abc")),
        ("LONGTEXT", json!("abc")),
        ("ENUM", json!("a")),
        ("SET", json!("a")),
        ("JSON", json!("{}")),
        ("TIME", json!("06:07:08")),
        ("DATE", json!("2023-04-05T00:00:00Z")),
        ("DATETIME", json!("2023-04-05T06:07:08Z")),
        ("TIMESTAMP", json!("2023-04-05T06:07:08Z")),
    ])
});

fn sample(column: &Column) -> Value {
    SAMPLES
        .get(column.declared_type.as_str())
        .cloned()
        .unwrap_or_else(|| json!({}))
}

type Record = IndexMap<String, Value>;

fn record<'c>(columns: impl IntoIterator<Item = &'c Column>) -> Record {
    columns
        .into_iter()
        .map(|c| (c.wire_name(), sample(c)))
        .collect()
}

#[derive(Serialize)]
struct RequestBean<T> {
    timestamp: i64,
    data: T,
}

#[derive(Serialize)]
struct ResultBean<T> {
    code: u16,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Serialize)]
struct PageResult<T> {
    count: usize,
    list: Vec<T>,
}

fn request<T>(data: T) -> RequestBean<T> {
    RequestBean {
        timestamp: SAMPLE_TIMESTAMP,
        data,
    }
}

fn response<T>(data: Option<T>) -> ResultBean<T> {
    ResultBean {
        code: 200,
        message: "success",
        data,
    }
}

pub(super) fn emit(tables: &[Table], options: &GenerationOptions) -> CodegenResult<String> {
    let mut doc = String::from("# Application Document\n\n");
    if let Some(banner) = banner_text(options) {
        doc.push_str(&format!("> {banner}\n\n"));
    }
    doc.push_str("```shell\nHOST=127.0.0.1\nPORT=8080\n```\n\n");

    for table in tables {
        doc.push_str(&table_section(table)?);
    }

    while doc.ends_with("\n\n") {
        doc.pop();
    }
    Ok(doc)
}

fn table_section(table: &Table) -> CodegenResult<String> {
    let mut doc = format!("## {}\n\n", table.model_name());
    if let Some(comment) = &table.comment {
        doc.push_str(&format!("{}\n\n", one_line(comment)));
    }
    doc.push_str(&fields(table));

    let full = record(&table.columns);
    let keys = ResolvedKeys::resolve(table);
    let key = record(keys.primary_group().unwrap_or_default().iter().copied());

    for operation in Operation::for_table(table) {
        let path = operation.path(table);
        let method = operation.method();
        doc.push_str(&format!("### {}\n\n`{method} {path}`\n\n", title(operation)));

        let example = match operation {
            Operation::Create => {
                let data = record(table.columns.iter().filter(|c| !c.is_generated_on_insert()));
                Example::new(&request(data), &response(Some(&full)))?
            }
            Operation::Update => Example::new(&request(&full), &response(Some(&full)))?,
            Operation::QueryMany => {
                let mut filter = full.clone();
                filter.insert("page".to_string(), json!(1));
                filter.insert("size".to_string(), json!(10));
                let page = PageResult {
                    count: 1,
                    list: vec![&full],
                };
                Example::new(&request(filter), &response(Some(page)))?
            }
            Operation::Query => Example::new(&request(&key), &response(Some(&full)))?,
            Operation::Delete => Example::new(&request(&key), &response(None::<Record>))?,
        };
        doc.push_str(&example.render(method, &path));
    }

    Ok(doc)
}

/// Wire names padded to a column, each with its comment.
fn fields(table: &Table) -> String {
    let names: Vec<String> = table.columns.iter().map(Column::wire_name).collect();
    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

    let mut doc = String::from("### Fields\n\n```text\n");
    for (name, column) in names.iter().zip(&table.columns) {
        let description = column
            .comment
            .as_deref()
            .map(one_line)
            .unwrap_or_else(|| column.name.to_string());
        doc.push_str(&format!("{name:<width$} : {description}\n"));
    }
    doc.push_str("```\n\n");
    doc
}

fn title(operation: Operation) -> &'static str {
    match operation {
        Operation::Create => "Create",
        Operation::Update => "Update",
        Operation::QueryMany => "Query Many",
        Operation::Query => "Query One",
        Operation::Delete => "Delete",
    }
}

/// Serialized bodies of one operation.
struct Example {
    request: String,
    compact_request: String,
    response: String,
}

impl Example {
    fn new(request: &impl Serialize, response: &impl Serialize) -> CodegenResult<Self> {
        Ok(Self {
            request: serde_json::to_string_pretty(request)?,
            compact_request: serde_json::to_string(request)?,
            response: serde_json::to_string_pretty(response)?,
        })
    }

    fn render(&self, method: &str, path: &str) -> String {
        format!(
            "Request:\n\n```json\n{}\n```\n\nResponse:\n\n```json\n{}\n```\n\nExample:\n\n```shell\ncurl -X {method} \"http://$HOST:$PORT{path}\" -H \"Content-Type: application/json\" -d '{}'\n```\n\n",
            self.request, self.response, self.compact_request
        )
    }
}
