//! Emitters for Go models, data access functions, routers, services and
//! the Markdown API document.
//!
//! Every emitter is a pure function of the parsed tables and the
//! [`GenerationOptions`]. With the banner disabled the output is
//! byte-for-byte reproducible.

mod crud;
mod doc;
mod model;
mod router;
mod service;

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, warn};

use ddlgen_schema::{Column, ResolvedKeys, Table};

use crate::error::CodegenResult;
use crate::options::{GenerationOptions, LogicalDelete, Targets};

/// Package of the generated HTTP handlers.
pub const ROUTER_PACKAGE: &str = "router";

/// Package of the generated service layer.
pub const SERVICE_PACKAGE: &str = "service";

/// File name of the generated API document.
pub const DOC_FILE_NAME: &str = "document.md";

/// An artifact kind. Each one renders a single file for all tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Record types.
    Model,
    /// Data access functions.
    Crud,
    /// gin handlers.
    Router,
    /// Service layer.
    Service,
    /// Markdown API document.
    Doc,
}

impl Target {
    /// Every target, in rendering order.
    pub const ALL: [Target; 5] = [
        Target::Model,
        Target::Crud,
        Target::Router,
        Target::Service,
        Target::Doc,
    ];

    /// The targets switched on in `targets`.
    pub fn enabled(targets: &Targets) -> Vec<Target> {
        Self::ALL
            .into_iter()
            .filter(|target| match target {
                Target::Model => targets.model,
                Target::Crud => targets.crud,
                Target::Router => targets.router,
                Target::Service => targets.service,
                Target::Doc => targets.doc,
            })
            .collect()
    }

    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Target::Model => "model",
            Target::Crud => "crud",
            Target::Router => "router",
            Target::Service => "service",
            Target::Doc => "doc",
        }
    }

    /// Directory of the artifact, relative to the output root.
    pub fn dir(&self, options: &GenerationOptions) -> Option<String> {
        match self {
            Target::Model | Target::Crud => Some(options.package.clone()),
            Target::Router => Some(ROUTER_PACKAGE.to_string()),
            Target::Service => Some(SERVICE_PACKAGE.to_string()),
            Target::Doc => None,
        }
    }

    /// File name of the artifact.
    pub fn file_name(&self, options: &GenerationOptions) -> String {
        match self {
            Target::Model => format!("{}.go", options.package),
            Target::Crud => format!("{}_crud.go", options.package),
            Target::Router => format!("{ROUTER_PACKAGE}.go"),
            Target::Service => format!("{}.go", options.service_name),
            Target::Doc => DOC_FILE_NAME.to_string(),
        }
    }

    /// Path of the artifact, relative to the output root.
    pub fn path(&self, options: &GenerationOptions) -> PathBuf {
        let file_name = self.file_name(options);
        match self.dir(options) {
            Some(dir) => PathBuf::from(dir).join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Render this target for a set of tables.
    pub fn emit(&self, tables: &[Table], options: &GenerationOptions) -> CodegenResult<String> {
        debug!(target_name = self.name(), tables = tables.len(), "rendering target");
        match self {
            Target::Model => Ok(model::emit(tables, options)),
            Target::Crud => Ok(crud::emit(tables, options)),
            Target::Router => Ok(router::emit(tables, options)),
            Target::Service => Ok(service::emit(tables, options)),
            Target::Doc => doc::emit(tables, options),
        }
    }

    /// Render this target for a single table.
    pub fn emit_table(&self, table: &Table, options: &GenerationOptions) -> CodegenResult<String> {
        self.emit(std::slice::from_ref(table), options)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The target that produced it.
    pub target: Target,
    /// Path relative to the output root.
    pub path: PathBuf,
    /// File contents.
    pub content: String,
}

/// Render every enabled target.
pub fn generate(tables: &[Table], options: &GenerationOptions) -> CodegenResult<Vec<Artifact>> {
    Target::enabled(&options.targets)
        .into_iter()
        .map(|target| {
            Ok(Artifact {
                target,
                path: target.path(options),
                content: target.emit(tables, options)?,
            })
        })
        .collect()
}

/// A service operation exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Create,
    Update,
    QueryMany,
    Query,
    Delete,
}

impl Operation {
    /// Operations of a table, in route order.
    ///
    /// Update, get and delete address a single row and need a primary group.
    pub(crate) fn for_table(table: &Table) -> Vec<Operation> {
        if ResolvedKeys::resolve(table).primary_group().is_some() {
            vec![
                Operation::Create,
                Operation::Update,
                Operation::QueryMany,
                Operation::Query,
                Operation::Delete,
            ]
        } else {
            vec![Operation::Create, Operation::QueryMany]
        }
    }

    /// Prefix of the handler and service method names.
    pub(crate) fn prefix(&self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::QueryMany => "QueryMany",
            Operation::Query => "Query",
            Operation::Delete => "Delete",
        }
    }

    pub(crate) fn method(&self) -> &'static str {
        match self {
            Operation::Create | Operation::QueryMany | Operation::Query => "POST",
            Operation::Update => "PUT",
            Operation::Delete => "DELETE",
        }
    }

    /// Route path below `/api/<model>`.
    pub(crate) fn path(&self, table: &Table) -> String {
        let base = format!("/api/{}", table.route_name());
        match self {
            Operation::QueryMany => format!("{base}/many"),
            Operation::Query => format!("{base}/one"),
            _ => base,
        }
    }
}

/// The generation banner line, when enabled.
pub(crate) fn banner_text(options: &GenerationOptions) -> Option<String> {
    options.banner.then(|| {
        format!(
            "Auto Generate by ddlgen {} on {}.",
            env!("CARGO_PKG_VERSION"),
            chrono::Local::now().format("%Y/%m/%d")
        )
    })
}

/// A Go source file under construction.
pub(crate) struct GoFile {
    package: String,
    banner: Option<String>,
    imports: BTreeSet<String>,
    body: String,
}

impl GoFile {
    pub(crate) fn new(package: impl Into<String>, options: &GenerationOptions) -> Self {
        Self {
            package: package.into(),
            banner: banner_text(options),
            imports: BTreeSet::new(),
            body: String::new(),
        }
    }

    pub(crate) fn import(&mut self, path: impl Into<String>) {
        self.imports.insert(path.into());
    }

    pub(crate) fn push_str(&mut self, code: &str) {
        self.body.push_str(code);
    }

    /// Start the section of one model.
    pub(crate) fn section(&mut self, title: &str) {
        self.body
            .push_str(&format!("// ==================== {title} ====================\n\n"));
    }

    /// Assemble the file: banner, package clause, imports and body.
    ///
    /// Standard library imports come first, then everything else.
    pub(crate) fn render(self) -> String {
        let mut code = String::new();

        if let Some(banner) = &self.banner {
            code.push_str(&format!("/**\n * {banner}\n */\n"));
        }
        code.push_str(&format!("package {}\n\n", self.package));

        let (std, third_party): (Vec<&String>, Vec<&String>) =
            self.imports.iter().partition(|path| is_std_import(path));
        if !self.imports.is_empty() {
            code.push_str("import (\n");
            for path in &std {
                code.push_str(&format!("\t\"{path}\"\n"));
            }
            if !std.is_empty() && !third_party.is_empty() {
                code.push('\n');
            }
            for path in &third_party {
                code.push_str(&format!("\t\"{path}\"\n"));
            }
            code.push_str(")\n\n");
        }

        code.push_str(&self.body);
        while code.ends_with("\n\n") {
            code.pop();
        }
        code
    }
}

/// Standard library paths have no dot in their first element.
fn is_std_import(path: &str) -> bool {
    !path.split('/').next().unwrap_or_default().contains('.')
}

/// Resolve the logical delete column of a table.
pub(crate) fn logical_delete<'t, 'o>(
    table: &'t Table,
    options: &'o GenerationOptions,
) -> Option<(&'t Column, &'o LogicalDelete)> {
    let logic = options.logical_delete.as_ref()?;
    match table.column(&logic.column) {
        Some(column) => Some((column, logic)),
        None => {
            debug!(table = %table.name, column = %logic.column, "no logical delete column");
            None
        }
    }
}

/// Resolve configured order-by names against a table's columns.
pub(crate) fn order_columns<'t>(table: &'t Table, names: &[String]) -> Vec<&'t Column> {
    names
        .iter()
        .filter_map(|name| {
            let column = table.column(name);
            if column.is_none() {
                warn!(table = %table.name, column = %name, "order-by column not found");
            }
            column
        })
        .collect()
}

/// The SQL spelling of a quoted identifier.
pub(crate) fn quoted(name: &str) -> String {
    format!("`{name}`")
}

/// Collapse a comment onto one line.
pub(crate) fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Targets;
    use pretty_assertions::assert_eq;

    fn quiet() -> GenerationOptions {
        GenerationOptions::default().with_banner(false)
    }

    #[test]
    fn test_enabled_targets() {
        assert_eq!(Target::enabled(&Targets::default()), vec![Target::Model, Target::Crud]);
        assert_eq!(Target::enabled(&Targets::all()).len(), 5);
        assert!(Target::enabled(&Targets::none()).is_empty());
    }

    #[test]
    fn test_target_paths() {
        let options = GenerationOptions::new("entity").with_service_name("shop");
        assert_eq!(Target::Model.path(&options), PathBuf::from("entity/entity.go"));
        assert_eq!(Target::Crud.path(&options), PathBuf::from("entity/entity_crud.go"));
        assert_eq!(Target::Router.path(&options), PathBuf::from("router/router.go"));
        assert_eq!(Target::Service.path(&options), PathBuf::from("service/shop.go"));
        assert_eq!(Target::Doc.path(&options), PathBuf::from("document.md"));
    }

    #[test]
    fn test_go_file_groups_imports() {
        let mut file = GoFile::new("router", &quiet());
        file.import("github.com/gin-gonic/gin");
        file.import("net/http");
        file.import("log");
        file.push_str("var x = 1\n\n");

        assert_eq!(
            file.render(),
            "package router\n\nimport (\n\t\"log\"\n\t\"net/http\"\n\n\t\"github.com/gin-gonic/gin\"\n)\n\nvar x = 1\n"
        );
    }

    #[test]
    fn test_go_file_without_imports() {
        let mut file = GoFile::new("model", &quiet());
        file.push_str("type A struct{}\n");
        assert_eq!(file.render(), "package model\n\ntype A struct{}\n");
    }

    #[test]
    fn test_go_file_banner() {
        let file = GoFile::new("model", &GenerationOptions::default());
        let code = file.render();
        assert!(code.starts_with("/**\n * Auto Generate by ddlgen "));
        assert!(code.contains("package model"));
    }

    #[test]
    fn test_section_header() {
        let mut file = GoFile::new("model", &quiet());
        file.section("TbDept");
        assert!(file.render().contains("// ==================== TbDept ===================="));
    }

    #[test]
    fn test_std_import_detection() {
        assert!(is_std_import("database/sql"));
        assert!(!is_std_import("gorm.io/gorm"));
        assert!(!is_std_import("github.com/acme/shop/model"));
    }

    #[test]
    fn test_order_columns_skip_unknown() {
        let table = Table::new("t")
            .with_column(Column::new("a", "INT"))
            .with_column(Column::new("b", "INT"));
        let names = vec!["B".to_string(), "missing".to_string(), "`a`".to_string()];
        let columns: Vec<&str> = order_columns(&table, &names)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(columns, vec!["b", "a"]);
    }

    #[test]
    fn test_operations_with_primary_key() {
        let table = Table::new("tb_dept")
            .with_column(Column::new("id", "INT"))
            .with_key(ddlgen_schema::KeyKind::Primary, &["id"]);
        let routes: Vec<String> = Operation::for_table(&table)
            .iter()
            .map(|op| format!("{} {} {}", op.method(), op.path(&table), op.prefix()))
            .collect();
        assert_eq!(
            routes,
            vec![
                "POST /api/tb-dept Create",
                "PUT /api/tb-dept Update",
                "POST /api/tb-dept/many QueryMany",
                "POST /api/tb-dept/one Query",
                "DELETE /api/tb-dept Delete",
            ]
        );
    }

    #[test]
    fn test_operations_without_primary_key() {
        let table = Table::new("tb_log").with_column(Column::new("msg", "TEXT"));
        assert_eq!(
            Operation::for_table(&table),
            vec![Operation::Create, Operation::QueryMany]
        );
    }

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("first\n  second\tthird"), "first second third");
    }

    #[test]
    fn test_generate_renders_enabled_targets() {
        let table = Table::new("tb_dept").with_column(Column::new("id", "INT"));
        let options = quiet().with_targets(Targets::all());
        let artifacts = generate(&[table], &options).unwrap();
        let targets: Vec<Target> = artifacts.iter().map(|a| a.target).collect();
        assert_eq!(targets, Target::ALL.to_vec());
        assert!(artifacts.iter().all(|a| !a.content.is_empty()));
    }
}
