//! Record types, one struct per table.

use ddlgen_schema::{Column, ResolvedKeys, Table};

use super::{GoFile, one_line};
use crate::options::{DataAccessStyle, GenerationOptions};
use crate::types::{
    column_to_go_type, format_arg, format_verb, go_string, is_pointer, uses_time,
};

pub(super) fn emit(tables: &[Table], options: &GenerationOptions) -> String {
    let mut file = GoFile::new(&options.package, options);

    if !tables.is_empty() {
        file.import("fmt");
    }
    if tables.iter().any(|t| uses_time(&t.columns)) {
        file.import("time");
    }

    for table in tables {
        file.section(&table.model_name());
        file.push_str(&model_struct(table, options));
        if options.style == DataAccessStyle::Orm {
            file.push_str(&table_name_method(table));
        }
        file.push_str(&string_method(table));
    }

    if tables.iter().flat_map(|t| &t.columns).any(is_pointer) {
        file.push_str(DEREF_HELPER);
    }

    file.render()
}

const DEREF_HELPER: &str = "\
func deref[T any](p *T) interface{} {
\tif p == nil {
\t\treturn nil
\t}
\treturn *p
}

";

fn model_struct(table: &Table, options: &GenerationOptions) -> String {
    let name = table.model_name();
    let keys = ResolvedKeys::resolve(table);
    let primary = keys.primary_group().unwrap_or_default();

    let mut code = String::new();
    match &table.comment {
        Some(comment) => code.push_str(&format!("// {name} {}\n", one_line(comment))),
        None => code.push_str(&format!("// {name} maps table {}.\n", table.name)),
    }
    code.push_str(&format!("type {name} struct {{\n"));

    for column in &table.columns {
        let is_key = primary.iter().any(|c| c.name == column.name);
        code.push_str(&format!(
            "\t{} {} `{}`",
            column.field_name(),
            column_to_go_type(column),
            field_tag(column, is_key, options.style)
        ));
        if let Some(comment) = &column.comment {
            code.push_str(&format!(" // {}", one_line(comment)));
        }
        code.push('\n');
    }

    code.push_str("}\n\n");
    code
}

/// Struct tag: the wire name, plus storage metadata for gorm.
fn field_tag(column: &Column, is_key: bool, style: DataAccessStyle) -> String {
    let wire = column.wire_name();
    let json = format!("json:\"{wire}\" form:\"{wire}\"");
    if style == DataAccessStyle::Plain {
        return json;
    }

    let mut gorm = vec![format!("column:{}", column.name)];
    if is_key {
        gorm.push("primaryKey".to_string());
    }
    if column.flags.is_auto_increment {
        gorm.push("autoIncrement".to_string());
    }
    if column.flags.is_not_null {
        gorm.push("not null".to_string());
    }
    if let Some(default) = column.default.as_ref().filter(|_| column.has_literal_default()) {
        gorm.push(format!("default:{}", default.replace('`', "")));
    }
    format!("{json} gorm:\"{}\"", gorm.join(";"))
}

fn table_name_method(table: &Table) -> String {
    format!(
        "func (*{}) TableName() string {{\n\treturn {}\n}}\n\n",
        table.model_name(),
        go_string(&table.name)
    )
}

fn string_method(table: &Table) -> String {
    let name = table.model_name();
    let fields: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{}: {}", c.field_name(), format_verb(c)))
        .collect();
    let args: String = table
        .columns
        .iter()
        .map(|c| format!(", {}", format_arg(c, &format!("s.{}", c.field_name()))))
        .collect();

    let mut code = format!("func (s *{name}) String() string {{\n");
    code.push_str("\tif s == nil {\n\t\treturn \"<nil>\"\n\t}\n");
    code.push_str(&format!(
        "\treturn fmt.Sprintf(\"{name}{{{}}}\"{args})\n",
        fields.join(", ")
    ));
    code.push_str("}\n\n");
    code
}
