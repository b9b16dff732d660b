//! Data access functions over `database/sql`.
//!
//! Per table this renders a create function, update/get/delete functions
//! for every unique key group, a paginated list function for every index
//! group plus a generic one filtering on the supplied fields, and the order
//! variants of each list function.

use ddlgen_schema::{Column, ResolvedKeys, Table, TypeCategory, group_suffix};

use super::{GoFile, logical_delete, order_columns, quoted};
use crate::options::{CallingConvention, GenerationOptions, LogicalDelete, TimeRounding};
use crate::types::{go_string, is_pointer, supplied_test, uses_time};

const DEFAULT_PAGE_SIZE: u32 = 10;

pub(super) fn emit(tables: &[Table], options: &GenerationOptions) -> String {
    let mut file = GoFile::new(&options.package, options);
    file.import("database/sql");
    file.import("errors");
    file.import("strings");

    let rounding = options
        .rounding
        .filter(|_| tables.iter().any(|t| uses_time(&t.columns)));
    if rounding.is_some() {
        file.import("time");
    }

    file.push_str(&preamble(options.convention, rounding.is_some()));
    for table in tables {
        file.section(&table.model_name());
        file.push_str(&TableCrud::new(table, options, rounding).render());
    }

    file.render()
}

fn preamble(convention: CallingConvention, rounding: bool) -> String {
    let mut code = String::from(
        "\
// DataSource is implemented by *sql.DB and *sql.Tx.
type DataSource interface {
\tExec(query string, args ...any) (sql.Result, error)
\tQueryRow(query string, args ...any) *sql.Row
\tQuery(query string, args ...any) (*sql.Rows, error)
}

var (
\tErrNilPointer      = errors.New(\"pointer can not be nil\")
\tErrNothingToUpdate = errors.New(\"nothing to update\")
)

func placeholders(n int) string {
\tif n <= 0 {
\t\treturn \"\"
\t}
\treturn strings.Repeat(\"?, \", n-1) + \"?\"
}

func rowsAffected(result sql.Result, err error) (int64, error) {
\tif err != nil {
\t\treturn 0, err
\t}
\treturn result.RowsAffected()
}

",
    );

    if convention == CallingConvention::Panic {
        code.push_str(
            "\
func assertErrorNil(err error) {
\tif err != nil {
\t\tpanic(err)
\t}
}

",
        );
    }

    if rounding {
        code.push_str(
            "\
func truncateTime(t *time.Time, d time.Duration) *time.Time {
\tif t == nil {
\t\treturn nil
\t}
\tv := t.Truncate(d)
\treturn &v
}

",
        );
    }

    code
}

/// Renders the functions of one table.
struct TableCrud<'a> {
    table: &'a Table,
    keys: ResolvedKeys<'a>,
    options: &'a GenerationOptions,
    rounding: Option<TimeRounding>,
    convention: CallingConvention,
    model: String,
    private: String,
    from: String,
}

impl<'a> TableCrud<'a> {
    fn new(
        table: &'a Table,
        options: &'a GenerationOptions,
        rounding: Option<TimeRounding>,
    ) -> Self {
        let model = table.model_name();
        Self {
            table,
            keys: ResolvedKeys::resolve(table),
            options,
            rounding,
            convention: options.convention,
            private: lower_first(&model),
            model,
            from: quoted(&table.name),
        }
    }

    fn render(&self) -> String {
        let mut code = self.helpers();
        code.push_str(&self.create());

        for group in &self.keys.unique_groups {
            code.push_str(&self.update(group));
            code.push_str(&self.query_one(group));
        }

        for (suffix, order) in self.order_variants() {
            for group in &self.keys.index_groups {
                code.push_str(&self.query_many_by(group, &suffix, &order));
            }
            code.push_str(&self.query_many(&suffix, &order));
        }

        let logic = logical_delete(self.table, self.options);
        for group in &self.keys.unique_groups {
            match logic {
                Some((column, logic)) => code.push_str(&self.logical_delete(group, column, logic)),
                None => code.push_str(&self.delete(group)),
            }
        }

        code
    }

    /// Column list constant, row scanner and the shared list query.
    fn helpers(&self) -> String {
        let Self { model, private, from, .. } = self;
        let columns: Vec<String> = self.table.columns.iter().map(|c| quoted(&c.name)).collect();
        let targets: Vec<String> = self
            .table
            .columns
            .iter()
            .map(|c| format!("&m.{}", c.field_name()))
            .collect();

        let mut code = format!("const {private}Columns = {}\n\n", go_string(&columns.join(", ")));

        code.push_str(&format!(
            "func scan{model}(row interface{{ Scan(dest ...any) error }}) (*{model}, error) {{\n"
        ));
        code.push_str(&format!("\tm := &{model}{{}}\n"));
        code.push_str(&format!(
            "\tif err := row.Scan({}); err != nil {{\n\t\treturn nil, err\n\t}}\n",
            targets.join(", ")
        ));
        code.push_str("\treturn m, nil\n}\n\n");

        code.push_str(&format!(
            "func queryMany{model}(db DataSource, where string, order string, args []any, page int, size int) (int, []*{model}, error) {{\n"
        ));
        code.push_str("\tif page <= 0 {\n\t\tpage = 1\n\t}\n");
        code.push_str(&format!("\tif size <= 0 {{\n\t\tsize = {DEFAULT_PAGE_SIZE}\n\t}}\n"));
        code.push_str("\tvar count int\n");
        code.push_str(&format!(
            "\tif err := db.QueryRow({}+where, args...).Scan(&count); err != nil {{\n\t\treturn 0, nil, err\n\t}}\n",
            go_string(&format!("select count(*) from {from}"))
        ));
        code.push_str(&format!(
            "\trows, err := db.Query(\"select \"+{private}Columns+{}+where+order+\" limit ?, ?\", append(args, (page-1)*size, size)...)\n",
            go_string(&format!(" from {from}"))
        ));
        code.push_str("\tif err != nil {\n\t\treturn 0, nil, err\n\t}\n");
        code.push_str("\tdefer rows.Close()\n");
        code.push_str(&format!("\tlist := make([]*{model}, 0, size)\n"));
        code.push_str("\tfor rows.Next() {\n");
        code.push_str(&format!("\t\tm, err := scan{model}(rows)\n"));
        code.push_str("\t\tif err != nil {\n\t\t\treturn 0, nil, err\n\t\t}\n");
        code.push_str("\t\tlist = append(list, m)\n\t}\n");
        code.push_str("\treturn count, list, rows.Err()\n}\n\n");

        code
    }

    fn create(&self) -> String {
        let Self { model, from, .. } = self;
        let insertable: Vec<&Column> = self
            .table
            .columns
            .iter()
            .filter(|c| !c.is_generated_on_insert())
            .collect();
        let (optional, always): (Vec<&Column>, Vec<&Column>) =
            insertable.into_iter().partition(|c| c.has_literal_default());

        let mut code = format!("// Create{model} inserts a {model} and returns the generated id.\n");
        code.push_str(&format!(
            "func Create{model}(db DataSource, s *{model}){} {{\n",
            self.convention.results(&["int64"])
        ));
        code.push_str(&self.nil_guard("0, "));
        code.push_str(&format!(
            "\tcolumns := []string{{{}}}\n",
            always
                .iter()
                .map(|c| go_string(&quoted(&c.name)))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        code.push_str(&format!(
            "\targs := []any{{{}}}\n",
            always.iter().map(|c| self.arg(c)).collect::<Vec<_>>().join(", ")
        ));
        for column in optional {
            code.push_str(&self.append_if_supplied(column, "columns", &quoted(&column.name)));
        }
        code.push_str(&format!(
            "\tquery := {} + strings.Join(columns, \", \") + \") values (\" + placeholders(len(columns)) + \")\"\n",
            go_string(&format!("insert into {from} ("))
        ));
        code.push_str("\tresult, err := db.Exec(query, args...)\n");
        code.push_str(&self.convention.check("\t", "0, "));
        code.push_str(&self.convention.forward("\t", &["id"], "result.LastInsertId()"));
        code.push_str("}\n\n");
        code
    }

    fn update(&self, group: &[&Column]) -> String {
        let Self { model, from, .. } = self;
        let suffix = group_suffix(group);
        let updatable: Vec<&Column> = self
            .table
            .columns
            .iter()
            .filter(|c| !group.iter().any(|k| k.name == c.name))
            .filter(|c| !c.is_generated_on_insert() && !c.flags.is_on_update)
            .collect();

        let mut code = format!(
            "// Update{model}By{suffix} updates the supplied fields of the {model} matching {suffix}.\n"
        );
        code.push_str(&format!(
            "func Update{model}By{suffix}(db DataSource, s *{model}){} {{\n",
            self.convention.results(&["int64"])
        ));
        code.push_str(&self.nil_guard("0, "));
        code.push_str(&format!("\tsets := make([]string, 0, {})\n", updatable.len()));
        code.push_str(&format!(
            "\targs := make([]any, 0, {})\n",
            updatable.len() + group.len()
        ));
        for column in &updatable {
            code.push_str(&self.append_if_supplied(
                column,
                "sets",
                &format!("{} = ?", quoted(&column.name)),
            ));
        }
        code.push_str("\tif len(sets) == 0 {\n");
        code.push_str(&self.convention.fail("\t\t", "0, ", "ErrNothingToUpdate"));
        code.push_str("\t}\n");
        code.push_str(&format!("\targs = append(args, {})\n", self.group_args(group)));
        code.push_str(&format!(
            "\tquery := {} + strings.Join(sets, \", \") + {}\n",
            go_string(&format!("update {from} set ")),
            go_string(&format!(" where {}", where_clause(group)))
        ));
        code.push_str(
            &self
                .convention
                .forward("\t", &["rows"], "rowsAffected(db.Exec(query, args...))"),
        );
        code.push_str("}\n\n");
        code
    }

    fn query_one(&self, group: &[&Column]) -> String {
        let Self { model, private, from, .. } = self;
        let suffix = group_suffix(group);

        let mut code = format!(
            "// Query{model}By{suffix} returns the {model} matching {suffix}, or nil when there is none.\n"
        );
        code.push_str(&format!(
            "func Query{model}By{suffix}(db DataSource, s *{model}){} {{\n",
            self.convention.results(&[&format!("*{model}")])
        ));
        code.push_str(&self.nil_guard("nil, "));
        code.push_str(&format!(
            "\tquery := \"select \" + {private}Columns + {}\n",
            go_string(&format!(" from {from} where {}", where_clause(group)))
        ));
        code.push_str(&format!(
            "\tm, err := scan{model}(db.QueryRow(query, {}))\n",
            self.group_args(group)
        ));
        code.push_str("\tif errors.Is(err, sql.ErrNoRows) {\n");
        code.push_str(&self.convention.ok("\t\t", &["nil"]));
        code.push_str("\t}\n");
        code.push_str(&self.convention.check("\t", "nil, "));
        code.push_str(&self.convention.ok("\t", &["m"]));
        code.push_str("}\n\n");
        code
    }

    fn query_many_by(&self, group: &[&Column], order_suffix: &str, order: &str) -> String {
        let model = &self.model;
        let suffix = group_suffix(group);
        let name = format!("QueryMany{model}By{suffix}{order_suffix}");

        let mut code = format!("// {name} lists the {model} rows matching {suffix}, one page at a time.\n");
        code.push_str(&self.list_signature(&name));
        code.push_str(&self.nil_guard("0, nil, "));
        code.push_str(&format!(
            "\twhere := {}\n",
            go_string(&format!(" where {}", where_clause(group)))
        ));
        code.push_str(&format!("\targs := []any{{{}}}\n", self.group_args(group)));
        code.push_str(&self.list_tail(order));
        code
    }

    fn query_many(&self, order_suffix: &str, order: &str) -> String {
        let model = &self.model;
        let name = format!("QueryMany{model}{order_suffix}");
        let columns = &self.table.columns;

        let mut code = format!(
            "// {name} lists the {model} rows matching the supplied fields of s, one page at a time.\n"
        );
        code.push_str(&self.list_signature(&name));
        code.push_str(&format!("\tconditions := make([]string, 0, {})\n", columns.len()));
        code.push_str(&format!("\targs := make([]any, 0, {})\n", columns.len()));
        // A nil filter lists every row.
        code.push_str("\tif s != nil {\n");
        for column in columns {
            let check = self.append_if_supplied(
                column,
                "conditions",
                &format!("{} = ?", quoted(&column.name)),
            );
            for line in check.lines() {
                code.push('\t');
                code.push_str(line);
                code.push('\n');
            }
        }
        code.push_str("\t}\n");
        code.push_str("\twhere := \"\"\n");
        code.push_str("\tif len(conditions) > 0 {\n");
        code.push_str("\t\twhere = \" where \" + strings.Join(conditions, \" and \")\n");
        code.push_str("\t}\n");
        code.push_str(&self.list_tail(order));
        code
    }

    fn delete(&self, group: &[&Column]) -> String {
        let Self { model, from, .. } = self;
        let suffix = group_suffix(group);

        let mut code = format!("// Delete{model}By{suffix} deletes the {model} matching {suffix}.\n");
        code.push_str(&self.exec_by_group(
            &format!("Delete{model}By{suffix}"),
            &format!("delete from {from} where {}", where_clause(group)),
            group,
        ));
        code
    }

    fn logical_delete(&self, group: &[&Column], column: &Column, logic: &LogicalDelete) -> String {
        let Self { model, from, .. } = self;
        let suffix = group_suffix(group);
        let set = |value: &str| {
            format!(
                "update {from} set {} = {value} where {}",
                quoted(&column.name),
                where_clause(group)
            )
        };

        let mut code =
            format!("// Delete{model}By{suffix} marks the {model} matching {suffix} as deleted.\n");
        code.push_str(&self.exec_by_group(
            &format!("Delete{model}By{suffix}"),
            &set(&logic.sql_literal(column)),
            group,
        ));

        if let Some(undo) = logic.undo_sql_literal(column) {
            code.push_str(&format!(
                "// UnDelete{model}By{suffix} restores the {model} matching {suffix}.\n"
            ));
            code.push_str(&self.exec_by_group(
                &format!("UnDelete{model}By{suffix}"),
                &set(&undo),
                group,
            ));
        }
        code
    }

    fn exec_by_group(&self, name: &str, query: &str, group: &[&Column]) -> String {
        let model = &self.model;
        let mut code = format!(
            "func {name}(db DataSource, s *{model}){} {{\n",
            self.convention.results(&["int64"])
        );
        code.push_str(&self.nil_guard("0, "));
        code.push_str(&format!("\tquery := {}\n", go_string(query)));
        code.push_str(&self.convention.forward(
            "\t",
            &["rows"],
            &format!("rowsAffected(db.Exec(query, {}))", self.group_args(group)),
        ));
        code.push_str("}\n\n");
        code
    }

    fn list_signature(&self, name: &str) -> String {
        let model = &self.model;
        format!(
            "func {name}(db DataSource, s *{model}, page int, size int){} {{\n",
            self.convention
                .results(&["int", &format!("[]*{model}")])
        )
    }

    fn list_tail(&self, order: &str) -> String {
        let mut code = self.convention.forward(
            "\t",
            &["count", "list"],
            &format!(
                "queryMany{}(db, where, {}, args, page, size)",
                self.model,
                go_string(order)
            ),
        );
        code.push_str("}\n\n");
        code
    }

    /// Name suffixes and `order by` clauses of the list variants.
    fn order_variants(&self) -> Vec<(String, String)> {
        let mut variants = vec![(String::new(), String::new())];

        let asc = order_columns(self.table, &self.options.order_asc);
        if !asc.is_empty() {
            let clause: Vec<String> = asc.iter().map(|c| quoted(&c.name)).collect();
            variants.push((
                format!("OrderBy{}", group_suffix(&asc)),
                format!(" order by {}", clause.join(", ")),
            ));
        }

        let desc = order_columns(self.table, &self.options.order_desc);
        if !desc.is_empty() {
            let clause: Vec<String> = desc
                .iter()
                .map(|c| format!("{} desc", quoted(&c.name)))
                .collect();
            variants.push((
                format!("OrderBy{}Desc", group_suffix(&desc)),
                format!(" order by {}", clause.join(", ")),
            ));
        }

        variants
    }

    fn nil_guard(&self, zeros: &str) -> String {
        format!(
            "\tif s == nil {{\n{}\t}}\n",
            self.convention.fail("\t\t", zeros, "ErrNilPointer")
        )
    }

    /// Append `item` to `list` and the field to `args` when it was supplied.
    fn append_if_supplied(&self, column: &Column, list: &str, item: &str) -> String {
        format!(
            "\tif {} {{\n\t\t{list} = append({list}, {})\n\t\targs = append(args, {})\n\t}}\n",
            supplied_test(column, &format!("s.{}", column.field_name())),
            go_string(item),
            self.arg(column)
        )
    }

    /// The bind argument for a field, truncated when rounding applies.
    fn arg(&self, column: &Column) -> String {
        let field = format!("s.{}", column.field_name());
        match self.rounding {
            Some(unit) if column.category() == TypeCategory::Temporal => {
                if is_pointer(column) {
                    format!("truncateTime({field}, {})", unit.go_duration())
                } else {
                    format!("{field}.Truncate({})", unit.go_duration())
                }
            }
            _ => field,
        }
    }

    fn group_args(&self, group: &[&Column]) -> String {
        group
            .iter()
            .map(|c| self.arg(c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn where_clause(group: &[&Column]) -> String {
    group
        .iter()
        .map(|c| format!("{} = ?", quoted(&c.name)))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlgen_schema::{ColumnFlags, KeyKind};
    use pretty_assertions::assert_eq;

    fn dept() -> Table {
        Table::new("tb_dept")
            .with_column(Column::new("id", "INT").with_flags(ColumnFlags {
                is_auto_increment: true,
                ..Default::default()
            }))
            .with_column(Column::new("name", "VARCHAR"))
            .with_key(KeyKind::Primary, &["id"])
    }

    fn quiet() -> GenerationOptions {
        GenerationOptions::default().with_banner(false)
    }

    fn function<'c>(code: &'c str, name: &str) -> &'c str {
        let start = code
            .find(&format!("func {name}("))
            .unwrap_or_else(|| panic!("missing {name}"));
        let end = code[start..].find("\n}\n").map_or(code.len(), |i| start + i + 3);
        &code[start..end]
    }

    #[test]
    fn test_create_skips_auto_increment() {
        let code = emit(&[dept()], &quiet());
        assert_eq!(
            function(&code, "CreateTbDept"),
            "func CreateTbDept(db DataSource, s *TbDept) (int64, error) {
\tif s == nil {
\t\treturn 0, ErrNilPointer
\t}
\tcolumns := []string{\"`name`\"}
\targs := []any{s.Name}
\tquery := \"insert into `tb_dept` (\" + strings.Join(columns, \", \") + \") values (\" + placeholders(len(columns)) + \")\"
\tresult, err := db.Exec(query, args...)
\tif err != nil {
\t\treturn 0, err
\t}
\treturn result.LastInsertId()
}
"
        );
    }

    #[test]
    fn test_create_includes_defaulted_columns_when_supplied() {
        let table = dept().with_column(Column::new("status", "INT").with_default("1"));
        let code = emit(&[table], &quiet());
        let create = function(&code, "CreateTbDept");
        assert!(create.contains(
            "\tif s.Status != nil {\n\t\tcolumns = append(columns, \"`status`\")\n\t\targs = append(args, s.Status)\n\t}\n"
        ));
    }

    #[test]
    fn test_update_guards_against_empty_set() {
        let code = emit(&[dept()], &quiet());
        let update = function(&code, "UpdateTbDeptById");
        assert!(update.contains("\tif s.Name != nil {\n\t\tsets = append(sets, \"`name` = ?\")"));
        assert!(!update.contains("\"`id` = ?\")"));
        assert!(update.contains("\tif len(sets) == 0 {\n\t\treturn 0, ErrNothingToUpdate\n\t}\n"));
        assert!(update.contains("\targs = append(args, s.Id)\n"));
        assert!(update.contains("\" where `id` = ?\""));
    }

    #[test]
    fn test_query_one_returns_nil_when_missing() {
        let code = emit(&[dept()], &quiet());
        let query = function(&code, "QueryTbDeptById");
        assert!(query.starts_with("func QueryTbDeptById(db DataSource, s *TbDept) (*TbDept, error) {"));
        assert!(query.contains("\tif errors.Is(err, sql.ErrNoRows) {\n\t\treturn nil, nil\n\t}\n"));
        assert!(query.contains("\tm, err := scanTbDept(db.QueryRow(query, s.Id))\n"));
    }

    #[test]
    fn test_generic_list_without_index() {
        let code = emit(&[dept()], &quiet());
        assert!(code.contains(
            "func QueryManyTbDept(db DataSource, s *TbDept, page int, size int) (int, []*TbDept, error) {"
        ));
        assert!(!code.contains("func QueryManyTbDeptBy"));
        assert!(code.contains("\tif size <= 0 {\n\t\tsize = 10\n\t}\n"));
        assert!(code.contains("\tif page <= 0 {\n\t\tpage = 1\n\t}\n"));
    }

    #[test]
    fn test_generic_list_accepts_nil_filter() {
        let code = emit(&[dept()], &quiet());
        let list = function(&code, "QueryManyTbDept");
        assert!(!list.contains("ErrNilPointer"));
        assert!(!list.contains("if s == nil"));
        assert_eq!(
            list,
            "func QueryManyTbDept(db DataSource, s *TbDept, page int, size int) (int, []*TbDept, error) {
\tconditions := make([]string, 0, 2)
\targs := make([]any, 0, 2)
\tif s != nil {
\t\tif s.Id != nil {
\t\t\tconditions = append(conditions, \"`id` = ?\")
\t\t\targs = append(args, s.Id)
\t\t}
\t\tif s.Name != nil {
\t\t\tconditions = append(conditions, \"`name` = ?\")
\t\t\targs = append(args, s.Name)
\t\t}
\t}
\twhere := \"\"
\tif len(conditions) > 0 {
\t\twhere = \" where \" + strings.Join(conditions, \" and \")
\t}
\treturn queryManyTbDept(db, where, \"\", args, page, size)
}
"
        );

        let panics = emit(&[dept()], &quiet().with_convention(CallingConvention::Panic));
        let list = function(&panics, "QueryManyTbDept");
        assert!(!list.contains("ErrNilPointer"));
        assert!(list.contains("\tif s != nil {\n"));
    }

    #[test]
    fn test_literals_use_go_escapes() {
        let table = Table::new("tb\u{200b}dept").with_column(Column::new("na\0me", "VARCHAR"));
        let code = emit(&[table], &quiet());
        assert!(code.contains("\"insert into `tb\\u200bdept` (\""));
        assert!(code.contains("`na\\x00me`"));
        assert!(!code.contains("\\u{"));
        assert!(!code.contains("\\0"));
    }

    #[test]
    fn test_index_and_order_variants() {
        let table = dept()
            .with_column(Column::new("dept_no", "INT"))
            .with_key(KeyKind::Index, &["dept_no"]);
        let options = quiet()
            .with_order_asc(["name", "missing"])
            .with_order_desc(["ID"]);
        let code = emit(&[table], &options);

        for name in [
            "QueryManyTbDeptByDeptNo",
            "QueryManyTbDeptByDeptNoOrderByName",
            "QueryManyTbDeptByDeptNoOrderByIdDesc",
            "QueryManyTbDept",
            "QueryManyTbDeptOrderByName",
            "QueryManyTbDeptOrderByIdDesc",
        ] {
            assert!(code.contains(&format!("func {name}(")), "missing {name}");
        }
        let desc = function(&code, "QueryManyTbDeptOrderByIdDesc");
        assert!(desc.contains("\" order by `id` desc\""));
    }

    #[test]
    fn test_physical_delete() {
        let code = emit(&[dept()], &quiet());
        let delete = function(&code, "DeleteTbDeptById");
        assert!(delete.contains("\tquery := \"delete from `tb_dept` where `id` = ?\"\n"));
        assert!(delete.contains("\treturn rowsAffected(db.Exec(query, s.Id))\n"));
        assert!(!code.contains("UnDelete"));
    }

    #[test]
    fn test_logical_delete_with_undo() {
        let table = dept().with_column(Column::new("deleted", "TINYINT"));
        let options = quiet().with_logical_delete(LogicalDelete::new("deleted", "1"));
        let code = emit(&[table], &options);

        let delete = function(&code, "DeleteTbDeptById");
        assert!(delete.contains("\"update `tb_dept` set `deleted` = 1 where `id` = ?\""));
        let undo = function(&code, "UnDeleteTbDeptById");
        assert!(undo.contains("\"update `tb_dept` set `deleted` = 0 where `id` = ?\""));
    }

    #[test]
    fn test_logical_delete_on_text_column() {
        let table = dept().with_column(Column::new("deleted", "CHAR"));
        let options = quiet().with_logical_delete(LogicalDelete::new("deleted", "1"));
        let code = emit(&[table], &options);
        assert!(code.contains("set `deleted` = '0' where"));
    }

    #[test]
    fn test_logical_delete_without_undo() {
        let table = dept().with_column(Column::new("state", "INT"));
        let options = quiet().with_logical_delete(LogicalDelete::new("state", "9"));
        let code = emit(&[table], &options);
        assert!(code.contains("set `state` = 9 where"));
        assert!(!code.contains("UnDelete"));
    }

    #[test]
    fn test_logical_delete_column_missing_falls_back() {
        let options = quiet().with_logical_delete(LogicalDelete::new("deleted", "1"));
        let code = emit(&[dept()], &options);
        assert!(code.contains("delete from `tb_dept`"));
    }

    #[test]
    fn test_panic_convention() {
        let options = quiet().with_convention(CallingConvention::Panic);
        let code = emit(&[dept()], &options);

        assert!(code.contains("func assertErrorNil(err error) {"));
        let create = function(&code, "CreateTbDept");
        assert!(create.starts_with("func CreateTbDept(db DataSource, s *TbDept) int64 {"));
        assert!(create.contains("\t\tpanic(ErrNilPointer)\n"));
        assert!(create.contains("\tid, err := result.LastInsertId()\n\tassertErrorNil(err)\n\treturn id\n"));
        let update = function(&code, "UpdateTbDeptById");
        assert!(update.contains("\t\tpanic(ErrNothingToUpdate)\n"));
        let list = function(&code, "QueryManyTbDept");
        assert!(list.starts_with("func QueryManyTbDept(db DataSource, s *TbDept, page int, size int) (int, []*TbDept) {"));
    }

    #[test]
    fn test_time_rounding() {
        let table = dept()
            .with_column(Column::new("born", "DATE"))
            .with_column(Column::new("at", "DATETIME").with_flags(ColumnFlags {
                is_not_null: true,
                ..Default::default()
            }));
        let options = quiet().with_rounding(TimeRounding::Millisecond);
        let code = emit(&[table], &options);

        assert!(code.contains("\t\"time\"\n"));
        assert!(code.contains("func truncateTime("));
        assert!(code.contains("args = append(args, truncateTime(s.Born, time.Millisecond))"));
        assert!(code.contains("args = append(args, s.At.Truncate(time.Millisecond))"));
    }

    #[test]
    fn test_rounding_without_temporal_columns() {
        let options = quiet().with_rounding(TimeRounding::Second);
        let code = emit(&[dept()], &options);
        assert!(!code.contains("\"time\""));
        assert!(!code.contains("truncateTime"));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let tables = [dept()];
        let options = quiet().with_order_asc(["name"]);
        assert_eq!(emit(&tables, &options), emit(&tables, &options));
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("TbDept"), "tbDept");
        assert_eq!(lower_first(""), "");
    }
}
