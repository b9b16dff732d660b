//! Service layer between the handlers and the data access code.

use ddlgen_schema::{Column, ResolvedKeys, Table, TypeCategory, group_suffix};
use tracing::debug;

use super::{GoFile, Operation, SERVICE_PACKAGE, logical_delete};
use crate::options::{CallingConvention, DataAccessStyle, GenerationOptions, go_literal};
use crate::types::{go_string, is_pointer};

pub(super) fn emit(tables: &[Table], options: &GenerationOptions) -> String {
    let mut file = GoFile::new(SERVICE_PACKAGE, options);
    let service = options.service_type();

    if !tables.is_empty() {
        let package = &options.package;
        file.import(options.import_path(package).unwrap_or_else(|| {
            debug!(package = %package, "no module configured, importing package by name");
            package.clone()
        }));
    }

    match options.style {
        DataAccessStyle::Plain => {
            file.import("database/sql");
            file.push_str(&format!(
                "// {service} serves the generated models over database/sql.\ntype {service} struct {{\n\tDB *sql.DB\n}}\n\n"
            ));
        }
        DataAccessStyle::Orm => {
            file.import("gorm.io/gorm");
            if tables
                .iter()
                .any(|t| ResolvedKeys::resolve(t).primary_group().is_some())
            {
                file.import("errors");
            }
            file.push_str(&format!(
                "// {service} serves the generated models through gorm.\ntype {service} struct {{\n\tDB *gorm.DB\n}}\n\n"
            ));
            if options.convention == CallingConvention::Panic {
                file.push_str(
                    "func assertErrorNil(err error) {\n\tif err != nil {\n\t\tpanic(err)\n\t}\n}\n\n",
                );
            }
        }
    }

    for table in tables {
        file.section(&table.model_name());
        let methods = Methods::new(table, options);
        for operation in Operation::for_table(table) {
            file.push_str(&methods.render(operation));
        }
    }

    file.render()
}

struct Methods<'a> {
    table: &'a Table,
    options: &'a GenerationOptions,
    convention: CallingConvention,
    primary: Vec<&'a Column>,
    service: String,
    model: String,
    record: String,
}

impl<'a> Methods<'a> {
    fn new(table: &'a Table, options: &'a GenerationOptions) -> Self {
        let model = table.model_name();
        Self {
            table,
            options,
            convention: options.convention,
            primary: ResolvedKeys::resolve(table)
                .primary_group()
                .map(|group| group.to_vec())
                .unwrap_or_default(),
            service: options.service_type(),
            record: format!("{}.{model}", options.package),
            model,
        }
    }

    fn render(&self, operation: Operation) -> String {
        let Self { service, model, record, .. } = self;
        let prefix = operation.prefix();
        let (params, results) = match operation {
            Operation::QueryMany => (
                format!("s *{record}, page int, size int"),
                vec!["int".to_string(), format!("[]*{record}")],
            ),
            Operation::Query => (format!("s *{record}"), vec![format!("*{record}")]),
            _ => (format!("s *{record}"), Vec::new()),
        };
        let results: Vec<&str> = results.iter().map(String::as_str).collect();

        let mut code = format!(
            "func (p *{service}) {prefix}{model}({params}){} {{\n",
            self.convention.results(&results)
        );
        code.push_str(&match (self.options.style, operation) {
            (DataAccessStyle::Plain, Operation::Create) => self.plain_create(),
            (DataAccessStyle::Plain, Operation::QueryMany) => format!(
                "\treturn {}.QueryMany{model}(p.DB, s, page, size)\n",
                self.options.package
            ),
            (DataAccessStyle::Plain, Operation::Query) => format!(
                "\treturn {}.Query{model}By{}(p.DB, s)\n",
                self.options.package,
                group_suffix(&self.primary)
            ),
            (DataAccessStyle::Plain, _) => self.plain_exec(operation),
            (DataAccessStyle::Orm, Operation::Create) => {
                self.convention.forward("\t", &[], "p.DB.Create(s).Error")
            }
            (DataAccessStyle::Orm, Operation::Update) => {
                self.convention.forward("\t", &[], "p.DB.Model(s).Updates(s).Error")
            }
            (DataAccessStyle::Orm, Operation::QueryMany) => self.orm_query_many(),
            (DataAccessStyle::Orm, Operation::Query) => self.orm_query_one(),
            (DataAccessStyle::Orm, Operation::Delete) => self.orm_delete(),
        });
        code.push_str("}\n\n");
        code
    }

    /// Insert, then copy the generated id back into the record.
    fn plain_create(&self) -> String {
        let call = format!("{}.Create{}(p.DB, s)", self.options.package, self.model);
        let assign = self
            .table
            .columns
            .iter()
            .find(|c| c.flags.is_auto_increment)
            .and_then(assign_id);

        match (self.convention, assign) {
            (CallingConvention::ErrorReturn, Some(assign)) => format!(
                "\tid, err := {call}\n\tif err != nil {{\n\t\treturn err\n\t}}\n{assign}\treturn nil\n"
            ),
            (CallingConvention::ErrorReturn, None) => format!("\t_, err := {call}\n\treturn err\n"),
            (CallingConvention::Panic, Some(assign)) => format!("\tid := {call}\n{assign}"),
            (CallingConvention::Panic, None) => format!("\t{call}\n"),
        }
    }

    /// Update or delete by the primary group, dropping the row count.
    fn plain_exec(&self, operation: Operation) -> String {
        let call = format!(
            "{}.{}{}By{}(p.DB, s)",
            self.options.package,
            operation.prefix(),
            self.model,
            group_suffix(&self.primary)
        );
        match self.convention {
            CallingConvention::ErrorReturn => format!("\t_, err := {call}\n\treturn err\n"),
            CallingConvention::Panic => format!("\t{call}\n"),
        }
    }

    fn orm_query_many(&self) -> String {
        let record = &self.record;
        let mut code = String::from("\tif page <= 0 {\n\t\tpage = 1\n\t}\n");
        code.push_str("\tif size <= 0 {\n\t\tsize = 10\n\t}\n");
        code.push_str("\tvar count int64\n");
        code.push_str(&self.convention.guard(
            "\t",
            "0, nil, ",
            &format!("p.DB.Model(&{record}{{}}).Where(s).Count(&count).Error"),
        ));
        code.push_str(&format!("\tvar list []*{record}\n"));
        code.push_str(&self.convention.guard(
            "\t",
            "0, nil, ",
            "p.DB.Where(s).Offset((page - 1) * size).Limit(size).Find(&list).Error",
        ));
        code.push_str(&self.convention.ok("\t", &["int(count)", "list"]));
        code
    }

    fn orm_query_one(&self) -> String {
        let record = &self.record;
        let mut code = format!("\tm := &{record}{{}}\n");
        code.push_str(&format!(
            "\terr := p.DB.Where({}).Take(m).Error\n",
            self.key_struct()
        ));
        code.push_str("\tif errors.Is(err, gorm.ErrRecordNotFound) {\n");
        code.push_str(&self.convention.ok("\t\t", &["nil"]));
        code.push_str("\t}\n");
        code.push_str(&self.convention.check("\t", "nil, "));
        code.push_str(&self.convention.ok("\t", &["m"]));
        code
    }

    fn orm_delete(&self) -> String {
        let record = &self.record;
        let call = match logical_delete(self.table, self.options) {
            Some((column, logic)) => format!(
                "p.DB.Model(&{record}{{}}).Where({}).Update({}, {}).Error",
                self.key_struct(),
                go_string(&column.name),
                go_literal(&logic.sql_literal(column))
            ),
            None => format!(
                "p.DB.Where({}).Delete(&{record}{{}}).Error",
                self.key_struct()
            ),
        };
        self.convention.forward("\t", &[], &call)
    }

    /// A record holding only the primary group, used as a gorm condition.
    fn key_struct(&self) -> String {
        let fields: Vec<String> = self
            .primary
            .iter()
            .map(|c| format!("{0}: s.{0}", c.field_name()))
            .collect();
        format!("&{}{{{}}}", self.record, fields.join(", "))
    }
}

/// Statement storing the inserted id, if the column can hold it.
fn assign_id(column: &Column) -> Option<String> {
    let field = column.field_name();
    let value = match column.category() {
        TypeCategory::Int32 => "int32(id)",
        TypeCategory::Int64 => "id",
        _ => return None,
    };
    Some(if is_pointer(column) {
        format!("\tv := {value}\n\ts.{field} = &v\n")
    } else {
        format!("\ts.{field} = {value}\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LogicalDelete;
    use ddlgen_schema::{ColumnFlags, KeyKind};
    use pretty_assertions::assert_eq;

    fn dept() -> Table {
        Table::new("tb_dept")
            .with_column(Column::new("id", "INT").with_flags(ColumnFlags {
                is_primary: true,
                is_auto_increment: true,
                ..Default::default()
            }))
            .with_column(Column::new("name", "VARCHAR"))
    }

    fn quiet() -> GenerationOptions {
        GenerationOptions::default()
            .with_banner(false)
            .with_module("github.com/acme/shop")
    }

    #[test]
    fn test_plain_service() {
        let code = emit(&[dept()], &quiet());
        assert_eq!(
            code,
            "package service

import (
\t\"database/sql\"

\t\"github.com/acme/shop/model\"
)

// Service serves the generated models over database/sql.
type Service struct {
\tDB *sql.DB
}

// ==================== TbDept ====================

func (p *Service) CreateTbDept(s *model.TbDept) error {
\tid, err := model.CreateTbDept(p.DB, s)
\tif err != nil {
\t\treturn err
\t}
\ts.Id = int32(id)
\treturn nil
}

func (p *Service) UpdateTbDept(s *model.TbDept) error {
\t_, err := model.UpdateTbDeptById(p.DB, s)
\treturn err
}

func (p *Service) QueryManyTbDept(s *model.TbDept, page int, size int) (int, []*model.TbDept, error) {
\treturn model.QueryManyTbDept(p.DB, s, page, size)
}

func (p *Service) QueryTbDept(s *model.TbDept) (*model.TbDept, error) {
\treturn model.QueryTbDeptById(p.DB, s)
}

func (p *Service) DeleteTbDept(s *model.TbDept) error {
\t_, err := model.DeleteTbDeptById(p.DB, s)
\treturn err
}
"
        );
    }

    #[test]
    fn test_table_without_key_has_create_and_list_only() {
        let table = Table::new("tb_log").with_column(Column::new("msg", "TEXT"));
        let code = emit(&[table], &quiet());
        assert!(code.contains("func (p *Service) CreateTbLog("));
        assert!(code.contains("func (p *Service) QueryManyTbLog("));
        assert!(!code.contains("UpdateTbLog"));
        assert!(!code.contains("QueryTbLog("));
        assert!(!code.contains("DeleteTbLog"));
        assert!(code.contains("\t_, err := model.CreateTbLog(p.DB, s)\n\treturn err\n"));
    }

    #[test]
    fn test_composite_primary_group() {
        let table = Table::new("tb_member")
            .with_column(Column::new("org_id", "BIGINT"))
            .with_column(Column::new("user_id", "BIGINT"))
            .with_key(KeyKind::Primary, &["org_id", "user_id"]);
        let code = emit(&[table], &quiet());
        assert!(code.contains("model.QueryTbMemberByOrgIdUserId(p.DB, s)"));
    }

    #[test]
    fn test_panic_plain_service() {
        let options = quiet().with_convention(CallingConvention::Panic);
        let code = emit(&[dept()], &options);
        assert!(code.contains(
            "func (p *Service) CreateTbDept(s *model.TbDept) {\n\tid := model.CreateTbDept(p.DB, s)\n\ts.Id = int32(id)\n}\n"
        ));
        assert!(code.contains(
            "func (p *Service) QueryManyTbDept(s *model.TbDept, page int, size int) (int, []*model.TbDept) {"
        ));
        assert!(code.contains("\tmodel.DeleteTbDeptById(p.DB, s)\n"));
    }

    #[test]
    fn test_orm_service() {
        let options = quiet().with_style(DataAccessStyle::Orm);
        let code = emit(&[dept()], &options);

        assert!(code.contains("\tDB *gorm.DB\n"));
        assert!(code.contains("\t\"errors\"\n"));
        assert!(code.contains("\treturn p.DB.Create(s).Error\n"));
        assert!(code.contains("\treturn p.DB.Model(s).Updates(s).Error\n"));
        assert!(code.contains(
            "\tif err := p.DB.Model(&model.TbDept{}).Where(s).Count(&count).Error; err != nil {\n\t\treturn 0, nil, err\n\t}\n"
        ));
        assert!(code.contains("\treturn int(count), list, nil\n"));
        assert!(code.contains("\terr := p.DB.Where(&model.TbDept{Id: s.Id}).Take(m).Error\n"));
        assert!(code.contains("\tif errors.Is(err, gorm.ErrRecordNotFound) {\n\t\treturn nil, nil\n\t}\n"));
        assert!(code.contains(
            "\treturn p.DB.Where(&model.TbDept{Id: s.Id}).Delete(&model.TbDept{}).Error\n"
        ));
    }

    #[test]
    fn test_orm_logical_delete() {
        let table = dept().with_column(Column::new("deleted", "CHAR"));
        let options = quiet()
            .with_style(DataAccessStyle::Orm)
            .with_logical_delete(LogicalDelete::new("deleted", "1"));
        let code = emit(&[table], &options);
        assert!(code.contains(
            "\treturn p.DB.Model(&model.TbDept{}).Where(&model.TbDept{Id: s.Id}).Update(\"deleted\", \"1\").Error\n"
        ));
    }

    #[test]
    fn test_orm_panic_service() {
        let options = quiet()
            .with_style(DataAccessStyle::Orm)
            .with_convention(CallingConvention::Panic);
        let code = emit(&[dept()], &options);
        assert!(code.contains("func assertErrorNil(err error) {"));
        assert!(code.contains("\tassertErrorNil(p.DB.Create(s).Error)\n"));
        assert!(code.contains("\treturn int(count), list\n"));
    }

    #[test]
    fn test_assign_id() {
        let required = Column::new("id", "BIGINT").with_flags(ColumnFlags {
            is_not_null: true,
            ..Default::default()
        });
        assert_eq!(assign_id(&required).as_deref(), Some("\ts.Id = id\n"));
        assert_eq!(
            assign_id(&Column::new("id", "INT")).as_deref(),
            Some("\tv := int32(id)\n\ts.Id = &v\n")
        );
        assert!(assign_id(&Column::new("id", "VARCHAR")).is_none());
    }

    #[test]
    fn test_emit_is_deterministic() {
        let tables = [dept()];
        assert_eq!(emit(&tables, &quiet()), emit(&tables, &quiet()));
    }
}
