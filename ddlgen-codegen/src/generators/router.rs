//! gin handlers delegating to the service layer.

use ddlgen_schema::Table;
use tracing::debug;

use super::{GoFile, Operation, ROUTER_PACKAGE, SERVICE_PACKAGE};
use crate::options::{CallingConvention, GenerationOptions};

pub(super) fn emit(tables: &[Table], options: &GenerationOptions) -> String {
    let convention = options.convention;
    let mut file = GoFile::new(ROUTER_PACKAGE, options);
    file.import("log");
    file.import("net/http");
    file.import("strings");
    file.import("github.com/gin-gonic/gin");
    if convention == CallingConvention::Panic {
        file.import("fmt");
    }
    if !tables.is_empty() {
        file.import(package_import(options, &options.package));
    }
    file.import(package_import(options, SERVICE_PACKAGE));

    file.push_str(PREAMBLE);
    if convention == CallingConvention::Panic {
        file.push_str(RECOVER_HELPER);
    }
    file.push_str(&router_type(tables, options));

    for table in tables {
        file.section(&table.model_name());
        let handlers = Handlers {
            model: table.model_name(),
            package: &options.package,
            convention,
        };
        for operation in Operation::for_table(table) {
            let code = match operation {
                Operation::Create => handlers.create(),
                Operation::Update => handlers.update(),
                Operation::QueryMany => handlers.query_many(),
                Operation::Query => handlers.query_one(),
                Operation::Delete => handlers.delete(),
            };
            file.push_str(&code);
        }
    }

    file.render()
}

fn package_import(options: &GenerationOptions, package: &str) -> String {
    options.import_path(package).unwrap_or_else(|| {
        debug!(package, "no module configured, importing package by name");
        package.to_string()
    })
}

const PREAMBLE: &str = "\
type RequestBean[T any] struct {
\tTimestamp int64 `json:\"timestamp\"`
\tData      T     `json:\"data\"`
}

type ResultBean struct {
\tCode    int    `json:\"code\"`
\tMessage string `json:\"message\"`
\tData    any    `json:\"data,omitempty\"`
}

type PageResult[T any] struct {
\tCount int `json:\"count\"`
\tList  []T `json:\"list\"`
}

func success(c *gin.Context, data any) {
\tc.JSON(http.StatusOK, ResultBean{Code: http.StatusOK, Message: \"success\", Data: data})
}

func fail(c *gin.Context, code int, message string) {
\tc.JSON(code, ResultBean{Code: code, Message: message})
}

";

const RECOVER_HELPER: &str = "\
func recoverWith(c *gin.Context) {
\tif r := recover(); r != nil {
\t\tlog.Printf(\"__LINE__ recovered: %v\", r)
\t\tfail(c, http.StatusInternalServerError, fmt.Sprint(r))
\t}
}

";

fn router_type(tables: &[Table], options: &GenerationOptions) -> String {
    let mut code = String::from("type Router struct {\n");
    code.push_str(&format!(
        "\tService *{SERVICE_PACKAGE}.{}\n}}\n\n",
        options.service_type()
    ));

    code.push_str("// Router maps \"METHOD path\" to the handler serving it.\n");
    code.push_str("func (r *Router) Router() map[string]gin.HandlerFunc {\n");
    code.push_str("\treturn map[string]gin.HandlerFunc{\n");
    for table in tables {
        let model = table.model_name();
        for operation in Operation::for_table(table) {
            code.push_str(&format!(
                "\t\t\"{} {}\": r.{}{model},\n",
                operation.method(),
                operation.path(table),
                operation.prefix()
            ));
        }
    }
    code.push_str("\t}\n}\n\n");

    code.push_str("// Register adds every route to routes.\n");
    code.push_str("func (r *Router) Register(routes gin.IRoutes) {\n");
    code.push_str("\tfor key, handler := range r.Router() {\n");
    code.push_str("\t\tmethod, path, _ := strings.Cut(key, \" \")\n");
    code.push_str("\t\troutes.Handle(method, path, handler)\n");
    code.push_str("\t}\n}\n\n");
    code
}

struct Handlers<'a> {
    model: String,
    package: &'a str,
    convention: CallingConvention,
}

impl Handlers<'_> {
    fn open(&self, name: &str) -> String {
        let mut code = format!("func (r *Router) {name}{}(c *gin.Context) {{\n", self.model);
        if self.convention == CallingConvention::Panic {
            code.push_str("\tdefer recoverWith(c)\n");
        }
        code
    }

    /// Decode the request envelope into `req`; reject bad or empty payloads.
    fn bind(&self, data_type: &str) -> String {
        format!(
            "\tvar req RequestBean[{data_type}]\n\
             \tif err := c.ShouldBindJSON(&req); err != nil || req.Data == nil {{\n\
             \t\tlog.Printf(\"__LINE__ bad request: %v\", err)\n\
             \t\tfail(c, http.StatusBadRequest, \"bad request\")\n\
             \t\treturn\n\
             \t}}\n"
        )
    }

    fn record(&self) -> String {
        format!("*{}.{}", self.package, self.model)
    }

    /// Call the service, answering 500 when it fails.
    ///
    /// `values` receive the results before the trailing error.
    fn call(&self, values: &[&str], call: &str, what: &str) -> String {
        match self.convention {
            CallingConvention::ErrorReturn => {
                let mut all: Vec<&str> = values.to_vec();
                all.push("err");
                format!(
                    "\t{} := {call}\n\
                     \tif err != nil {{\n\
                     \t\tlog.Printf(\"__LINE__ {what} {}: %v\", err)\n\
                     \t\tfail(c, http.StatusInternalServerError, err.Error())\n\
                     \t\treturn\n\
                     \t}}\n",
                    all.join(", "),
                    self.model
                )
            }
            CallingConvention::Panic if values.is_empty() => format!("\t{call}\n"),
            CallingConvention::Panic => format!("\t{} := {call}\n", values.join(", ")),
        }
    }

    fn create(&self) -> String {
        let model = &self.model;
        let mut code = self.open("Create");
        code.push_str(&self.bind(&self.record()));
        code.push_str(&self.call(&[], &format!("r.Service.Create{model}(req.Data)"), "create"));
        code.push_str("\tsuccess(c, req.Data)\n}\n\n");
        code
    }

    fn update(&self) -> String {
        let model = &self.model;
        let mut code = self.open("Update");
        code.push_str(&self.bind(&self.record()));
        code.push_str(&self.call(&[], &format!("r.Service.Update{model}(req.Data)"), "update"));
        code.push_str("\tsuccess(c, req.Data)\n}\n\n");
        code
    }

    fn query_many(&self) -> String {
        let Self { model, package, .. } = self;
        let mut code = self.open("QueryMany");
        code.push_str(&format!(
            "\ttype pageable struct {{\n\t\t*{package}.{model}\n\t\tPage int `json:\"page\"`\n\t\tSize int `json:\"size\"`\n\t}}\n"
        ));
        code.push_str(&self.bind("*pageable"));
        code.push_str(&format!("\tfilter := req.Data.{model}\n"));
        code.push_str(&format!(
            "\tif filter == nil {{\n\t\tfilter = &{package}.{model}{{}}\n\t}}\n"
        ));
        code.push_str(&self.call(
            &["count", "list"],
            &format!("r.Service.QueryMany{model}(filter, req.Data.Page, req.Data.Size)"),
            "list",
        ));
        code.push_str(&format!(
            "\tsuccess(c, PageResult[*{package}.{model}]{{Count: count, List: list}})\n}}\n\n"
        ));
        code
    }

    fn query_one(&self) -> String {
        let model = &self.model;
        let mut code = self.open("Query");
        code.push_str(&self.bind(&self.record()));
        code.push_str(&self.call(&["m"], &format!("r.Service.Query{model}(req.Data)"), "get"));
        code.push_str("\tsuccess(c, m)\n}\n\n");
        code
    }

    fn delete(&self) -> String {
        let model = &self.model;
        let mut code = self.open("Delete");
        code.push_str(&self.bind(&self.record()));
        code.push_str(&self.call(&[], &format!("r.Service.Delete{model}(req.Data)"), "delete"));
        code.push_str("\tsuccess(c, nil)\n}\n\n");
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlgen_schema::{Column, KeyKind};
    use pretty_assertions::assert_eq;

    fn dept() -> Table {
        Table::new("tb_dept")
            .with_column(Column::new("id", "INT"))
            .with_column(Column::new("name", "VARCHAR"))
            .with_key(KeyKind::Primary, &["id"])
    }

    fn quiet() -> GenerationOptions {
        GenerationOptions::default()
            .with_banner(false)
            .with_module("github.com/acme/shop")
    }

    #[test]
    fn test_imports_use_module() {
        let code = emit(&[dept()], &quiet());
        assert!(code.contains(
            "import (\n\t\"log\"\n\t\"net/http\"\n\t\"strings\"\n\n\t\"github.com/acme/shop/model\"\n\t\"github.com/acme/shop/service\"\n\t\"github.com/gin-gonic/gin\"\n)\n"
        ));
    }

    #[test]
    fn test_router_map() {
        let code = emit(&[dept()], &quiet());
        assert!(code.contains("\tService *service.Service\n"));
        assert!(code.contains("\t\t\"PUT /api/tb-dept\": r.UpdateTbDept,\n"));
        assert!(code.contains("\t\t\"POST /api/tb-dept/many\": r.QueryManyTbDept,\n"));
    }

    #[test]
    fn test_create_handler() {
        let code = emit(&[dept()], &quiet());
        assert!(code.contains(
            "func (r *Router) CreateTbDept(c *gin.Context) {
\tvar req RequestBean[*model.TbDept]
\tif err := c.ShouldBindJSON(&req); err != nil || req.Data == nil {
\t\tlog.Printf(\"__LINE__ bad request: %v\", err)
\t\tfail(c, http.StatusBadRequest, \"bad request\")
\t\treturn
\t}
\terr := r.Service.CreateTbDept(req.Data)
\tif err != nil {
\t\tlog.Printf(\"__LINE__ create TbDept: %v\", err)
\t\tfail(c, http.StatusInternalServerError, err.Error())
\t\treturn
\t}
\tsuccess(c, req.Data)
}
"
        ));
    }

    #[test]
    fn test_list_handler() {
        let code = emit(&[dept()], &quiet());
        assert!(code.contains("\ttype pageable struct {\n\t\t*model.TbDept\n"));
        assert!(code.contains("\tcount, list, err := r.Service.QueryManyTbDept(filter, req.Data.Page, req.Data.Size)\n"));
        assert!(code.contains("\tsuccess(c, PageResult[*model.TbDept]{Count: count, List: list})\n"));
    }

    #[test]
    fn test_panic_handlers_recover() {
        let options = quiet().with_convention(CallingConvention::Panic);
        let code = emit(&[dept()], &options);
        assert!(code.contains("func recoverWith(c *gin.Context) {"));
        assert!(code.contains("func (r *Router) QueryTbDept(c *gin.Context) {\n\tdefer recoverWith(c)\n"));
        assert!(code.contains("\tm := r.Service.QueryTbDept(req.Data)\n"));
        assert!(code.contains("\tr.Service.DeleteTbDept(req.Data)\n"));
        assert!(code.contains("\t\"fmt\"\n"));
    }

    #[test]
    fn test_custom_service_type() {
        let options = quiet().with_service_name("shop");
        let code = emit(&[dept()], &options);
        assert!(code.contains("\tService *service.ShopService\n"));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let tables = [dept()];
        assert_eq!(emit(&tables, &quiet()), emit(&tables, &quiet()));
    }
}
