//! MCP server exposing a loaded symbol table.

use crate::search::SymbolIndexTable;
use crate::tools::lookup::{LookupRequest, handle_lookup};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server answering symbol queries against one documentation site
#[derive(Clone)]
pub struct SymbolServer {
    /// The table is read-only, so tool calls share it without locking
    table: Arc<SymbolIndexTable>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SymbolServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolServer")
            .field("symbols", &self.table.len())
            .finish()
    }
}

#[tool_router]
impl SymbolServer {
    pub fn new(table: Arc<SymbolIndexTable>) -> Self {
        Self {
            table,
            tool_router: Self::tool_router(),
        }
    }

    pub fn table(&self) -> &Arc<SymbolIndexTable> {
        &self.table
    }

    #[tool(
        description = "Search documented symbols (classes, functions, members, files) by name prefix, case-insensitive, the way a documentation site's search box does. Returns each matching symbol with its documentation anchors and scopes.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search_symbols(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.table, request)
    }

    #[tool(
        description = "Look up one symbol by its full name and list every documentation location for it, including overloads and the source files they are defined in.",
        input_schema = inline_schema_for_type::<LookupRequest>()
    )]
    async fn lookup_symbol(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        handle_lookup(&self.table, request)
    }
}

#[tool_handler]
impl ServerHandler for SymbolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "doxysearch: symbol search over a Doxygen documentation site's search index. \
                 Use search_symbols with the beginning of a name, then lookup_symbol for the \
                 full list of locations."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// so clients see the request fields directly instead of `$ref` indirections.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let serde_json::Value::Object(json_object) = object else {
        panic!("Schema serialization produced non-object value");
    };

    Arc::new(json_object)
}
