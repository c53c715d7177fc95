pub mod request;
pub mod response;

pub use request::{
    InitializeParams, JsonRpcRequest, RpcId, SchemaRef, ToolCallParams, ValidateDataParams,
    ValidateSchemaParams,
};
pub use response::{JsonRpcError, JsonRpcResponse, ToolError, ToolResult, ToolResultContent};
