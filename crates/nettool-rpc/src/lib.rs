//! JSON-RPC 2.0 front end for NetTool
//!
//! Exposes the three tools to any client that can write a line of JSON,
//! and owns the state a UI would: the active tab plus one panel per tool
//! showing its last result or error.
//!
//! # Methods
//!
//! - `subnet_calculate` `{address, prefix}`
//! - `telnet_connect` `{host, port}`
//! - `dns_lookup` `{domain}`
//! - `select_tab` `{tab}`
//! - `workbench_state`
//! - `ping`
//!
//! Tool input errors are not protocol errors: they come back as a normal
//! result whose panel carries the error message.
//!
//! # Examples
//!
//! ```
//! use nettool_rpc::RpcServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = RpcServer::new();
//!
//! let request = r#"{
//!     "jsonrpc": "2.0",
//!     "method": "subnet_calculate",
//!     "params": {"address": "192.168.1.10", "prefix": "24"},
//!     "id": 1
//! }"#;
//!
//! let response = server.handle_request(request).await?;
//! println!("Response: {}", response);
//! # Ok(())
//! # }
//! ```

use nettool_core::config::SimulationConfig;
use nettool_core::{Panel, Tab};
use nettool_dns::{LookupResult, MockResolver};
use nettool_subnet::SubnetResult;
use nettool_telnet::{ConnectionStatus, Target, TelnetReport, TelnetTester};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

pub mod transport;

/// RPC server errors
#[derive(Error, Debug)]
pub enum RpcError {
    /// JSON-RPC parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid method parameters
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, RpcError>;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: serde_json::Value,
}

impl JsonRpcResponse {
    fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: serde_json::Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<RpcError> for JsonRpcError {
    fn from(err: RpcError) -> Self {
        let (code, message) = match err {
            RpcError::ParseError(msg) => (-32700, msg),
            RpcError::InvalidRequest(msg) => (-32600, msg),
            RpcError::MethodNotFound(msg) => (-32601, msg),
            RpcError::InvalidParams(msg) => (-32602, msg),
            RpcError::InternalError(msg) => (-32603, msg),
        };
        Self {
            code,
            message,
            data: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubnetParams {
    address: String,
    prefix: String,
}

#[derive(Debug, Deserialize)]
struct TelnetParams {
    host: String,
    port: String,
}

#[derive(Debug, Deserialize)]
struct DnsParams {
    domain: String,
}

#[derive(Debug, Deserialize)]
struct SelectTabParams {
    tab: String,
}

/// Everything a NetTool screen shows
#[derive(Debug, Clone, Default, Serialize)]
pub struct Workbench {
    pub active_tab: Tab,
    pub subnet: Panel<SubnetResult>,
    pub telnet: Panel<TelnetReport>,
    pub dns: Panel<LookupResult>,
    pub dns_loading: bool,
}

impl Workbench {
    /// Status line of the Telnet panel
    pub fn telnet_status(&self) -> ConnectionStatus {
        self.telnet
            .result()
            .map(|report| report.status)
            .unwrap_or_default()
    }
}

/// JSON-RPC server over the NetTool tools
///
/// The workbench lock is never held across a simulated delay, so a
/// `workbench_state` call made while a connection is in flight sees
/// `Connecting...`.
pub struct RpcServer {
    telnet: TelnetTester,
    resolver: MockResolver,
    workbench: Mutex<Workbench>,
}

impl RpcServer {
    /// Create a server with default simulation settings
    pub fn new() -> Self {
        Self::from_config(&SimulationConfig::default())
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::with_tools(
            TelnetTester::from_config(config),
            MockResolver::from_config(config),
        )
    }

    /// Create a server around preconfigured tools
    pub fn with_tools(telnet: TelnetTester, resolver: MockResolver) -> Self {
        Self {
            telnet,
            resolver,
            workbench: Mutex::new(Workbench::default()),
        }
    }

    /// Snapshot of the current workbench
    pub async fn workbench(&self) -> Workbench {
        self.workbench.lock().await.clone()
    }

    /// Handle a JSON-RPC 2.0 request
    ///
    /// # Arguments
    ///
    /// * `request_str` - JSON-RPC request as string
    pub async fn handle_request(&self, request_str: &str) -> Result<String> {
        let response = match serde_json::from_str::<JsonRpcRequest>(request_str) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => JsonRpcResponse::failure(
                serde_json::Value::Null,
                RpcError::ParseError(e.to_string()).into(),
            ),
        };

        serde_json::to_string(&response).map_err(|e| RpcError::InternalError(e.to_string()))
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::failure(
                request.id,
                RpcError::InvalidRequest("Invalid JSON-RPC version".to_string()).into(),
            );
        }

        tracing::debug!(method = %request.method, id = %request.id, "handling request");

        let result = match request.method.as_str() {
            "subnet_calculate" => self.handle_subnet(&request.params).await,
            "telnet_connect" => self.handle_telnet(&request.params).await,
            "dns_lookup" => self.handle_dns(&request.params).await,
            "select_tab" => self.handle_select_tab(&request.params).await,
            "workbench_state" => to_value(&self.workbench().await),
            "ping" => Ok(serde_json::json!({"status": "ok"})),
            _ => Err(RpcError::MethodNotFound(request.method.clone())),
        };

        match result {
            Ok(data) => JsonRpcResponse::success(request.id, data),
            Err(e) => JsonRpcResponse::failure(request.id, e.into()),
        }
    }

    async fn handle_subnet(&self, params: &serde_json::Value) -> Result<serde_json::Value> {
        let params: SubnetParams = parse_params(params)?;
        let outcome = nettool_subnet::calculate(&params.address, &params.prefix);
        if let Err(ref e) = outcome {
            tracing::warn!(error = %e, "subnet input rejected");
        }

        let mut workbench = self.workbench.lock().await;
        workbench.active_tab = Tab::Subnetting;
        workbench.subnet.replace(outcome);
        to_value(&workbench.subnet)
    }

    async fn handle_telnet(&self, params: &serde_json::Value) -> Result<serde_json::Value> {
        let params: TelnetParams = parse_params(params)?;

        let target = {
            let mut workbench = self.workbench.lock().await;
            workbench.active_tab = Tab::Telnet;
            match Target::parse(&params.host, &params.port) {
                Ok(target) => {
                    workbench.telnet.replace(Ok::<_, String>(TelnetReport::pending(&target)));
                    target
                }
                Err(e) => {
                    tracing::warn!(error = %e, "telnet input rejected");
                    workbench.telnet.reject(e);
                    return to_value(&workbench.telnet);
                }
            }
        };

        let report = self.telnet.connect_to(&target).await;

        let mut workbench = self.workbench.lock().await;
        workbench.telnet.replace(Ok::<_, String>(report));
        to_value(&workbench.telnet)
    }

    async fn handle_dns(&self, params: &serde_json::Value) -> Result<serde_json::Value> {
        let params: DnsParams = parse_params(params)?;

        {
            let mut workbench = self.workbench.lock().await;
            workbench.active_tab = Tab::DnsLookup;
            // One lookup at a time; the panel belongs to the one in flight.
            if workbench.dns_loading {
                tracing::debug!(domain = %params.domain, "dns lookup already in flight, ignoring");
                return to_value(&workbench.dns);
            }
            workbench.dns.clear();
            workbench.dns_loading = true;
        }

        let outcome = self.resolver.lookup(&params.domain).await;
        if let Err(ref e) = outcome {
            tracing::warn!(error = %e, domain = %params.domain, "dns lookup failed");
        }

        let mut workbench = self.workbench.lock().await;
        workbench.dns_loading = false;
        workbench.dns.replace(outcome);
        to_value(&workbench.dns)
    }

    async fn handle_select_tab(&self, params: &serde_json::Value) -> Result<serde_json::Value> {
        let params: SelectTabParams = parse_params(params)?;
        let tab: Tab = params
            .tab
            .parse()
            .map_err(|e: nettool_core::NetToolError| RpcError::InvalidParams(e.to_string()))?;

        let mut workbench = self.workbench.lock().await;
        workbench.active_tab = tab;
        to_value(&*workbench)
    }
}

impl Default for RpcServer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T> {
    serde_json::from_value(params.clone()).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| RpcError::InternalError(e.to_string()))
}
