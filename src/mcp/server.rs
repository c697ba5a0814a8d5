//! MCP server implementation.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::AppError,
    ethereum::{ChainClient, EthereumClient},
    session::{wait_for_receipt, ContractSession},
    types::{CallOutput, SessionInfo},
};

/// Contract Session MCP Server.
///
/// Exposes one contract session as tools. Reads share the session; submitting
/// a transaction takes it exclusively, and the wait for the receipt happens
/// after it is released so pending transactions never block reads.
#[derive(Clone)]
pub struct ContractSessionServer {
    session: Arc<RwLock<ContractSession<EthereumClient>>>,
    tool_router: ToolRouter<Self>,
}

impl ContractSessionServer {
    /// Create a new Contract Session MCP Server.
    ///
    /// Note: This uses lazy initialization - no network calls are made during
    /// server startup. The Ethereum connection is established when the first
    /// tool is invoked.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing Contract Session MCP Server");

        let session = ContractSession::from_config(&config)?;

        tracing::info!("Contract Session MCP Server initialized successfully");

        Ok(Self::with_session(session))
    }

    /// Create a server around an existing session.
    pub fn with_session(session: ContractSession<EthereumClient>) -> Self {
        Self { session: Arc::new(RwLock::new(session)), tool_router: Self::tool_router() }
    }
}

/// Input parameters for the call_contract and transact_contract tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct ContractMethodInput {
    /// Method name (e.g., "balanceOf") or full signature (e.g., "burn(uint256)").
    pub method: String,
    /// Positional arguments as strings, coerced to the ABI parameter types.
    /// Arrays use "[a,b]" and tuples "(a,b)" syntax.
    #[serde(default)]
    pub args: Vec<String>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl ContractSessionServer {
    /// Describe the session: sender, contract, chain and available functions.
    #[tool(description = "Describe the bound contract session: sender, contract, chain ID, gas limit, last transaction and ABI functions")]
    pub async fn session_info(&self) -> Result<String, McpError> {
        tracing::info!("session_info called");

        let session = self.session.read().await;
        let chain_id = session.client().chain_id().await?;

        let info = SessionInfo {
            sender: session.sender().to_checksum(None),
            contract: session.contract_address().to_checksum(None),
            chain_id,
            gas_limit: session.gas_limit(),
            last_transaction: session.last_transaction().map(|h| format!("{h:?}")),
            functions: session.abi().function_signatures(),
        };

        to_json(&info)
    }

    /// Call a contract method read-only and return its decoded outputs.
    #[tool(description = "Call a contract method read-only (no transaction, no gas) and return the decoded result")]
    pub async fn call_contract(
        &self,
        Parameters(input): Parameters<ContractMethodInput>,
    ) -> Result<String, McpError> {
        tracing::info!(method = %input.method, args = ?input.args, "call_contract called");

        let session = self.session.read().await;
        let values = session.call_str(&input.method, &input.args).await?;

        let output = CallOutput::new(
            session.contract_address().to_checksum(None),
            input.method,
            &values,
        );

        to_json(&output)
    }

    /// Sign and submit a contract transaction, wait until it is mined, and
    /// return the receipt.
    #[tool(description = "Sign and submit a state-changing contract transaction, wait until mined and return the receipt")]
    pub async fn transact_contract(
        &self,
        Parameters(input): Parameters<ContractMethodInput>,
    ) -> Result<String, McpError> {
        tracing::info!(method = %input.method, args = ?input.args, "transact_contract called");

        let (client, hash, poll_interval) = {
            let mut session = self.session.write().await;
            let hash = session.submit_str(&input.method, &input.args).await?;
            (session.client().clone(), hash, session.poll_interval())
        };

        let receipt = wait_for_receipt(&client, hash, poll_interval).await?;
        tracing::info!(tx_hash = %hash, "Done!");

        to_json(&receipt)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ContractSessionServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "contract-session".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Contract Session MCP Server. Calls and transacts against one bound \
                 contract using one configured account."
                    .to_string(),
            ),
        }
    }
}
