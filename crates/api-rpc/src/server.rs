//! JSON-RPC Server
//!
//! Registers the video.* methods and binds a jsonrpsee HTTP server.

use crate::handler::RpcHandler;
use crate::types::{CreateVideoRequest, JobIdRequest, ListRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use reelforge_core::application::JobService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<JobService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("video.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateVideoRequest = params.parse()?;
                    handler.create(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("video.status.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JobIdRequest = params.parse()?;
                    handler.status(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("video.audio.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JobIdRequest = params.parse()?;
                    handler.audio(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("video.final.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JobIdRequest = params.parse()?;
                    handler.final_video(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("video.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Params are optional for list
                    let req: ListRequest = if params.is_object() {
                        params.parse()?
                    } else {
                        ListRequest::default()
                    };
                    handler.list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (useful with port 0) and the stop handle.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = self.module()?;
        info!(addr = %local_addr, "JSON-RPC server started successfully");

        Ok((local_addr, server.start(module)))
    }
}
